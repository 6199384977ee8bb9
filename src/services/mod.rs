pub mod auth_service;
pub mod correlation;
pub mod option_scanner;
pub mod postback_session;
pub mod token_carrier;

pub use auth_service::{login, Credentials, LoginState};
pub use correlation::{correlate, TieBreak};
pub use postback_session::PostbackSession;
pub use token_carrier::TokenSet;
