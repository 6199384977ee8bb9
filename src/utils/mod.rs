pub mod logging;
pub mod markup;
