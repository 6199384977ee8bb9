pub mod proforma_flow;
pub mod submission_ctx;

pub use proforma_flow::{resync, ProformaFlow, StageOutcome};
pub use submission_ctx::SubmissionCtx;
