//! Fatal compile errors
//!
//! Only configuration problems that make the output unusable abort a run. Everything
//! else is a [diagnostic](crate::twsam::diagnostics).

use thiserror::Error;

/// The title every story must have; it becomes script 0.
pub const START_PASSAGE: &str = "Start";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("\"Start\" passage not found")]
    MissingStart,

    #[error("link on passage {passage:?} points to a nonexisting passage: {target:?}")]
    UnresolvedLink { passage: String, target: String },
}

pub type Result<T> = std::result::Result<T, CompileError>;
