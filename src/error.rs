// error.rs - Core error taxonomy

use thiserror::Error;

/// Errors surfaced by the ESA/anchor core.
///
/// Fatal variants (`AllocationFailed`, `InvalidInput`) abort the whole run.
/// `SubjectIndexFailed` and `DegeneratePair` are soft failures: the driver
/// catches them, sets the matching `DiagnosticFlags` bit, fills the affected
/// cell(s) with NaN, and continues (see §7 of the spec).
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("allocation failed: {0}")]
    AllocationFailed(String),

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("suffix array construction failed for subject '{subject}': {reason}")]
    SubjectIndexFailed { subject: String, reason: String },

    #[error("degenerate pair ({subject}, {query}): {reason}")]
    DegeneratePair {
        subject: String,
        query: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
