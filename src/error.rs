use std::path::PathBuf;
use thiserror::Error;

/// Failures of the rating workflow. All of them are shown to the evaluator,
/// who can correct the input and try again.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Unknown user: {0}")]
    InvalidUser(String),

    #[error("Rating {0} is outside the 1-5 scale")]
    InvalidRating(i64),

    #[error("Review {0} is not part of this batch")]
    UnknownReview(String),

    #[error("Only {rated} of {required} reviews are rated; rate every review before submitting")]
    IncompleteSubmission { rated: usize, required: usize },

    #[error("This batch was already submitted; reload it to rate again")]
    SessionSpent,

    #[error("Unknown or expired session: {0}")]
    UnknownSession(String),

    #[error(transparent)]
    StorageWrite(#[from] StoreError),
}

impl EvalError {
    /// Stable identifier sent to the browser alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            EvalError::InvalidUser(_) => "invalid_user",
            EvalError::InvalidRating(_) => "invalid_rating",
            EvalError::UnknownReview(_) => "unknown_review",
            EvalError::IncompleteSubmission { .. } => "incomplete_submission",
            EvalError::SessionSpent => "session_spent",
            EvalError::UnknownSession(_) => "unknown_session",
            EvalError::StorageWrite(_) => "storage_write",
        }
    }
}

/// Failures of the results file.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cannot write results to {}: {source}", path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode results row: {0}")]
    Encode(#[from] csv::Error),

    #[error("Failed to read results from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
