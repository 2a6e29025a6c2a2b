use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Selection rejected: {0}")]
    Rejected(String),

    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("A submission is already in progress")]
    SubmissionInProgress,

    #[error("Storage error: {0}")]
    Storage(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingError {
    /// Errors the user can retry without changing their selections.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BookingError::Storage(_))
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
