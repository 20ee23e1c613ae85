use thiserror::Error;

/// Errors raised while driving a dialog turn
#[derive(Error, Debug)]
pub enum DialogError {
    #[error("Dialog not found: {0}")]
    DialogNotFound(String),

    #[error("Step {step} not found in dialog {dialog}")]
    StepNotFound { dialog: String, step: usize },

    /// The user's reply did not satisfy the step's constraint
    #[error("Unexpected reply {reply:?}, expected one of {expected:?}")]
    Format {
        reply: String,
        expected: Vec<String>,
    },

    #[error("Context error: {0}")]
    ContextError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DialogError>;
