use thiserror::Error;

/// Failures talking to the remote parts API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Login or refresh was rejected, or the auth response could not be read
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The request never produced an HTTP response (refused, reset, timed out)
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The remote answered with a non-2xx status
    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// A 2xx body that does not match the expected shape
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// The operation is not valid for the current local state
    #[error("Precondition failed: {0}")]
    Precondition(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
