use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A required argument was empty or pointed at something that does not exist
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not valid in the current state, or an I/O step failed
    #[error("{message}")]
    InvalidState {
        message: String,
        #[source]
        source: Option<io::Error>,
    },

    /// A target path already exists
    #[error("Conflict: {0}")]
    Conflict(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
            source: None,
        }
    }

    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::InvalidState {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::Conflict(_) => "CONFLICT",
        }
    }
}

/// Fail with `InvalidArgument` when `value` is empty or only whitespace.
pub(crate) fn require_name(label: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_argument(format!("{label} must not be empty")));
    }
    Ok(())
}
