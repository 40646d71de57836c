use thiserror::Error;

#[derive(Error, Debug)]
pub enum MentorError {
    #[error("Input error: {0}")]
    Input(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error (status {status:?}): {body}")]
    Network { status: Option<u16>, body: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Invalid session state: {0}")]
    InvalidState(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl MentorError {
    /// Network failure that never reached an HTTP status (DNS, refused, decode)
    pub fn transport(message: impl Into<String>) -> Self {
        MentorError::Network {
            status: None,
            body: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MentorError>;
