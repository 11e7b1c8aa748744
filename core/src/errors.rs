use thiserror::Error;

/// Errors raised while talking to the AI boundary or decoding its replies
#[derive(Error, Debug)]
pub enum DorkError {
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },

    #[error("Response Error: {0}")]
    ResponseError(String),

    #[error("Schema Error: {0}")]
    SchemaError(String),

    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Coarse failure classes shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid local configuration, detected before any network call
    Config,
    /// Transport, HTTP or envelope failure at the AI boundary
    Boundary,
    /// The reply text did not match the structured result contract
    Schema,
}

impl DorkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DorkError::ConfigError(_) => ErrorKind::Config,
            DorkError::SchemaError(_) | DorkError::SerdeError(_) => ErrorKind::Schema,
            DorkError::RequestError(_)
            | DorkError::HttpError { .. }
            | DorkError::ResponseError(_)
            | DorkError::ReqwestError(_)
            | DorkError::IoError(_) => ErrorKind::Boundary,
        }
    }
}

/// Result type for dorkcraft operations
pub type DorkResult<T> = Result<T, DorkError>;
