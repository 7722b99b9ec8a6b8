//! Error types module
//!
//! All errors surfaced to HTTP clients are unified under the `AppError` enum.
//! Each variant knows its HTTP status code, its client-facing message, and the
//! level it should be logged at.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like resource limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Cloud upload failed: {0}")]
    CloudUpload(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code for this error.
    ///
    /// Size-limit errors ride the client-error channel (400) together with
    /// the other request-rejection causes; only cloud and internal failures
    /// are server errors.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::InvalidInput(_) | AppError::PayloadTooLarge(_) => 400,
            AppError::CloudUpload(_) | AppError::Internal(_) => 500,
        }
    }

    /// Client-facing message. Provider detail for cloud failures is carried
    /// separately in the response body's `error` field.
    pub fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) | AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::CloudUpload(_) => "Cloud upload failed".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidInput(_) => LogLevel::Debug,
            AppError::PayloadTooLarge(_) => LogLevel::Warn,
            AppError::CloudUpload(_) | AppError::Internal(_) => LogLevel::Error,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
