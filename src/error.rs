use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedreamError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Download error: {0}")]
    DownloadError(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SeedreamError {
    /// Configuration problems are detected before any network traffic.
    pub fn is_config(&self) -> bool {
        matches!(self, SeedreamError::ConfigError(_))
    }
}

pub type Result<T> = std::result::Result<T, SeedreamError>;
