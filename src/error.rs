use thiserror::Error;

/// Failure talking to the remote recipe source
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed (network error, timeout, undecodable body)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP error status code
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// The source has no usable recipe for the request
    #[error("Recipe not found: {0}")]
    NotFound(String),
    /// Successful response whose body is not the expected JSON envelope
    #[error("Malformed response from TheMealDB: {0}")]
    Malformed(String),
}

impl SourceError {
    /// True for transport-level failures the user should retry later
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SourceError::Network(_) | SourceError::HttpStatus(_))
    }
}

/// Failure writing to the local cache directory
#[derive(Debug, Error)]
pub enum CacheError {
    /// Identifier cannot be used as a storage key
    #[error("Invalid cache key: {0:?}")]
    InvalidKey(String),
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Record could not be serialized
    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Image could not be re-encoded for storage
    #[error("Image error: {0}")]
    Encode(#[from] image::ImageError),
}

/// Result type alias for remote source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type alias for cache writes
pub type CacheResult<T> = Result<T, CacheError>;
