use thiserror::Error;

/// Main error type for format detection
#[derive(Error, Debug)]
pub enum DetectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Illegal start/length: start {start} and length {length} exceed buffer size {buffer_size}")]
    IllegalStartLength {
        start: usize,
        length: usize,
        buffer_size: usize,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for detection operations
pub type Result<T> = std::result::Result<T, DetectError>;
