use thiserror::Error;

/// Errors that can occur while decoding a disc image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// I/O error while reading the image
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not recognized or the volume descriptor is invalid
    #[error("Invalid image format: {0}")]
    InvalidFormat(String),

    /// A path table or directory record could not be decoded
    #[error("Corrupted record: {0}")]
    CorruptedRecord(String),

    /// The requested path does not exist in the image
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// The image is too small to contain the structure being read
    #[error("Image too small: expected at least {expected} bytes, got {actual}")]
    TooSmall { expected: u64, actual: u64 },
}

impl ImageError {
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    pub fn corrupted_record(msg: impl Into<String>) -> Self {
        Self::CorruptedRecord(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
