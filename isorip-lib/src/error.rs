use thiserror::Error;

use isorip_core::ImageError;

/// Errors from the extraction and conversion engine.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The image could not be decoded
    #[error(transparent)]
    Image(#[from] ImageError),

    /// I/O error on the output side
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image's sector layout could not be determined
    #[error("Unknown image format: {0}")]
    UnknownFormat(String),

    /// The destination cannot hold the output
    #[error("Not enough space on the destination: need {required} bytes, {available} available")]
    InsufficientSpace { required: u64, available: u64 },

    /// The destination is FAT32 and the output exceeds its file size limit
    #[error("Output of {size} bytes exceeds the FAT32 file size limit")]
    Fat32Limit { size: u64 },
}

impl ExtractError {
    pub fn unknown_format(msg: impl Into<String>) -> Self {
        Self::UnknownFormat(msg.into())
    }
}
