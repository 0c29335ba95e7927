//! Progress events emitted by the engine.

use std::path::PathBuf;

/// Events reported while extracting files from an image.
#[derive(Debug, Clone)]
pub enum ExtractEvent {
    /// A chunk of a file was copied
    Reading {
        /// Path of the file inside the image
        source_path: String,
        /// Byte offset of the file's first sector in the image
        start: u64,
        /// Total size of the file being copied
        total_bytes: u64,
        /// Bytes written so far
        bytes_copied: u64,
        /// Output file on disk
        output: PathBuf,
        /// 1-based index of the file in the current operation
        file_index: u32,
    },
    /// The operation stopped because the cancel token was set
    Aborted { source_path: String, output: PathBuf },
    /// All requested files were written
    Completed,
}

impl ExtractEvent {
    pub fn reading(
        source_path: &str,
        start: u64,
        total_bytes: u64,
        bytes_copied: u64,
        output: &std::path::Path,
        file_index: u32,
    ) -> Self {
        Self::Reading {
            source_path: source_path.to_string(),
            start,
            total_bytes,
            bytes_copied,
            output: output.to_path_buf(),
            file_index,
        }
    }

    pub fn aborted(source_path: &str, output: &std::path::Path) -> Self {
        Self::Aborted {
            source_path: source_path.to_string(),
            output: output.to_path_buf(),
        }
    }
}

/// Events reported while converting a raw dump to ISO.
#[derive(Debug, Clone, Copy)]
pub enum ConvertEvent {
    /// A buffer of sectors was rewritten
    Progress {
        /// Bytes written to the output so far
        bytes_written: u64,
        /// Total size of the source image
        source_len: u64,
    },
    /// The conversion stopped because the cancel token was set
    Aborted,
    /// The output image is complete
    Completed,
}
