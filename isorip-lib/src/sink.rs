//! Output-side collaborators for extraction and conversion.

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Filesystem operations the engine needs on the output side.
///
/// Extraction itself writes plain files; everything destination
/// specific (directory creation, timestamps, attributes, capacity
/// queries) goes through this trait so tests and embedders can
/// substitute their own.
pub trait ExtractSink {
    fn create_dir_all(&mut self, path: &Path) -> io::Result<()>;

    /// Apply a recording timestamp to an extracted file.
    fn set_modified(&mut self, path: &Path, when: SystemTime) -> io::Result<()>;

    /// Mark an extracted file hidden, on platforms that support it.
    fn set_hidden(&mut self, path: &Path, hidden: bool) -> io::Result<()>;

    /// Free space available at `path`, or `None` when the platform
    /// offers no query; `None` skips the preflight check.
    fn available_space(&self, path: &Path) -> Option<u64>;

    /// Whether `path` sits on a FAT32 volume (4 GiB file size limit).
    fn is_fat32(&self, path: &Path) -> bool;
}

/// The standard-library implementation used by the CLI.
#[derive(Debug, Default)]
pub struct LocalSink;

impl ExtractSink for LocalSink {
    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn set_modified(&mut self, path: &Path, when: SystemTime) -> io::Result<()> {
        let file = fs::OpenOptions::new().write(true).open(path)?;
        file.set_modified(when)
    }

    fn set_hidden(&mut self, _path: &Path, _hidden: bool) -> io::Result<()> {
        // No portable hidden attribute; Unix hides by naming convention.
        Ok(())
    }

    fn available_space(&self, _path: &Path) -> Option<u64> {
        None
    }

    fn is_fat32(&self, _path: &Path) -> bool {
        false
    }
}
