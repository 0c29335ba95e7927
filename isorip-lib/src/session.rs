//! An open disc image and the operations on it.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::{debug, info};

use isorip_core::{
    DirEntry, ImageError, ImageFileFormat, LOGICAL_SECTOR_SIZE, PathTable, SectorGeometry,
    VolumeInfo, detect, directory, path_table, sector, volume,
};

use crate::cancel::CancelToken;
use crate::error::ExtractError;
use crate::progress::ExtractEvent;
use crate::sink::ExtractSink;

/// Sectors copied per read/write cycle during extraction.
const COPY_SECTOR_FACTOR: u64 = 16;

/// How an extraction run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Aborted,
}

/// An open disc image.
///
/// Holds the file handle, the detected sector geometry and the decoded
/// volume descriptor. Listing and extraction take `&mut self`: one
/// operation at a time per session, which is what serializing access
/// to the single underlying file handle requires anyway.
pub struct ImageSession {
    path: PathBuf,
    file: File,
    format: ImageFileFormat,
    geometry: SectorGeometry,
    volume: VolumeInfo,
    entries: HashMap<String, DirEntry>,
}

impl ImageSession {
    /// Open an image whose format the caller knows.
    pub fn open(path: impl AsRef<Path>, format: ImageFileFormat) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let geometry = format.geometry();
        if !geometry.is_known() {
            return Err(ExtractError::unknown_format(format!(
                "{} needs an explicit format or a detectable header",
                path.display()
            )));
        }
        Self::with_geometry(path, format, geometry)
    }

    /// Open an image, sniffing its format from the extension and
    /// header bytes.
    pub fn open_auto(path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let (format, geometry) = detect::detect(path, &mut file);
        if !geometry.is_known() {
            return Err(ExtractError::unknown_format(format!(
                "could not determine the sector layout of {}",
                path.display()
            )));
        }
        Self::from_parts(path, file, format, geometry)
    }

    fn with_geometry(
        path: &Path,
        format: ImageFileFormat,
        geometry: SectorGeometry,
    ) -> Result<Self, ExtractError> {
        let file = File::open(path)?;
        Self::from_parts(path, file, format, geometry)
    }

    fn from_parts(
        path: &Path,
        mut file: File,
        format: ImageFileFormat,
        geometry: SectorGeometry,
    ) -> Result<Self, ExtractError> {
        let volume = volume::read_volume_descriptor(&mut file, &geometry)?;
        debug!(
            "opened {} as {}: volume '{}'",
            path.display(),
            format.name(),
            volume.volume_identifier
        );
        Ok(Self {
            path: path.to_path_buf(),
            file,
            format,
            geometry,
            volume,
            entries: HashMap::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ImageFileFormat {
        self.format
    }

    pub fn geometry(&self) -> &SectorGeometry {
        &self.geometry
    }

    pub fn volume(&self) -> &VolumeInfo {
        &self.volume
    }

    /// Decode the Type L path table.
    pub fn path_table(&mut self) -> Result<PathTable, ExtractError> {
        Ok(path_table::read_path_table(
            &mut self.file,
            &self.geometry,
            &self.volume,
        )?)
    }

    /// Directory paths on the volume, sorted.
    pub fn directory_paths(&mut self) -> Result<Vec<String>, ExtractError> {
        let table = self.path_table()?;
        let mut paths: Vec<String> = table.paths().map(str::to_string).collect();
        paths.sort();
        Ok(paths)
    }

    /// List the entries under `path`, optionally recursing. Also
    /// refreshes the lookup map used by [`extract_file`].
    ///
    /// [`extract_file`]: ImageSession::extract_file
    pub fn entries(&mut self, path: &str, recursive: bool) -> Result<Vec<DirEntry>, ExtractError> {
        // A full-tree walk starts the lookup map over; partial walks
        // only add to it.
        if path == "/" && recursive {
            self.entries.clear();
        }
        let table = path_table::read_path_table(&mut self.file, &self.geometry, &self.volume)?;
        let list = directory::list_entries(
            &mut self.file,
            &self.geometry,
            &self.volume,
            &table,
            path,
            recursive,
        )?;
        for entry in &list {
            self.entries.insert(entry.full_path.clone(), entry.clone());
        }
        Ok(list)
    }

    fn lookup(&mut self, file_path: &str) -> Result<DirEntry, ExtractError> {
        let normalized = if file_path.starts_with('/') {
            file_path.to_string()
        } else {
            format!("/{file_path}")
        };
        if self.entries.is_empty() {
            self.entries("/", true)?;
        }
        self.entries
            .get(&normalized)
            .cloned()
            .ok_or_else(|| ExtractError::Image(ImageError::not_found(normalized)))
    }

    /// Extract a single file into `output_dir`, flat, under its own
    /// name. Cancellation is polled between copy chunks, so aborting
    /// mid-file leaves a partial output behind.
    pub fn extract_file(
        &mut self,
        file_path: &str,
        output_dir: &Path,
        sink: &mut dyn ExtractSink,
        cancel: &CancelToken,
        mut on_event: impl FnMut(ExtractEvent),
    ) -> Result<Outcome, ExtractError> {
        let entry = self.lookup(file_path)?;
        let file_name = entry
            .full_path
            .rsplit('/')
            .next()
            .unwrap_or(&entry.full_path)
            .to_string();
        let output = output_dir.join(file_name);
        let outcome = self.copy_entry(&entry, &output, sink, Some(cancel), 0, &mut on_event)?;
        if outcome == Outcome::Completed {
            on_event(ExtractEvent::Completed);
        }
        Ok(outcome)
    }

    /// Extract the whole volume into `output_dir`, recreating the
    /// directory tree. Cancellation is polled before each entry.
    pub fn extract_all(
        &mut self,
        output_dir: &Path,
        sink: &mut dyn ExtractSink,
        cancel: &CancelToken,
        mut on_event: impl FnMut(ExtractEvent),
    ) -> Result<Outcome, ExtractError> {
        if let Some(available) = sink.available_space(output_dir) {
            let required = fs::metadata(&self.path)?.len();
            if available < required {
                return Err(ExtractError::InsufficientSpace {
                    required,
                    available,
                });
            }
        }

        let list = self.entries("/", true)?;
        info!(
            "extracting {} entries from {} into {}",
            list.len(),
            self.path.display(),
            output_dir.display()
        );

        let mut file_index = 0u32;
        for entry in &list {
            if cancel.is_cancelled() {
                on_event(ExtractEvent::aborted(&entry.full_path, output_dir));
                return Ok(Outcome::Aborted);
            }

            let relative: PathBuf = entry
                .full_path
                .trim_start_matches('/')
                .split('/')
                .collect();
            let target = output_dir.join(relative);

            if entry.is_directory {
                sink.create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    sink.create_dir_all(parent)?;
                }
                self.copy_entry(entry, &target, sink, None, file_index, &mut on_event)?;
                file_index += 1;
            }
        }

        on_event(ExtractEvent::Completed);
        Ok(Outcome::Completed)
    }

    /// Copy one file entry out of the image in 16-sector chunks,
    /// flushing and reporting progress after each chunk.
    fn copy_entry(
        &mut self,
        entry: &DirEntry,
        output: &Path,
        sink: &mut dyn ExtractSink,
        cancel: Option<&CancelToken>,
        file_index: u32,
        on_event: &mut dyn FnMut(ExtractEvent),
    ) -> Result<Outcome, ExtractError> {
        let sector_len = u64::from(self.geometry.sector_length);
        let logical = u64::from(LOGICAL_SECTOR_SIZE);
        let chunk_logical = logical * COPY_SECTOR_FACTOR;
        let start = self.geometry.block_offset(entry.extent);
        let total = u64::from(entry.size);

        self.file.seek(SeekFrom::Start(start))?;
        let mut dest = File::create(output)?;
        let mut written = 0u64;

        while written < total {
            if let Some(cancel) = cancel
                && cancel.is_cancelled()
            {
                on_event(ExtractEvent::aborted(&entry.full_path, output));
                return Ok(Outcome::Aborted);
            }

            let remaining = total - written;
            let cooked = if !self.geometry.is_raw() {
                let want = remaining.min(chunk_logical) as usize;
                let mut buf = vec![0u8; want];
                sector::read_fill(&mut self.file, &mut buf)?;
                buf
            } else if remaining > chunk_logical {
                let mut buf = vec![0u8; (sector_len * COPY_SECTOR_FACTOR) as usize];
                sector::read_fill(&mut self.file, &mut buf)?;
                sector::clean_sectors(&buf, chunk_logical as usize, &self.geometry)
            } else {
                let sectors = remaining / logical + 1;
                let mut buf = vec![0u8; (sectors * sector_len) as usize];
                sector::read_fill(&mut self.file, &mut buf)?;
                sector::clean_sectors(&buf, remaining as usize, &self.geometry)
            };

            dest.write_all(&cooked)?;
            dest.flush()?;
            written += cooked.len() as u64;

            on_event(ExtractEvent::reading(
                &entry.full_path,
                start,
                total,
                written,
                output,
                file_index + 1,
            ));
        }
        drop(dest);

        if let Some(recorded) = entry.recorded {
            let when: SystemTime = recorded.into();
            sink.set_modified(output, when)?;
        }
        if entry.is_hidden {
            sink.set_hidden(output, true)?;
        }

        Ok(Outcome::Completed)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
