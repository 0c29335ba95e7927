//! Raw dump to plain ISO conversion.

use std::fs::{self, File};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use log::info;

use isorip_core::{LOGICAL_SECTOR_SIZE, SectorGeometry, sector};

use crate::cancel::CancelToken;
use crate::error::ExtractError;
use crate::progress::ConvertEvent;
use crate::session::Outcome;
use crate::sink::ExtractSink;

/// Sectors rewritten per read/write cycle (128 KiB of output).
const BUFFER_SECTOR_FACTOR: u64 = 64;

/// Largest file a FAT32 volume can hold.
const FAT32_FILE_LIMIT: u64 = u32::MAX as u64;

/// Rewrite a raw-sector dump as a plain 2048-byte ISO image.
///
/// The output size is fixed up front from the source size and
/// geometry: one logical sector per physical sector, minus the lead-in
/// the geometry says to skip. The sink supplies destination capacity
/// checks before any byte is written; cancellation is polled per
/// buffer and leaves the partial output in place.
pub fn convert_to_iso(
    source: &Path,
    geometry: &SectorGeometry,
    dest: &Path,
    sink: &dyn ExtractSink,
    cancel: &CancelToken,
    mut on_event: impl FnMut(ConvertEvent),
) -> Result<Outcome, ExtractError> {
    if !geometry.is_known() {
        return Err(ExtractError::unknown_format(format!(
            "could not determine the sector layout of {}",
            source.display()
        )));
    }

    let source_len = fs::metadata(source)?.len();
    let sector_len = u64::from(geometry.sector_length);
    let logical = u64::from(LOGICAL_SECTOR_SIZE);
    let target_len = (source_len / sector_len * logical).saturating_sub(geometry.leading_skip);

    if sink.is_fat32(dest) && target_len > FAT32_FILE_LIMIT {
        return Err(ExtractError::Fat32Limit { size: target_len });
    }
    if let Some(available) = sink.available_space(dest)
        && available < target_len
    {
        return Err(ExtractError::InsufficientSpace {
            required: target_len,
            available,
        });
    }

    info!(
        "converting {} ({source_len} bytes, sector {sector_len}) to {} ({target_len} bytes)",
        source.display(),
        dest.display()
    );

    let mut src = File::open(source)?;
    let mut dst = File::create(dest)?;
    src.seek(SeekFrom::Start(geometry.leading_skip))?;

    let buffer_len = (sector_len * BUFFER_SECTOR_FACTOR) as usize;
    let mut buf = vec![0u8; buffer_len];
    let mut written = 0u64;

    loop {
        if cancel.is_cancelled() {
            on_event(ConvertEvent::Aborted);
            return Ok(Outcome::Aborted);
        }

        let read = sector::read_fill(&mut src, &mut buf)?;
        if read == buffer_len {
            let cooked = sector::clean_sectors(&buf, (logical * BUFFER_SECTOR_FACTOR) as usize, geometry);
            dst.write_all(&cooked)?;
            written += cooked.len() as u64;
        } else if read > 0 {
            let logical_bytes = (read as u64 / sector_len * logical) as usize;
            let cooked = sector::clean_sectors(&buf[..read], logical_bytes, geometry);
            dst.write_all(&cooked)?;
            written += cooked.len() as u64;
        }

        on_event(ConvertEvent::Progress {
            bytes_written: written,
            source_len,
        });

        if read == 0 || written >= target_len {
            break;
        }
    }

    dst.flush()?;
    on_event(ConvertEvent::Completed);
    Ok(Outcome::Completed)
}

#[cfg(test)]
#[path = "tests/convert_tests.rs"]
mod tests;
