//! Directory record decoding and tree walking.

use std::io::{Seek, SeekFrom};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::LOGICAL_SECTOR_SIZE;
use crate::ReadSeek;
use crate::datetime::decode_record_datetime;
use crate::error::ImageError;
use crate::geometry::SectorGeometry;
use crate::path_table::{PathTable, join_path};
use crate::sector::{clean_sectors, read_fill, read_sectors};
use crate::util::{decode_name, read_u32_le};
use crate::volume::VolumeInfo;

/// File flags byte (ECMA-119 §9.1.6).
pub const FLAG_HIDDEN: u8 = 0x01;
pub const FLAG_DIRECTORY: u8 = 0x02;

const OFFSET_EXTENT: usize = 2;
const OFFSET_DATA_LENGTH: usize = 10;
const OFFSET_DATETIME: usize = 18;
const OFFSET_FLAGS: usize = 25;
const OFFSET_NAME_LEN: usize = 32;
const OFFSET_NAME: usize = 33;

/// Fixed part of a directory record, up to and including the name
/// length byte.
const RECORD_PREFIX_LEN: usize = 33;

/// One file or directory entry from the volume's directory tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirEntry {
    /// Identifier as recorded (files keep their `;1` version suffix)
    pub name: String,
    /// Absolute path, with the version suffix stripped
    pub full_path: String,
    /// Logical block where the entry's data starts
    pub extent: u32,
    /// Data length in bytes
    pub size: u32,
    /// Recording timestamp, when one is set
    pub recorded: Option<DateTime<Utc>>,
    pub is_directory: bool,
    pub is_hidden: bool,
}

/// Resolve a directory's extent and data length.
///
/// The extent comes straight from the path table; the data length does
/// not appear there, so it is recovered from the matching record in
/// the parent directory. A parent whose records end before the match
/// (an empty extent field) falls back to the directory's own first
/// record, which describes the directory itself.
pub fn directory_extent_and_length(
    reader: &mut dyn ReadSeek,
    geometry: &SectorGeometry,
    table: &PathTable,
    path: &str,
) -> Result<(u32, u32), ImageError> {
    let parent_path = if path == "/" {
        "/"
    } else {
        path.rsplit_once('/')
            .map(|(p, _)| if p.is_empty() { "/" } else { p })
            .unwrap_or("/")
    };

    let parent = table
        .get(parent_path)
        .ok_or_else(|| ImageError::not_found(parent_path.to_string()))?;
    let target = table
        .get(path)
        .ok_or_else(|| ImageError::not_found(path.to_string()))?;
    let target_extent = target.extent;

    let mut record = [0u8; RECORD_PREFIX_LEN];
    reader.seek(SeekFrom::Start(geometry.data_offset(parent.extent)))?;

    loop {
        if read_fill(reader, &mut record)? < RECORD_PREFIX_LEN {
            return Err(ImageError::corrupted_record(format!(
                "directory records for '{path}' end without a match"
            )));
        }
        let extent = read_u32_le(&record, OFFSET_EXTENT);

        if extent == 0 {
            // End of the parent's records: the directory's own first
            // record carries its data length.
            reader.seek(SeekFrom::Start(geometry.data_offset(target_extent)))?;
            read_fill(reader, &mut record)?;
            return Ok((target_extent, read_u32_le(&record, OFFSET_DATA_LENGTH)));
        }
        if extent == target_extent {
            return Ok((target_extent, read_u32_le(&record, OFFSET_DATA_LENGTH)));
        }

        let record_len = i64::from(record[0]);
        reader.seek(SeekFrom::Current(record_len - RECORD_PREFIX_LEN as i64))?;
    }
}

/// List the entries of the directory at `path`, depth-first through
/// subdirectories when `recursive` is set.
pub fn list_entries(
    reader: &mut dyn ReadSeek,
    geometry: &SectorGeometry,
    volume: &VolumeInfo,
    table: &PathTable,
    path: &str,
    recursive: bool,
) -> Result<Vec<DirEntry>, ImageError> {
    let mut entries = Vec::new();
    walk(reader, geometry, volume, table, path, recursive, &mut entries)?;
    Ok(entries)
}

fn walk(
    reader: &mut dyn ReadSeek,
    geometry: &SectorGeometry,
    volume: &VolumeInfo,
    table: &PathTable,
    path: &str,
    recursive: bool,
    entries: &mut Vec<DirEntry>,
) -> Result<(), ImageError> {
    let (extent, data_length) = directory_extent_and_length(reader, geometry, table, path)?;

    let data = if !geometry.is_raw() {
        let mut buf = vec![0u8; data_length as usize];
        reader.seek(SeekFrom::Start(geometry.block_offset(extent)))?;
        read_fill(reader, &mut buf)?;
        buf
    } else {
        let sectors = data_length / LOGICAL_SECTOR_SIZE;
        let raw = read_sectors(reader, geometry, extent, sectors)?;
        clean_sectors(&raw, data_length as usize, geometry)
    };

    let mut subdirs = Vec::new();
    let mut offset = 0usize;

    while offset < data.len() {
        let record_len = data[offset] as usize;
        if record_len == 0 {
            // Records never span sector boundaries; a zero length byte
            // is padding before the next sector.
            offset += 1;
            continue;
        }
        if offset + RECORD_PREFIX_LEN > data.len() {
            break;
        }

        let name_len = data[offset + OFFSET_NAME_LEN] as usize;
        if offset + OFFSET_NAME + name_len <= data.len() {
            let name = decode_name(
                &data[offset + OFFSET_NAME..offset + OFFSET_NAME + name_len],
                volume.volume_type,
            );

            // The `.` and `..` entries encode as a single byte <= 1.
            let keep = name
                .chars()
                .next()
                .is_some_and(|c| c as u32 > 1);

            if keep {
                let flags = data[offset + OFFSET_FLAGS];
                let is_directory = flags & FLAG_DIRECTORY != 0;
                let mut date = [0u8; 7];
                date.copy_from_slice(&data[offset + OFFSET_DATETIME..offset + OFFSET_DATETIME + 7]);

                let mut full_path = join_path(path, &name);
                if let Some(stripped) = full_path.strip_suffix(";1") {
                    full_path = stripped.to_string();
                }

                let entry = DirEntry {
                    name,
                    full_path,
                    extent: read_u32_le(&data, offset + OFFSET_EXTENT),
                    size: read_u32_le(&data, offset + OFFSET_DATA_LENGTH),
                    recorded: decode_record_datetime(&date),
                    is_directory,
                    is_hidden: flags & FLAG_HIDDEN != 0,
                };

                if recursive && is_directory {
                    subdirs.push(entry.full_path.clone());
                }
                entries.push(entry);
            }
        }

        offset += record_len;
    }

    for subdir in subdirs {
        walk(reader, geometry, volume, table, &subdir, recursive, entries)?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/directory_tests.rs"]
mod tests;
