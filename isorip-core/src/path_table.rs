//! Type L path table decoding.
//!
//! The path table lists every directory on the volume with its extent
//! and parent index, which lets a reader resolve any directory without
//! walking the tree from the root. Records appear parents-first, so a
//! record's full path can be built by appending its name to the
//! already-resolved path of `parent` (a 1-based index into the table).

use std::collections::HashMap;
use std::io::{Seek, SeekFrom};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::LOGICAL_SECTOR_SIZE;
use crate::ReadSeek;
use crate::error::ImageError;
use crate::geometry::SectorGeometry;
use crate::sector::{clean_sectors, read_fill, read_sectors};
use crate::util::{decode_name, read_u16_le, read_u32_le};
use crate::volume::VolumeInfo;

/// One decoded path table record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathTableRecord {
    pub extended_attr_len: u8,
    /// Logical block where the directory's records start
    pub extent: u32,
    /// 1-based index of the parent directory in the table
    pub parent: u16,
    /// Directory identifier as recorded (the root is a single NUL)
    pub name: String,
    /// Absolute path from the volume root
    pub full_path: String,
}

/// The decoded path table, in record order, with a path lookup index.
#[derive(Debug, Clone, Default)]
pub struct PathTable {
    records: Vec<PathTableRecord>,
    index: HashMap<String, usize>,
}

impl PathTable {
    pub fn get(&self, path: &str) -> Option<&PathTableRecord> {
        self.index.get(path).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[PathTableRecord] {
        &self.records
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.full_path.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn push(&mut self, record: PathTableRecord) {
        self.index
            .insert(record.full_path.clone(), self.records.len());
        self.records.push(record);
    }
}

/// Join a decoded directory name onto its parent's full path.
pub(crate) fn join_path(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// Read and decode the Type L path table named by the volume
/// descriptor.
///
/// A malformed table ends the decode early with a warning rather than
/// an error; whatever decoded cleanly is returned.
pub fn read_path_table(
    reader: &mut dyn ReadSeek,
    geometry: &SectorGeometry,
    volume: &VolumeInfo,
) -> Result<PathTable, ImageError> {
    let table_size = volume.path_table_size as usize;
    let lba = volume.type_l_path_table_lba;

    let data = if !geometry.is_raw() {
        let mut buf = vec![0u8; table_size];
        reader.seek(SeekFrom::Start(geometry.block_offset(lba)))?;
        read_fill(reader, &mut buf)?;
        buf
    } else {
        let sectors = volume.path_table_size / LOGICAL_SECTOR_SIZE + 1;
        let raw = read_sectors(reader, geometry, lba, sectors)?;
        clean_sectors(&raw, table_size, geometry)
    };

    let mut table = PathTable::default();
    let mut offset = 0usize;

    loop {
        if offset + 8 > data.len() {
            if offset < table_size {
                warn!("path table truncated at offset {offset} (size {table_size})");
            }
            break;
        }

        let name_len = data[offset] as usize;
        let extended_attr_len = data[offset + 1];
        let extent = read_u32_le(&data, offset + 2);
        let parent = read_u16_le(&data, offset + 6);

        if offset + 8 + name_len > data.len() {
            warn!("path table record at offset {offset} overruns the table");
            break;
        }

        let name = decode_name(&data[offset + 8..offset + 8 + name_len], volume.volume_type);
        if !name.is_empty() {
            let full_path = if name == "\0" {
                "/".to_string()
            } else {
                let parent_path = (parent as usize)
                    .checked_sub(1)
                    .and_then(|i| table.records.get(i))
                    .map(|r| r.full_path.as_str());
                let Some(parent_path) = parent_path else {
                    warn!("path table record '{name}' references missing parent {parent}");
                    break;
                };
                join_path(parent_path, &name)
            };
            table.push(PathTableRecord {
                extended_attr_len,
                extent,
                parent,
                name,
                full_path,
            });
        }

        if offset >= table_size {
            break;
        }

        // Records are padded to even offsets; the two extra bumps skip
        // the pad byte emitted after nameless and root records.
        offset += 8 + name_len;
        if name_len % 2 == 1 {
            offset += 1;
        }
        if name_len == 0 {
            offset += 1;
        }
        if parent == 0 {
            offset += 1;
        }
    }

    Ok(table)
}

#[cfg(test)]
#[path = "tests/path_table_tests.rs"]
mod tests;
