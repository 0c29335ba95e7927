//! Volume descriptor scanning and decoding.

use std::io::{Seek, SeekFrom};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ReadSeek;
use crate::datetime::decode_volume_datetime;
use crate::error::ImageError;
use crate::geometry::SectorGeometry;
use crate::sector::read_fill;
use crate::util::{decode_identifier, read_u16_le, read_u32_le};

/// Volume descriptor type codes (ECMA-119 §8.1.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeType {
    BootRecord,
    PrimaryVolumeDescriptor,
    SupplementaryVolumeDescriptor,
    VolumePartitionDescriptor,
    VolumeDescriptorSetTerminator,
    Unknown,
}

impl VolumeType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::BootRecord,
            1 => Self::PrimaryVolumeDescriptor,
            2 => Self::SupplementaryVolumeDescriptor,
            3 => Self::VolumePartitionDescriptor,
            255 => Self::VolumeDescriptorSetTerminator,
            _ => Self::Unknown,
        }
    }
}

/// Decoded volume descriptor fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeInfo {
    pub volume_type: VolumeType,
    pub standard_identifier: String,
    pub version: u8,
    pub system_identifier: String,
    pub volume_identifier: String,
    /// Size of the volume in logical blocks
    pub volume_space_size: u32,
    pub volume_set_size: u16,
    pub volume_sequence_number: u16,
    pub logical_block_size: u16,
    /// Size of the path table in bytes
    pub path_table_size: u32,
    /// Logical block of the Type L (little-endian) path table
    pub type_l_path_table_lba: u32,
    /// Logical block of the Type M (big-endian) path table
    pub type_m_path_table_lba: u32,
    /// Extent of the root directory
    pub root_dir_extent: u32,
    /// Data length of the root directory in bytes
    pub root_dir_length: u32,
    pub volume_set_identifier: String,
    pub publisher_identifier: String,
    pub data_preparer_identifier: String,
    pub application_identifier: String,
    pub copyright_file_identifier: String,
    pub abstract_file_identifier: String,
    pub bibliographic_file_identifier: String,
    pub creation_date: Option<DateTime<Utc>>,
    pub modification_date: Option<DateTime<Utc>>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub effective_date: Option<DateTime<Utc>>,
    pub file_structure_version: u8,
}

const OFFSET_TYPE: usize = 0;
const OFFSET_STANDARD_ID: usize = 1;
const OFFSET_VERSION: usize = 6;
const OFFSET_SYSTEM_ID: usize = 8;
const OFFSET_VOLUME_ID: usize = 40;
const OFFSET_SPACE_SIZE: usize = 80;
const OFFSET_SET_SIZE: usize = 120;
const OFFSET_SEQUENCE_NUMBER: usize = 124;
const OFFSET_BLOCK_SIZE: usize = 128;
const OFFSET_PATH_TABLE_SIZE: usize = 132;
const OFFSET_TYPE_L_TABLE: usize = 140;
const OFFSET_TYPE_M_TABLE: usize = 148;
const OFFSET_ROOT_RECORD: usize = 156;
const OFFSET_VOLUME_SET_ID: usize = 190;
const OFFSET_PUBLISHER_ID: usize = 318;
const OFFSET_PREPARER_ID: usize = 446;
const OFFSET_APPLICATION_ID: usize = 574;
const OFFSET_COPYRIGHT_FILE: usize = 702;
const OFFSET_ABSTRACT_FILE: usize = 739;
const OFFSET_BIBLIO_FILE: usize = 776;
const OFFSET_CREATION_DATE: usize = 813;
const OFFSET_MODIFICATION_DATE: usize = 830;
const OFFSET_EXPIRATION_DATE: usize = 847;
const OFFSET_EFFECTIVE_DATE: usize = 864;
const OFFSET_STRUCTURE_VERSION: usize = 881;

const TERMINATOR: u8 = 255;

/// Scan the volume descriptor set starting at logical sector 16 and
/// decode the descriptor that ends up in hand.
///
/// The scan keeps overwriting its held sector with each non-terminator
/// descriptor it meets, so when a supplementary descriptor follows the
/// primary one, the supplementary volume is the one decoded.
pub fn read_volume_descriptor(
    reader: &mut dyn ReadSeek,
    geometry: &SectorGeometry,
) -> Result<VolumeInfo, ImageError> {
    let sector_len = geometry.sector_length as usize;
    let start = geometry.leading_skip
        + 16 * u64::from(geometry.sector_length)
        + u64::from(geometry.user_data_offset);
    reader.seek(SeekFrom::Start(start))?;

    let mut sector = vec![0u8; sector_len];
    let mut held: Option<Vec<u8>> = None;

    loop {
        let filled = read_fill(reader, &mut sector)?;
        if filled == 0 {
            break;
        }
        if sector[OFFSET_TYPE] == TERMINATOR {
            break;
        }
        held = Some(sector[..2048.min(sector_len)].to_vec());
    }

    let data = held.ok_or_else(|| {
        ImageError::invalid_format("no volume descriptor before the set terminator")
    })?;
    decode_descriptor(&data)
}

fn decode_descriptor(data: &[u8]) -> Result<VolumeInfo, ImageError> {
    if data.len() < 2048 {
        return Err(ImageError::TooSmall {
            expected: 2048,
            actual: data.len() as u64,
        });
    }

    let standard_identifier = decode_identifier(&data[OFFSET_STANDARD_ID..OFFSET_STANDARD_ID + 5]);
    if standard_identifier != "CD001" {
        return Err(ImageError::invalid_format(format!(
            "bad standard identifier '{standard_identifier}'"
        )));
    }

    let root = &data[OFFSET_ROOT_RECORD..OFFSET_ROOT_RECORD + 34];

    Ok(VolumeInfo {
        volume_type: VolumeType::from_u8(data[OFFSET_TYPE]),
        standard_identifier,
        version: data[OFFSET_VERSION],
        system_identifier: decode_identifier(&data[OFFSET_SYSTEM_ID..OFFSET_VOLUME_ID]),
        volume_identifier: decode_identifier(&data[OFFSET_VOLUME_ID..72]),
        volume_space_size: read_u32_le(data, OFFSET_SPACE_SIZE),
        volume_set_size: read_u16_le(data, OFFSET_SET_SIZE),
        volume_sequence_number: read_u16_le(data, OFFSET_SEQUENCE_NUMBER),
        logical_block_size: read_u16_le(data, OFFSET_BLOCK_SIZE),
        path_table_size: read_u32_le(data, OFFSET_PATH_TABLE_SIZE),
        type_l_path_table_lba: read_u32_le(data, OFFSET_TYPE_L_TABLE),
        type_m_path_table_lba: u32::from_be_bytes([
            data[OFFSET_TYPE_M_TABLE],
            data[OFFSET_TYPE_M_TABLE + 1],
            data[OFFSET_TYPE_M_TABLE + 2],
            data[OFFSET_TYPE_M_TABLE + 3],
        ]),
        root_dir_extent: read_u32_le(root, 2),
        root_dir_length: read_u32_le(root, 10),
        volume_set_identifier: decode_identifier(&data[OFFSET_VOLUME_SET_ID..OFFSET_PUBLISHER_ID]),
        publisher_identifier: decode_identifier(&data[OFFSET_PUBLISHER_ID..OFFSET_PREPARER_ID]),
        data_preparer_identifier: decode_identifier(
            &data[OFFSET_PREPARER_ID..OFFSET_APPLICATION_ID],
        ),
        application_identifier: decode_identifier(
            &data[OFFSET_APPLICATION_ID..OFFSET_COPYRIGHT_FILE],
        ),
        copyright_file_identifier: decode_identifier(
            &data[OFFSET_COPYRIGHT_FILE..OFFSET_ABSTRACT_FILE],
        ),
        abstract_file_identifier: decode_identifier(&data[OFFSET_ABSTRACT_FILE..OFFSET_BIBLIO_FILE]),
        bibliographic_file_identifier: decode_identifier(
            &data[OFFSET_BIBLIO_FILE..OFFSET_CREATION_DATE],
        ),
        creation_date: decode_volume_datetime(&data[OFFSET_CREATION_DATE..OFFSET_CREATION_DATE + 17]),
        modification_date: decode_volume_datetime(
            &data[OFFSET_MODIFICATION_DATE..OFFSET_MODIFICATION_DATE + 17],
        ),
        expiration_date: decode_volume_datetime(
            &data[OFFSET_EXPIRATION_DATE..OFFSET_EXPIRATION_DATE + 17],
        ),
        effective_date: decode_volume_datetime(
            &data[OFFSET_EFFECTIVE_DATE..OFFSET_EFFECTIVE_DATE + 17],
        ),
        file_structure_version: data[OFFSET_STRUCTURE_VERSION],
    })
}

#[cfg(test)]
#[path = "tests/volume_tests.rs"]
mod tests;
