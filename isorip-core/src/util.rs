//! Small byte-level decode helpers shared by the table parsers.

use crate::volume::VolumeType;

/// Read a little-endian u16 at `offset`.
pub fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

/// Read a little-endian u32 at `offset`.
pub fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Decode a fixed-width identifier field, trimming the space/NUL padding.
pub fn decode_identifier(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(['\0', ' '])
        .to_string()
}

/// Decode a path-table or directory-record name.
///
/// Primary volumes store single-byte characters. Supplementary
/// (Joliet) volumes store UCS-2 big-endian, except that the special
/// one-byte `.`/`..`/root identifiers still appear as single bytes, so
/// an odd byte length falls back to single-byte decoding.
pub fn decode_name(bytes: &[u8], volume_type: VolumeType) -> String {
    let wide = volume_type == VolumeType::SupplementaryVolumeDescriptor && bytes.len() % 2 == 0;

    if wide {
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

#[cfg(test)]
#[path = "tests/util_tests.rs"]
mod tests;
