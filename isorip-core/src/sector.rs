//! Raw-sector reading and the raw→logical cleaning transform.

use std::io::{self, Read, Seek, SeekFrom};

use crate::LOGICAL_SECTOR_SIZE;
use crate::ReadSeek;
use crate::geometry::SectorGeometry;

/// Strip the per-sector header and trailing ECC/EDC bytes from a raw
/// buffer, leaving only the 2048-byte user data of each sector.
///
/// `source` holds whole physical sectors; `logical_len` is the number
/// of user-data bytes wanted (the last sector may be partial). For a
/// cooked 2048-byte geometry this degenerates to a truncating copy.
pub fn clean_sectors(source: &[u8], logical_len: usize, geometry: &SectorGeometry) -> Vec<u8> {
    let sector_len = geometry.sector_length as usize;
    let data_off = geometry.user_data_offset as usize;
    let logical = LOGICAL_SECTOR_SIZE as usize;

    let mut out = Vec::with_capacity(logical_len);
    let mut chunk = 0usize;
    while out.len() < logical_len {
        let start = chunk * sector_len + data_off;
        if start >= source.len() {
            break;
        }
        let want = (logical_len - out.len()).min(logical);
        let end = (start + want).min(source.len());
        out.extend_from_slice(&source[start..end]);
        if end < start + want {
            break;
        }
        chunk += 1;
    }
    out
}

/// Read `count` whole physical sectors starting at logical block `lba`.
/// Short reads past the end of the image are zero-padded so a partial
/// trailing sector still decodes.
pub fn read_sectors(
    reader: &mut dyn ReadSeek,
    geometry: &SectorGeometry,
    lba: u32,
    count: u32,
) -> io::Result<Vec<u8>> {
    let total = count as usize * geometry.sector_length as usize;
    let mut buf = vec![0u8; total];
    reader.seek(SeekFrom::Start(geometry.block_offset(lba)))?;
    read_fill(reader, &mut buf)?;
    Ok(buf)
}

/// Fill `buf` as far as the stream allows; the tail stays zeroed on EOF.
pub fn read_fill<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

#[cfg(test)]
#[path = "tests/sector_tests.rs"]
mod tests;
