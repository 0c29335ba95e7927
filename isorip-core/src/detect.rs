//! Sector-geometry sniffing for the supported dump formats.
//!
//! Each sniffer inspects the first bytes of the stream and returns the
//! physical sector layout, or the all-zero geometry when the probe
//! fails. Probe I/O errors are treated as a failed probe, not a hard
//! error, so a truncated file simply comes back undetected.

use std::io::{self, Seek, SeekFrom};
use std::path::Path;

use log::debug;

use crate::ReadSeek;
use crate::geometry::{ImageFileFormat, SectorGeometry};
use crate::sector::read_fill;

/// 12-byte sync mark opening every raw Mode 1/2 sector.
pub const SYNC_PATTERN: [u8; 12] = [
    0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00,
];

/// Subchannel signature found at offset 2352 in 2448-byte MDF dumps.
pub const MDF_SUB_PATTERN: [u8; 12] = [
    0x80, 0xC0, 0x80, 0x80, 0x80, 0x80, 0x80, 0xC0, 0x80, 0x80, 0x80, 0x80,
];

/// Smallest plausible image (in bytes) for the formats that key their
/// probe on file size alone.
pub const MIN_IMAGE_LEN: u64 = 358_400;

/// Sectors of lead-in data preceding user data in NRG and CDI dumps.
pub const LEAD_IN_SECTORS: u32 = 150;

/// NRG images carry a fixed 150-sector cooked lead-in.
const NRG_LEAD_IN_BYTES: u64 = LEAD_IN_SECTORS as u64 * 2048;

fn probe(result: io::Result<SectorGeometry>, what: &str) -> SectorGeometry {
    match result {
        Ok(geometry) => geometry,
        Err(err) => {
            debug!("{what} probe failed: {err}");
            SectorGeometry::default()
        }
    }
}

/// Sniff a .bin dump: a sync mark at offset 0 means raw 2352-byte
/// sectors with the mode byte at offset 15; no sync mark means a
/// headerless 2336-byte Mode 2 dump.
pub fn sniff_bin(reader: &mut dyn ReadSeek) -> SectorGeometry {
    probe(try_sniff_bin(reader), "bin")
}

fn try_sniff_bin(reader: &mut dyn ReadSeek) -> io::Result<SectorGeometry> {
    let mut buf = [0u8; 16];
    reader.seek(SeekFrom::Start(0))?;
    read_fill(reader, &mut buf)?;

    if buf[..12] != SYNC_PATTERN {
        return Ok(SectorGeometry::new(2336, 8));
    }
    Ok(match buf[15] {
        1 => SectorGeometry::new(2352, 16),
        2 => SectorGeometry::new(2352, 24),
        _ => SectorGeometry::default(),
    })
}

/// Sniff a CloneCD .img dump. Same header probe as .bin but without
/// the headerless 2336-byte fallback.
pub fn sniff_ccd(reader: &mut dyn ReadSeek) -> SectorGeometry {
    probe(try_sniff_ccd(reader), "ccd")
}

fn try_sniff_ccd(reader: &mut dyn ReadSeek) -> io::Result<SectorGeometry> {
    let mut buf = [0u8; 16];
    reader.seek(SeekFrom::Start(0))?;
    read_fill(reader, &mut buf)?;

    if buf[..12] != SYNC_PATTERN {
        return Ok(SectorGeometry::default());
    }
    Ok(match buf[15] {
        1 => SectorGeometry::new(2352, 16),
        2 => SectorGeometry::new(2352, 24),
        _ => SectorGeometry::default(),
    })
}

/// Sniff an Alcohol 120% .mdf dump: sync at 0, then the subchannel
/// signature at 2352 distinguishes 2448-byte sectors from plain 2352.
pub fn sniff_mdf(reader: &mut dyn ReadSeek) -> SectorGeometry {
    probe(try_sniff_mdf(reader), "mdf")
}

fn try_sniff_mdf(reader: &mut dyn ReadSeek) -> io::Result<SectorGeometry> {
    let mut buf = [0u8; 12];
    reader.seek(SeekFrom::Start(0))?;
    read_fill(reader, &mut buf)?;

    if buf != SYNC_PATTERN {
        return Ok(SectorGeometry::default());
    }

    reader.seek(SeekFrom::Start(2352))?;
    read_fill(reader, &mut buf)?;
    if buf == MDF_SUB_PATTERN {
        Ok(SectorGeometry::new(2448, 16))
    } else {
        Ok(SectorGeometry::new(2352, 16))
    }
}

/// Sniff a DiscJuggler .cdi dump. Raw variants are told apart by where
/// the second sync mark lands (2352 raw, 2368 PQ, otherwise 2448
/// CD+G); no sync mark at all means cooked sectors. All variants skip
/// a 150-sector lead-in.
pub fn sniff_cdi(reader: &mut dyn ReadSeek) -> SectorGeometry {
    probe(try_sniff_cdi(reader), "cdi")
}

fn try_sniff_cdi(reader: &mut dyn ReadSeek) -> io::Result<SectorGeometry> {
    let len = reader.seek(SeekFrom::End(0))?;
    if len <= MIN_IMAGE_LEN {
        return Ok(SectorGeometry::default());
    }

    let mut buf = [0u8; 16];
    reader.seek(SeekFrom::Start(0))?;
    read_fill(reader, &mut buf)?;

    let mut geometry = if buf[..12] != SYNC_PATTERN {
        SectorGeometry::new(2048, 0)
    } else if sync_at(reader, 2352)? {
        SectorGeometry::new(2352, 16)
    } else if sync_at(reader, 2368)? {
        SectorGeometry::new(2368, 16)
    } else {
        SectorGeometry::new(2448, 16)
    };
    geometry.leading_skip = u64::from(LEAD_IN_SECTORS) * u64::from(geometry.sector_length);
    Ok(geometry)
}

fn sync_at(reader: &mut dyn ReadSeek, offset: u64) -> io::Result<bool> {
    let mut buf = [0u8; 12];
    reader.seek(SeekFrom::Start(offset))?;
    read_fill(reader, &mut buf)?;
    Ok(buf == SYNC_PATTERN)
}

/// Sniff a Nero .nrg dump (v5+): cooked sectors behind a fixed
/// 307200-byte lead-in, gated only on a minimum file size.
pub fn sniff_nrg(reader: &mut dyn ReadSeek) -> SectorGeometry {
    probe(try_sniff_nrg(reader), "nrg")
}

fn try_sniff_nrg(reader: &mut dyn ReadSeek) -> io::Result<SectorGeometry> {
    let len = reader.seek(SeekFrom::End(0))?;
    if len <= MIN_IMAGE_LEN {
        return Ok(SectorGeometry::default());
    }
    Ok(SectorGeometry::with_skip(2048, 0, NRG_LEAD_IN_BYTES))
}

/// Pick a sniffer from the file extension and run it.
///
/// Unrecognized extensions are first checked for a cooked-image
/// "CD001" signature at the standard descriptor offset, then fall back
/// to the .bin probe. The returned format is the closest matching
/// enum variant for display; NRG/CDI lead-in layouts have no variant
/// of their own and report `Unknown` alongside a usable geometry.
pub fn detect(path: &Path, reader: &mut dyn ReadSeek) -> (ImageFileFormat, SectorGeometry) {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    let geometry = match ext.as_str() {
        "iso" => ImageFileFormat::Iso.geometry(),
        "bin" => sniff_bin(reader),
        "img" => sniff_ccd(reader),
        "mdf" => sniff_mdf(reader),
        "cdi" => sniff_cdi(reader),
        "nrg" => sniff_nrg(reader),
        _ => {
            if probe(has_cooked_signature(reader), "cooked") == SectorGeometry::new(2048, 0) {
                ImageFileFormat::Iso.geometry()
            } else {
                sniff_bin(reader)
            }
        }
    };

    let format = classify(&ext, &geometry);
    debug!(
        "detected {} for {} (sector {} + offset {}, skip {})",
        format.name(),
        path.display(),
        geometry.sector_length,
        geometry.user_data_offset,
        geometry.leading_skip
    );
    (format, geometry)
}

fn has_cooked_signature(reader: &mut dyn ReadSeek) -> io::Result<SectorGeometry> {
    let mut magic = [0u8; 5];
    reader.seek(SeekFrom::Start(16 * 2048 + 1))?;
    read_fill(reader, &mut magic)?;
    if &magic == b"CD001" {
        Ok(SectorGeometry::new(2048, 0))
    } else {
        Ok(SectorGeometry::default())
    }
}

fn classify(ext: &str, geometry: &SectorGeometry) -> ImageFileFormat {
    if !geometry.is_known() {
        return ImageFileFormat::Unknown;
    }
    if geometry.leading_skip != 0 {
        // NRG/CDI layouts carry their own lead-in and no dedicated variant.
        return ImageFileFormat::Unknown;
    }
    match (ext, geometry.sector_length, geometry.user_data_offset) {
        ("mdf", _, _) => ImageFileFormat::Mdf,
        ("img", 2352, 16) => ImageFileFormat::CcdMode1,
        ("img", 2352, 24) => ImageFileFormat::CcdMode2,
        (_, 2048, 0) => ImageFileFormat::Iso,
        (_, 2352, 16) => ImageFileFormat::BinMode1,
        (_, 2352, 24) => ImageFileFormat::BinMode2Form1,
        (_, 2336, 8) => ImageFileFormat::BinMode2Form2,
        _ => ImageFileFormat::Unknown,
    }
}

#[cfg(test)]
#[path = "tests/detect_tests.rs"]
mod tests;
