use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::LOGICAL_SECTOR_SIZE;

/// Physical layout of the sectors in a dump.
///
/// `sector_length` is the on-disk size of one physical sector,
/// `user_data_offset` is where the 2048 bytes of user data start inside
/// it, and `leading_skip` is a fixed byte count before the first sector
/// (NRG/CDI lead-in). An all-zero geometry means "not detected".
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorGeometry {
    pub sector_length: u32,
    pub user_data_offset: u32,
    pub leading_skip: u64,
}

impl SectorGeometry {
    pub const fn new(sector_length: u32, user_data_offset: u32) -> Self {
        Self {
            sector_length,
            user_data_offset,
            leading_skip: 0,
        }
    }

    pub const fn with_skip(sector_length: u32, user_data_offset: u32, leading_skip: u64) -> Self {
        Self {
            sector_length,
            user_data_offset,
            leading_skip,
        }
    }

    /// Whether detection produced a usable layout.
    pub fn is_known(&self) -> bool {
        self.sector_length != 0
    }

    /// Whether sectors carry header/ECC bytes around the user data.
    pub fn is_raw(&self) -> bool {
        self.sector_length != LOGICAL_SECTOR_SIZE
    }

    /// Absolute byte offset of the start of physical sector `lba`.
    pub fn block_offset(&self, lba: u32) -> u64 {
        self.leading_skip + u64::from(lba) * u64::from(self.sector_length)
    }

    /// Absolute byte offset of the user data inside physical sector `lba`.
    pub fn data_offset(&self, lba: u32) -> u64 {
        self.block_offset(lba) + u64::from(self.user_data_offset)
    }
}

/// The dump formats this library can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFileFormat {
    /// Plain 2048-byte logical image
    Iso,
    /// Raw 2352-byte sectors, Mode 1
    BinMode1,
    /// Raw 2352-byte sectors, Mode 2 Form 1
    BinMode2Form1,
    /// 2336-byte sectors, Mode 2 Form 2
    BinMode2Form2,
    /// Alcohol 120% image
    Mdf,
    /// CloneCD image, Mode 1
    CcdMode1,
    /// CloneCD image, Mode 2
    CcdMode2,
    /// Not yet determined
    Unknown,
}

impl ImageFileFormat {
    /// Static sector layout for formats that do not need a header probe.
    /// `Unknown` (and formats resolved purely by sniffing, like NRG/CDI
    /// lead-ins) come back all-zero and must go through detection.
    pub fn geometry(&self) -> SectorGeometry {
        match self {
            Self::Iso => SectorGeometry::new(2048, 0),
            Self::BinMode1 => SectorGeometry::new(2352, 16),
            Self::BinMode2Form1 => SectorGeometry::new(2352, 24),
            Self::BinMode2Form2 => SectorGeometry::new(2336, 8),
            Self::Mdf => SectorGeometry::new(2352, 16),
            Self::CcdMode1 => SectorGeometry::new(2352, 16),
            Self::CcdMode2 => SectorGeometry::new(2352, 24),
            Self::Unknown => SectorGeometry::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Iso => "ISO (2048-byte sectors)",
            Self::BinMode1 => "BIN Mode 1 (2352-byte sectors)",
            Self::BinMode2Form1 => "BIN Mode 2 Form 1 (2352-byte sectors)",
            Self::BinMode2Form2 => "BIN Mode 2 Form 2 (2336-byte sectors)",
            Self::Mdf => "MDF (Alcohol 120%)",
            Self::CcdMode1 => "CCD Mode 1 (CloneCD)",
            Self::CcdMode2 => "CCD Mode 2 (CloneCD)",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ImageFileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a format name on the command line is not recognized.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown image format '{0}' (expected iso, bin-mode1, bin-mode2-form1, bin-mode2-form2, mdf, ccd-mode1 or ccd-mode2)")]
pub struct FormatParseError(String);

impl FromStr for ImageFileFormat {
    type Err = FormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iso" => Ok(Self::Iso),
            "bin-mode1" | "bin1" => Ok(Self::BinMode1),
            "bin-mode2-form1" | "bin2f1" => Ok(Self::BinMode2Form1),
            "bin-mode2-form2" | "bin2f2" => Ok(Self::BinMode2Form2),
            "mdf" => Ok(Self::Mdf),
            "ccd-mode1" | "ccd1" => Ok(Self::CcdMode1),
            "ccd-mode2" | "ccd2" => Ok(Self::CcdMode2),
            "auto" | "unknown" => Ok(Self::Unknown),
            other => Err(FormatParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "tests/geometry_tests.rs"]
mod tests;
