//! Core ISO9660 decoding for disc images and raw sector dumps.
//!
//! Everything in this crate operates on a caller-supplied byte stream:
//! sector-geometry detection for the supported dump formats (BIN, MDF,
//! CCD, CDI, NRG), the volume descriptor, the Type-L path table,
//! directory records, and the sector-cleaning transform that turns raw
//! physical sectors into 2048-byte logical user data. No filesystem
//! output happens here; see `isorip-lib` for the extraction engine.

use std::io::{Read, Seek};

pub mod datetime;
pub mod detect;
pub mod directory;
pub mod error;
pub mod geometry;
pub mod path_table;
pub mod sector;
pub mod util;
pub mod volume;

pub use directory::{DirEntry, list_entries};
pub use error::ImageError;
pub use geometry::{FormatParseError, ImageFileFormat, SectorGeometry};
pub use path_table::{PathTable, PathTableRecord, read_path_table};
pub use volume::{VolumeInfo, VolumeType, read_volume_descriptor};

/// Size of one logical ISO9660 block (user data only).
pub const LOGICAL_SECTOR_SIZE: u32 = 2048;

/// A reader that implements both Read and Seek.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

#[cfg(test)]
#[path = "tests/fixtures.rs"]
pub(crate) mod fixtures;
