use chrono::{Datelike, Timelike};

use super::*;
use crate::fixtures;
use crate::geometry::ImageFileFormat;

#[test]
fn reads_primary_descriptor() {
    let mut cursor = fixtures::build_cursor();
    let geometry = ImageFileFormat::Iso.geometry();

    let volume = read_volume_descriptor(&mut cursor, &geometry).unwrap();

    assert_eq!(volume.volume_type, VolumeType::PrimaryVolumeDescriptor);
    assert_eq!(volume.standard_identifier, "CD001");
    assert_eq!(volume.version, 1);
    assert_eq!(volume.system_identifier, "TESTSYS");
    assert_eq!(volume.volume_identifier, "TESTVOL");
    assert_eq!(volume.volume_space_size, fixtures::TOTAL_SECTORS);
    assert_eq!(volume.logical_block_size, 2048);
    assert_eq!(volume.type_l_path_table_lba, fixtures::PATH_TABLE_SECTOR);
    assert_eq!(volume.root_dir_extent, fixtures::ROOT_DIR_SECTOR);
    assert_eq!(volume.root_dir_length, 2048);
    assert_eq!(volume.publisher_identifier, "TESTPUB");
    assert_eq!(volume.file_structure_version, 1);
}

#[test]
fn decodes_creation_date_and_sentinels() {
    let mut cursor = fixtures::build_cursor();
    let geometry = ImageFileFormat::Iso.geometry();

    let volume = read_volume_descriptor(&mut cursor, &geometry).unwrap();

    let created = volume.creation_date.unwrap();
    assert_eq!((created.year(), created.month(), created.day()), (2004, 6, 17));
    assert_eq!((created.hour(), created.minute()), (14, 23));
    assert!(volume.modification_date.is_none());
    assert!(volume.expiration_date.is_none());
    assert!(volume.effective_date.is_none());
}

#[test]
fn reads_descriptor_from_raw_sectors() {
    for (len, off) in [(2352usize, 16usize), (2352, 24), (2336, 8)] {
        let mut cursor = fixtures::build_raw_cursor(len, off);
        let geometry = crate::geometry::SectorGeometry::new(len as u32, off as u32);

        let volume = read_volume_descriptor(&mut cursor, &geometry).unwrap();
        assert_eq!(volume.volume_identifier, "TESTVOL");
        assert_eq!(volume.root_dir_extent, fixtures::ROOT_DIR_SECTOR);
    }
}

#[test]
fn last_descriptor_before_terminator_wins() {
    let mut image = fixtures::build_image();

    // Move the terminator one sector later and put a second descriptor
    // with a different volume id in front of it.
    let mut second = fixtures::make_pvd_sector(22);
    second[40..47].copy_from_slice(b"SECOND ");
    let term = fixtures::make_terminator_sector();
    image[17 * 2048..18 * 2048].copy_from_slice(&second);
    image[18 * 2048..19 * 2048].copy_from_slice(&term);
    // Sector 18 was spare; the path table at 19 is untouched.

    let mut cursor = std::io::Cursor::new(image);
    let geometry = ImageFileFormat::Iso.geometry();
    let volume = read_volume_descriptor(&mut cursor, &geometry).unwrap();

    assert_eq!(volume.volume_identifier, "SECOND");
}

#[test]
fn missing_descriptor_is_an_error() {
    let mut image = vec![0u8; 20 * 2048];
    image[16 * 2048] = 255;
    let mut cursor = std::io::Cursor::new(image);
    let geometry = ImageFileFormat::Iso.geometry();

    assert!(matches!(
        read_volume_descriptor(&mut cursor, &geometry),
        Err(ImageError::InvalidFormat(_))
    ));
}

#[test]
fn bad_standard_identifier_is_an_error() {
    let mut image = fixtures::build_image();
    image[16 * 2048 + 1..16 * 2048 + 6].copy_from_slice(b"XXXXX");
    let mut cursor = std::io::Cursor::new(image);
    let geometry = ImageFileFormat::Iso.geometry();

    assert!(matches!(
        read_volume_descriptor(&mut cursor, &geometry),
        Err(ImageError::InvalidFormat(_))
    ));
}
