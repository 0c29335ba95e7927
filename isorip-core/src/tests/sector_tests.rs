use std::io::Cursor;

use super::*;
use crate::fixtures;

#[test]
fn clean_strips_raw_framing() {
    let cooked: Vec<u8> = (0..4096u32).map(|i| i as u8).collect();
    let raw = fixtures::wrap_raw(&cooked, 2352, 16);
    let geometry = SectorGeometry::new(2352, 16);

    assert_eq!(clean_sectors(&raw, 4096, &geometry), cooked);
}

#[test]
fn clean_handles_partial_trailing_sector() {
    let cooked: Vec<u8> = (0..4096u32).map(|i| i as u8).collect();
    let raw = fixtures::wrap_raw(&cooked, 2352, 24);
    let geometry = SectorGeometry::new(2352, 24);

    // 3000 bytes spans one full sector plus 952 bytes of the next.
    assert_eq!(clean_sectors(&raw, 3000, &geometry), &cooked[..3000]);
}

#[test]
fn clean_is_a_truncating_copy_for_cooked_sectors() {
    let cooked: Vec<u8> = (0..4096u32).map(|i| i as u8).collect();
    let geometry = SectorGeometry::new(2048, 0);

    assert_eq!(clean_sectors(&cooked, 2500, &geometry), &cooked[..2500]);
}

#[test]
fn clean_stops_at_short_source() {
    let geometry = SectorGeometry::new(2352, 16);
    let raw = vec![0u8; 100];
    // Asking for more than the source holds returns what was there.
    assert_eq!(clean_sectors(&raw, 2048, &geometry).len(), 84);
}

#[test]
fn read_sectors_seeks_by_physical_sector() {
    let cooked: Vec<u8> = (0..8192u32).map(|i| i as u8).collect();
    let raw = fixtures::wrap_raw(&cooked, 2352, 16);
    let mut cursor = Cursor::new(raw.clone());
    let geometry = SectorGeometry::new(2352, 16);

    let data = read_sectors(&mut cursor, &geometry, 2, 2).unwrap();
    assert_eq!(data, &raw[2 * 2352..4 * 2352]);
}

#[test]
fn read_sectors_zero_pads_past_eof() {
    let mut cursor = Cursor::new(vec![0xAAu8; 3000]);
    let geometry = SectorGeometry::new(2048, 0);

    let data = read_sectors(&mut cursor, &geometry, 0, 2).unwrap();
    assert_eq!(data.len(), 4096);
    assert_eq!(data[2999], 0xAA);
    assert_eq!(data[3000], 0);
}

#[test]
fn read_sectors_honors_leading_skip() {
    let mut image = vec![0u8; 1000 + 2048];
    image[1000] = 0x42;
    let mut cursor = Cursor::new(image);
    let geometry = SectorGeometry::with_skip(2048, 0, 1000);

    let data = read_sectors(&mut cursor, &geometry, 0, 1).unwrap();
    assert_eq!(data[0], 0x42);
}
