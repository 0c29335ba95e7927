use super::*;

#[test]
fn static_geometry_table() {
    assert_eq!(ImageFileFormat::Iso.geometry(), SectorGeometry::new(2048, 0));
    assert_eq!(
        ImageFileFormat::BinMode1.geometry(),
        SectorGeometry::new(2352, 16)
    );
    assert_eq!(
        ImageFileFormat::BinMode2Form1.geometry(),
        SectorGeometry::new(2352, 24)
    );
    assert_eq!(
        ImageFileFormat::BinMode2Form2.geometry(),
        SectorGeometry::new(2336, 8)
    );
    assert_eq!(ImageFileFormat::Mdf.geometry(), SectorGeometry::new(2352, 16));
    assert_eq!(
        ImageFileFormat::CcdMode1.geometry(),
        SectorGeometry::new(2352, 16)
    );
    assert_eq!(
        ImageFileFormat::CcdMode2.geometry(),
        SectorGeometry::new(2352, 24)
    );
}

#[test]
fn unknown_format_has_no_geometry() {
    let geometry = ImageFileFormat::Unknown.geometry();
    assert!(!geometry.is_known());
    assert_eq!(geometry, SectorGeometry::default());
}

#[test]
fn raw_and_cooked() {
    assert!(!ImageFileFormat::Iso.geometry().is_raw());
    assert!(ImageFileFormat::BinMode1.geometry().is_raw());
}

#[test]
fn offsets_include_leading_skip() {
    let geometry = SectorGeometry::with_skip(2048, 0, 307200);
    assert_eq!(geometry.block_offset(0), 307200);
    assert_eq!(geometry.block_offset(16), 307200 + 16 * 2048);

    let raw = SectorGeometry::new(2352, 16);
    assert_eq!(raw.data_offset(16), 16 * 2352 + 16);
}

#[test]
fn parse_format_names() {
    assert_eq!("iso".parse::<ImageFileFormat>().unwrap(), ImageFileFormat::Iso);
    assert_eq!(
        "bin-mode2-form1".parse::<ImageFileFormat>().unwrap(),
        ImageFileFormat::BinMode2Form1
    );
    assert_eq!(
        "MDF".parse::<ImageFileFormat>().unwrap(),
        ImageFileFormat::Mdf
    );
    assert!("floppy".parse::<ImageFileFormat>().is_err());
}
