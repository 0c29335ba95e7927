use super::*;

#[test]
fn little_endian_reads() {
    let data = [0x00, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
    assert_eq!(read_u16_le(&data, 1), 0x1234);
    assert_eq!(read_u32_le(&data, 3), 0x12345678);
}

#[test]
fn identifiers_trim_padding() {
    assert_eq!(decode_identifier(b"MY_VOLUME       "), "MY_VOLUME");
    assert_eq!(decode_identifier(b"ABC\0\0\0"), "ABC");
    assert_eq!(decode_identifier(b"        "), "");
}

#[test]
fn primary_names_are_single_byte() {
    assert_eq!(
        decode_name(b"README.TXT;1", VolumeType::PrimaryVolumeDescriptor),
        "README.TXT;1"
    );
    // Even length stays single-byte on a primary volume.
    assert_eq!(
        decode_name(b"ABCD", VolumeType::PrimaryVolumeDescriptor),
        "ABCD"
    );
}

#[test]
fn supplementary_names_decode_ucs2_on_even_length() {
    let bytes = [0x00, b'A', 0x00, b'B', 0x00, b'C'];
    assert_eq!(
        decode_name(&bytes, VolumeType::SupplementaryVolumeDescriptor),
        "ABC"
    );
}

#[test]
fn supplementary_odd_length_falls_back_to_single_byte() {
    assert_eq!(
        decode_name(&[0], VolumeType::SupplementaryVolumeDescriptor),
        "\0"
    );
    assert_eq!(
        decode_name(b"ABC", VolumeType::SupplementaryVolumeDescriptor),
        "ABC"
    );
}
