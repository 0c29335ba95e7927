use chrono::{Datelike, Timelike};

use super::*;

#[test]
fn volume_datetime_decodes() {
    let date = decode_volume_datetime(b"2004061714230800\0").unwrap();
    assert_eq!(
        (date.year(), date.month(), date.day()),
        (2004, 6, 17)
    );
    assert_eq!((date.hour(), date.minute(), date.second()), (14, 23, 8));
}

#[test]
fn volume_datetime_zero_sentinel() {
    assert!(decode_volume_datetime(b"0000000000000000\0").is_none());
}

#[test]
fn volume_datetime_rejects_garbage() {
    assert!(decode_volume_datetime(b"20040617142308XX\0").is_none());
    assert!(decode_volume_datetime(b"short").is_none());
    // Month 13 is not a date.
    assert!(decode_volume_datetime(b"2004131714230800\0").is_none());
}

#[test]
fn record_datetime_decodes() {
    let date = decode_record_datetime(&[104, 6, 17, 14, 23, 8, 0]).unwrap();
    assert_eq!((date.year(), date.month(), date.day()), (2004, 6, 17));
    assert_eq!((date.hour(), date.minute(), date.second()), (14, 23, 8));
}

#[test]
fn record_datetime_invalid_fields() {
    assert!(decode_record_datetime(&[104, 0, 0, 0, 0, 0, 0]).is_none());
    assert!(decode_record_datetime(&[104, 13, 1, 0, 0, 0, 0]).is_none());
}
