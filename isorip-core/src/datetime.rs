//! Decoders for the two ISO9660 timestamp encodings.

use chrono::{DateTime, NaiveDate, Utc};

/// Decode a 17-byte volume descriptor timestamp ("YYYYMMDDHHMMSScc"
/// digits plus a GMT offset byte). All-zero digits are the unset
/// sentinel and come back as `None`, as does anything non-numeric.
pub fn decode_volume_datetime(bytes: &[u8]) -> Option<DateTime<Utc>> {
    if bytes.len() < 17 {
        return None;
    }

    let digits = &bytes[..16];
    if !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }

    let field = |range: std::ops::Range<usize>| -> u32 {
        digits[range]
            .iter()
            .fold(0u32, |acc, &b| acc * 10 + u32::from(b - b'0'))
    };

    let year = field(0..4);
    let month = field(4..6);
    let day = field(6..8);
    if year == 0 || month == 0 || day == 0 {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(year as i32, month, day)?;
    let time = date.and_hms_opt(field(8..10), field(10..12), field(12..14))?;
    Some(time.and_utc())
}

/// Decode a 7-byte directory record timestamp (years since 1900,
/// month, day, hour, minute, second, GMT offset).
pub fn decode_record_datetime(bytes: &[u8; 7]) -> Option<DateTime<Utc>> {
    let year = 1900 + i32::from(bytes[0]);
    let date = NaiveDate::from_ymd_opt(year, u32::from(bytes[1]), u32::from(bytes[2]))?;
    let time = date.and_hms_opt(
        u32::from(bytes[3]),
        u32::from(bytes[4]),
        u32::from(bytes[5]),
    )?;
    Some(time.and_utc())
}

#[cfg(test)]
#[path = "tests/datetime_tests.rs"]
mod tests;
