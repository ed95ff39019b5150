//! Windows filetime conversion.
//!
//! Journal records stamp times as 100-nanosecond intervals since
//! 1601-01-01 UTC. Conversion truncates to whole microseconds, so a
//! round trip loses the sub-microsecond remainder: `t` comes back as
//! `t - (t % 10)`.

use chrono::{DateTime, Utc};
use serde::Serializer;

/// Microseconds between 1601-01-01 and the Unix epoch.
const UNIX_TO_FILETIME_MICROS: i64 = 11_644_473_600_000_000;

/// Convert a raw filetime into a UTC datetime.
///
/// Zero and values outside the representable range map to `None`.
pub fn filetime_to_datetime(filetime: u64) -> Option<DateTime<Utc>> {
    if filetime == 0 {
        return None;
    }
    let micros_since_1601 = i64::try_from(filetime / 10).ok()?;
    let micros_since_unix = micros_since_1601.checked_sub(UNIX_TO_FILETIME_MICROS)?;
    DateTime::from_timestamp_micros(micros_since_unix)
}

/// Convert a UTC datetime back into a filetime.
///
/// Times before 1601 clamp to zero.
pub fn datetime_to_filetime(datetime: &DateTime<Utc>) -> u64 {
    let micros = datetime.timestamp_micros() + UNIX_TO_FILETIME_MICROS;
    u64::try_from(micros).unwrap_or(0) * 10
}

/// Render a record time the way the sink and the CSV export display it:
/// `YYYY-MM-DDTHH:MM:SS`, with a fractional part only when it is non-zero.
pub fn format_timestamp(datetime: &DateTime<Utc>) -> String {
    let base = datetime.format("%Y-%m-%dT%H:%M:%S").to_string();
    let micros = datetime.timestamp_subsec_micros();
    if micros == 0 {
        base
    } else {
        format!("{base}.{micros:06}")
    }
}

/// Serde helper for [`crate::types::ChangeEntry::timestamp`].
pub fn serialize_timestamp<S>(
    timestamp: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match timestamp {
        Some(datetime) => serializer.serialize_str(&format_timestamp(datetime)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Filetime of 1970-01-01T00:00:00Z.
    const UNIX_EPOCH_FILETIME: u64 = 116_444_736_000_000_000;

    #[test]
    fn test_zero_is_none() {
        assert_eq!(filetime_to_datetime(0), None);
    }

    #[test]
    fn test_unix_epoch() {
        let datetime = filetime_to_datetime(UNIX_EPOCH_FILETIME).unwrap();
        assert_eq!(format_timestamp(&datetime), "1970-01-01T00:00:00");
    }

    #[test]
    fn test_fractional_seconds() {
        // 1.234567 seconds past the epoch
        let datetime = filetime_to_datetime(UNIX_EPOCH_FILETIME + 12_345_670).unwrap();
        assert_eq!(format_timestamp(&datetime), "1970-01-01T00:00:01.234567");
    }

    #[test]
    fn test_overflow_is_none() {
        assert_eq!(filetime_to_datetime(u64::MAX), None);
    }

    #[test]
    fn test_round_trip_truncates_to_microseconds() {
        for filetime in [
            1u64,
            9,
            10,
            11,
            UNIX_EPOCH_FILETIME,
            UNIX_EPOCH_FILETIME + 12_345_678,
            133_500_000_000_000_123,
        ] {
            let datetime = filetime_to_datetime(filetime).unwrap();
            assert_eq!(
                datetime_to_filetime(&datetime),
                filetime - (filetime % 10),
                "filetime {filetime}"
            );
        }
    }
}
