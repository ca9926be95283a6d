// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for time-of-day parsing and duration formatting.

use crate::error::TimeFormatError;
use chrono::{NaiveTime, TimeDelta, Timelike};

/// Parse a strict 24-hour `HH:MM:SS` string into a time of day.
///
/// Exactly two digits per component are required; hours must be at most 23
/// and minutes/seconds at most 59 (no leap seconds).
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, TimeFormatError> {
    let err = || TimeFormatError {
        value: value.to_string(),
    };

    let bytes = value.as_bytes();
    if bytes.len() != 8 || bytes[2] != b':' || bytes[5] != b':' {
        return Err(err());
    }

    let component = |at: usize| -> Option<u32> {
        let (hi, lo) = (bytes[at], bytes[at + 1]);
        if hi.is_ascii_digit() && lo.is_ascii_digit() {
            Some(u32::from(hi - b'0') * 10 + u32::from(lo - b'0'))
        } else {
            None
        }
    };

    let (hour, minute, second) = match (component(0), component(3), component(6)) {
        (Some(h), Some(m), Some(s)) => (h, m, s),
        _ => return Err(err()),
    };

    // from_hms_opt already rejects hour > 23 and minute/second > 59
    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(err)
}

/// Format a time of day as `HH:MM:SS`.
pub fn format_time_of_day(time: NaiveTime) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    )
}

/// Human readable duration: `H:MM:SS` when it spans hours, `MM:SS` when it
/// spans minutes, otherwise `SSs`. Negative durations get a leading `-`.
pub fn format_duration_human(duration: TimeDelta) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours != 0 {
        format!("{sign}{hours}:{minutes:02}:{seconds:02}")
    } else if minutes != 0 {
        format!("{sign}{minutes:02}:{seconds:02}")
    } else {
        format!("{sign}{seconds:02}s")
    }
}

/// Axis label for an elapsed time in seconds: `H:MM`.
pub fn format_hours_mins(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let seconds = seconds.abs();
    format!("{sign}{}:{:02}", seconds / 3600, (seconds % 3600) / 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for value in ["00:00:00", "07:31:21", "12:05:09", "17:14:53", "23:59:59"] {
            let time = parse_time_of_day(value).expect("valid time");
            assert_eq!(format_time_of_day(time), value);
        }
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        for value in ["25:00:00", "24:00:00", "12:61:00", "12:00:60", "99:99:99"] {
            let err = parse_time_of_day(value).unwrap_err();
            assert_eq!(err.value, value);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for value in ["", "7:31:21", "07:31", "07-31-21", "07:31:21 ", " 07:31:21", "aa:bb:cc", "07:3a:21"] {
            assert!(parse_time_of_day(value).is_err(), "{value:?} should fail");
        }
    }

    #[test]
    fn test_format_duration_human() {
        assert_eq!(format_duration_human(TimeDelta::seconds(35012)), "9:43:32");
        assert_eq!(format_duration_human(TimeDelta::seconds(3600)), "1:00:00");
        assert_eq!(format_duration_human(TimeDelta::seconds(754)), "12:34");
        assert_eq!(format_duration_human(TimeDelta::seconds(65)), "01:05");
        assert_eq!(format_duration_human(TimeDelta::seconds(7)), "07s");
        assert_eq!(format_duration_human(TimeDelta::seconds(-90)), "-01:30");
    }

    #[test]
    fn test_format_hours_mins() {
        assert_eq!(format_hours_mins(35012), "9:43");
        assert_eq!(format_hours_mins(0), "0:00");
        assert_eq!(format_hours_mins(-1800), "-0:30");
    }
}
