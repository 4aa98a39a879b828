//! Rendering and parsing of clock readings.

use crate::ConfigError;

/// Formats seconds the way a clock face shows them: `m:ss` below an
/// hour, `h:mm:ss` from an hour up.
///
/// ```
/// use seatclock_core::format_clock;
///
/// assert_eq!(format_clock(0), "0:00");
/// assert_eq!(format_clock(95), "1:35");
/// assert_eq!(format_clock(3_725), "1:02:05");
/// ```
pub fn format_clock(seconds: u32) -> String {
    let hours = seconds / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Parses typed clock input: plain seconds (`"90"`), `m:ss` (`"5:00"`)
/// or `h:mm:ss` (`"1:30:00"`). Every field after the first must be
/// below 60.
///
/// # Errors
/// Returns [`ConfigError::InvalidClockInput`] for anything else,
/// including values that overflow `u32` seconds.
pub fn parse_clock(input: &str) -> Result<u32, ConfigError> {
    let invalid = || ConfigError::InvalidClockInput(input.to_string());

    let fields = input
        .trim()
        .split(':')
        .map(|field| field.trim().parse::<u32>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;

    let (first, rest) = match fields.split_first() {
        Some(split) if fields.len() <= 3 => split,
        _ => return Err(invalid()),
    };
    if rest.iter().any(|field| *field >= 60) {
        return Err(invalid());
    }

    rest.iter().try_fold(*first, |total, field| {
        total
            .checked_mul(60)
            .and_then(|t| t.checked_add(*field))
            .ok_or_else(invalid)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_under_a_minute() {
        assert_eq!(format_clock(7), "0:07");
        assert_eq!(format_clock(59), "0:59");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_clock(60), "1:00");
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_clock(3_599), "59:59");
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_clock(3_600), "1:00:00");
        assert_eq!(format_clock(36_061), "10:01:01");
    }

    #[test]
    fn test_parse_plain_seconds() {
        assert_eq!(parse_clock("90"), Ok(90));
        assert_eq!(parse_clock(" 0 "), Ok(0));
    }

    #[test]
    fn test_parse_minutes_and_hours() {
        assert_eq!(parse_clock("5:00"), Ok(300));
        assert_eq!(parse_clock("1:30:00"), Ok(5_400));
        assert_eq!(parse_clock("0:45"), Ok(45));
    }

    #[test]
    fn test_parse_inverts_format() {
        for secs in [0, 1, 59, 61, 3_599, 3_600, 86_399] {
            assert_eq!(parse_clock(&format_clock(secs)), Ok(secs));
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "abc", "1:60", "1:2:3:4", "-5", "1::2", "4294967295:00"] {
            assert!(
                matches!(parse_clock(input), Err(ConfigError::InvalidClockInput(_))),
                "{input:?} should be rejected"
            );
        }
    }
}
