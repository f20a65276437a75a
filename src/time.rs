//! Clock-time arithmetic on `HH:MM` strings.
//!
//! Times are converted to fractional hours (`"09:30"` is `9.5`). Intervals are
//! half-open, so two intervals that only touch at a boundary do not overlap.

use chrono::{NaiveTime, Timelike};

use crate::error::{PlannerError, Result};

/// Converts a clock-time string to fractional hours.
///
/// Accepts `H:MM` or `HH:MM` with hours in `0..=24` and minutes in `0..60`.
/// `"24:00"` is accepted as the end of the day.
///
/// ```rust
/// use study_optimizer::time::time_to_hours;
///
/// assert_eq!(time_to_hours("09:30").unwrap(), 9.5);
/// assert!(time_to_hours("9h30").is_err());
/// ```
pub fn time_to_hours(time: &str) -> Result<f64> {
    let invalid = || PlannerError::InvalidTime(time.to_string());

    let trimmed = time.trim();
    if trimmed == "24:00" {
        return Ok(24.0);
    }
    // `%M` alone would also take a single digit or leading whitespace
    let bytes = trimmed.as_bytes();
    let well_formed = bytes.len() >= 4
        && bytes[bytes.len() - 3] == b':'
        && bytes.iter().filter(|b| b.is_ascii_digit()).count() == bytes.len() - 1;
    if !well_formed {
        return Err(invalid());
    }

    let parsed = NaiveTime::parse_from_str(trimmed, "%H:%M").map_err(|_| invalid())?;
    Ok(parsed.hour() as f64 + parsed.minute() as f64 / 60.0)
}

/// Returns the duration between two clock times in hours.
pub fn calculate_duration(start_time: &str, end_time: &str) -> Result<f64> {
    Ok(time_to_hours(end_time)? - time_to_hours(start_time)?)
}

/// Tests whether `[start1, end1)` and `[start2, end2)` overlap.
///
/// ```rust
/// use study_optimizer::time::is_overlapping;
///
/// assert!(is_overlapping("09:00", "11:00", "10:00", "12:00").unwrap());
/// assert!(!is_overlapping("09:00", "10:00", "10:00", "11:00").unwrap());
/// ```
pub fn is_overlapping(start1: &str, end1: &str, start2: &str, end2: &str) -> Result<bool> {
    let s1 = time_to_hours(start1)?;
    let e1 = time_to_hours(end1)?;
    let s2 = time_to_hours(start2)?;
    let e2 = time_to_hours(end2)?;

    Ok(s1.max(s2) < e1.min(e2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_to_hours() {
        assert_eq!(time_to_hours("06:00").unwrap(), 6.0);
        assert_eq!(time_to_hours("9:45").unwrap(), 9.75);
        assert_eq!(time_to_hours("00:00").unwrap(), 0.0);
        assert_eq!(time_to_hours("24:00").unwrap(), 24.0);
        assert_eq!(time_to_hours(" 13:15 ").unwrap(), 13.25);
    }

    #[test]
    fn test_time_to_hours_rejects_malformed() {
        let malformed = [
            "", "12", "12:5", "12:60", "25:00", "24:30", "ab:cd", "-1:00", "123:00", "+9:00",
            "09: 5", "12:00:00",
        ];
        for bad in malformed {
            assert!(
                matches!(time_to_hours(bad), Err(PlannerError::InvalidTime(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_calculate_duration() {
        assert_eq!(calculate_duration("06:00", "08:00").unwrap(), 2.0);
        assert_eq!(calculate_duration("13:15", "14:45").unwrap(), 1.5);
    }

    #[test]
    fn test_overlap_partial() {
        assert!(is_overlapping("09:00", "11:00", "10:00", "12:00").unwrap());
        assert!(is_overlapping("10:00", "12:00", "09:00", "11:00").unwrap());
    }

    #[test]
    fn test_touching_boundary_is_not_overlap() {
        assert!(!is_overlapping("09:00", "10:00", "10:00", "11:00").unwrap());
        assert!(!is_overlapping("10:00", "11:00", "09:00", "10:00").unwrap());
    }

    #[test]
    fn test_containment_is_overlap() {
        assert!(is_overlapping("08:00", "12:00", "09:00", "10:00").unwrap());
    }
}
