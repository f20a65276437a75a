//! # Availability
//!
//! Turns calendar constraints into the candidate windows the optimizer may
//! fill. Every date in the requested range is checked against a fixed
//! catalogue of two-hour windows between 06:00 and 22:00. A window that
//! overlaps any work or class commitment on that date is dropped whole; the
//! remaining windows get an energy score from the user's readings.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{NaiveDate, Weekday};
//! use study_optimizer::availability::{derive_windows, Commitment, CommitmentKind};
//!
//! let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
//! let work = vec![Commitment::new(CommitmentKind::Work, Weekday::Mon, "09:00", "11:00")];
//!
//! let windows = derive_windows(&work, &[], &[], monday, monday).unwrap();
//! assert_eq!(windows.len(), 6);
//! ```

pub mod commitment;
pub mod window;

pub use commitment::{
    day_label, parse_weekday, Commitment, CommitmentKind, CommitmentRecord, EnergyReading,
    TimeOfDay,
};
pub use window::{Window, WindowKey};

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::error::Result;
use crate::time::{calculate_duration, is_overlapping, time_to_hours};

/// The standard windows offered on every day, in output order.
pub const STANDARD_WINDOWS: [(&str, &str); 8] = [
    ("06:00", "08:00"),
    ("08:00", "10:00"),
    ("10:00", "12:00"),
    ("12:00", "14:00"),
    ("14:00", "16:00"),
    ("16:00", "18:00"),
    ("18:00", "20:00"),
    ("20:00", "22:00"),
];

/// Energy score used when no reading applies to a window.
pub const DEFAULT_ENERGY_LEVEL: u8 = 5;

/// Derives the open windows for every date in `[start_date, end_date]`.
///
/// Output is ordered by date, then by catalogue order within a date. A range
/// with `start_date > end_date` yields no windows, and a day whose windows are
/// all blocked is simply absent.
///
/// # Errors
///
/// Returns `PlannerError::InvalidTime` if a commitment carries a malformed
/// clock time.
pub fn derive_windows(
    work: &[Commitment],
    classes: &[Commitment],
    energy_levels: &[EnergyReading],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<Window>> {
    let mut windows = Vec::new();
    let mut num_dates = 0usize;

    for date in start_date.iter_days().take_while(|date| *date <= end_date) {
        num_dates += 1;
        let weekday = date.weekday();

        let busy: Vec<&Commitment> = work
            .iter()
            .chain(classes)
            .filter(|commitment| commitment.applies_to(date, weekday))
            .collect();
        let energy_for_day: Vec<&EnergyReading> = energy_levels
            .iter()
            .filter(|reading| reading.day == weekday)
            .collect();

        for (start_time, end_time) in STANDARD_WINDOWS {
            if overlaps_any(start_time, end_time, &busy)? {
                continue;
            }

            windows.push(Window {
                day: weekday,
                date,
                start_time: start_time.to_string(),
                end_time: end_time.to_string(),
                duration: calculate_duration(start_time, end_time)?,
                energy_level: energy_level_for(start_time, &energy_for_day)?,
            });
        }
    }

    debug!(
        num_dates,
        num_windows = windows.len(),
        "derived available windows"
    );

    Ok(windows)
}

fn overlaps_any(start_time: &str, end_time: &str, busy: &[&Commitment]) -> Result<bool> {
    for commitment in busy {
        if is_overlapping(
            start_time,
            end_time,
            &commitment.start_time,
            &commitment.end_time,
        )? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn energy_level_for(start_time: &str, readings: &[&EnergyReading]) -> Result<u8> {
    if readings.is_empty() {
        return Ok(DEFAULT_ENERGY_LEVEL);
    }

    let bucket = TimeOfDay::from_hour(time_to_hours(start_time)?);
    Ok(readings
        .iter()
        .find(|reading| reading.time_slot == bucket)
        .map(|reading| reading.level)
        .unwrap_or(DEFAULT_ENERGY_LEVEL))
}
