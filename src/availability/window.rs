use chrono::{NaiveDate, Weekday};

/// A candidate time interval on a specific date, annotated with an energy score.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    #[cfg_attr(
        feature = "serde",
        serde(with = "crate::availability::commitment::weekday_label")
    )]
    pub day: Weekday,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    /// Length of the window in hours.
    pub duration: f64,
    /// Energy score from 1 to 10.
    pub energy_level: u8,
}

impl Window {
    pub fn key(&self) -> WindowKey<'_> {
        WindowKey {
            date: self.date,
            start_time: &self.start_time,
            end_time: &self.end_time,
        }
    }
}

/// Identity of a window inside one candidate schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowKey<'a> {
    pub date: NaiveDate,
    pub start_time: &'a str,
    pub end_time: &'a str,
}
