//! Fixed commitments and energy readings as they arrive from the stores.

use std::str::FromStr;

use chrono::{NaiveDate, Weekday};

use crate::error::{PlannerError, Result};
use crate::time::time_to_hours;

/// Parses an upper-case weekday label such as `MONDAY`. Three-letter
/// abbreviations and any letter case are accepted too.
pub fn parse_weekday(label: &str) -> Result<Weekday> {
    let day = match label.trim().to_ascii_uppercase().as_str() {
        "MONDAY" | "MON" => Weekday::Mon,
        "TUESDAY" | "TUE" => Weekday::Tue,
        "WEDNESDAY" | "WED" => Weekday::Wed,
        "THURSDAY" | "THU" => Weekday::Thu,
        "FRIDAY" | "FRI" => Weekday::Fri,
        "SATURDAY" | "SAT" => Weekday::Sat,
        "SUNDAY" | "SUN" => Weekday::Sun,
        other => {
            return Err(PlannerError::invalid(
                "day",
                format!("unknown weekday '{}'", other),
            ))
        }
    };
    Ok(day)
}

/// The upper-case label used for a weekday in stored records.
pub fn day_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}

/// Serde adapter that stores a weekday as its upper-case label.
///
/// Use with `#[serde(with = "crate::availability::commitment::weekday_label")]`.
#[cfg(feature = "serde")]
pub mod weekday_label {
    use chrono::Weekday;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::{day_label, parse_weekday};

    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(day_label(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let label = String::deserialize(deserializer)?;
        parse_weekday(&label).map_err(|err| de::Error::custom(format!("invalid weekday: {err}")))
    }
}

/// The kind of a stored schedule entry.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitmentKind {
    Work,
    Class,
    Study,
}

impl FromStr for CommitmentKind {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WORK" => Ok(CommitmentKind::Work),
            "CLASS" => Ok(CommitmentKind::Class),
            "STUDY" => Ok(CommitmentKind::Study),
            other => Err(PlannerError::invalid(
                "type",
                format!("unknown schedule type '{}'", other),
            )),
        }
    }
}

/// A fixed block of time, recurring on a weekday or pinned to a date.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Commitment {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: CommitmentKind,
    #[cfg_attr(feature = "serde", serde(with = "weekday_label"))]
    pub day: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub date: Option<NaiveDate>,
    pub title: Option<String>,
}

impl Commitment {
    pub fn new(
        kind: CommitmentKind,
        day: Weekday,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            day,
            start_time: start_time.into(),
            end_time: end_time.into(),
            date: None,
            title: None,
        }
    }

    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Whether this commitment occupies time on `date`, either through its
    /// weekday or through its explicit date.
    pub fn applies_to(&self, date: NaiveDate, weekday: Weekday) -> bool {
        self.day == weekday || self.date == Some(date)
    }

    /// Splits stored entries into work and class commitments. Study entries
    /// are not fixed commitments and are dropped.
    pub fn partition(commitments: Vec<Commitment>) -> (Vec<Commitment>, Vec<Commitment>) {
        let mut work = Vec::new();
        let mut classes = Vec::new();
        for commitment in commitments {
            match commitment.kind {
                CommitmentKind::Work => work.push(commitment),
                CommitmentKind::Class => classes.push(commitment),
                CommitmentKind::Study => {}
            }
        }
        (work, classes)
    }
}

/// A schedule entry exactly as submitted, before any field is checked.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitmentRecord {
    pub day: Option<String>,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub date: Option<NaiveDate>,
    pub title: Option<String>,
}

impl CommitmentRecord {
    /// Converts a bulk-create batch, failing on the first invalid record.
    pub fn validate_all(records: Vec<CommitmentRecord>) -> Result<Vec<Commitment>> {
        records.into_iter().map(Commitment::try_from).collect()
    }
}

impl TryFrom<CommitmentRecord> for Commitment {
    type Error = PlannerError;

    fn try_from(record: CommitmentRecord) -> Result<Self> {
        let day = record.day.ok_or(PlannerError::MissingField("day"))?;
        let kind = record.kind.ok_or(PlannerError::MissingField("type"))?;
        let start_time = record
            .start_time
            .ok_or(PlannerError::MissingField("startTime"))?;
        let end_time = record.end_time.ok_or(PlannerError::MissingField("endTime"))?;

        time_to_hours(&start_time)?;
        time_to_hours(&end_time)?;

        Ok(Commitment {
            kind: kind.parse()?,
            day: parse_weekday(&day)?,
            start_time,
            end_time,
            date: record.date,
            title: record.title,
        })
    }
}

/// Time-of-day bucket used to match energy readings to windows.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Buckets a start hour: morning `[5,12)`, afternoon `[12,17)`,
    /// evening `[17,21)`, night otherwise.
    pub fn from_hour(hour: f64) -> Self {
        if (5.0..12.0).contains(&hour) {
            TimeOfDay::Morning
        } else if (12.0..17.0).contains(&hour) {
            TimeOfDay::Afternoon
        } else if (17.0..21.0).contains(&hour) {
            TimeOfDay::Evening
        } else {
            TimeOfDay::Night
        }
    }
}

/// A self-reported productivity level for a weekday and time-of-day bucket.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnergyReading {
    #[cfg_attr(feature = "serde", serde(with = "weekday_label"))]
    pub day: Weekday,
    pub time_slot: TimeOfDay,
    /// Level from 1 to 10, where 10 is highest energy.
    pub level: u8,
}

impl EnergyReading {
    /// # Errors
    ///
    /// Returns `PlannerError::InvalidField` if `level` is outside `1..=10`.
    pub fn new(day: Weekday, time_slot: TimeOfDay, level: u8) -> Result<Self> {
        if !(1..=10).contains(&level) {
            return Err(PlannerError::invalid(
                "level",
                format!("energy level must be between 1 and 10, got {}", level),
            ));
        }
        Ok(Self {
            day,
            time_slot,
            level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CommitmentRecord {
        CommitmentRecord {
            day: Some("MONDAY".to_string()),
            kind: Some("WORK".to_string()),
            start_time: Some("09:00".to_string()),
            end_time: Some("11:00".to_string()),
            date: None,
            title: Some("Shift".to_string()),
        }
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("MONDAY").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday("sunday").unwrap(), Weekday::Sun);
        assert_eq!(parse_weekday("Wed").unwrap(), Weekday::Wed);
        assert!(parse_weekday("FUNDAY").is_err());
    }

    #[test]
    fn test_day_label_round_trips_through_parse() {
        for day in [Weekday::Mon, Weekday::Thu, Weekday::Sun] {
            assert_eq!(parse_weekday(day_label(day)).unwrap(), day);
        }
    }

    #[test]
    fn test_record_conversion() {
        let commitment = Commitment::try_from(record()).unwrap();
        assert_eq!(commitment.kind, CommitmentKind::Work);
        assert_eq!(commitment.day, Weekday::Mon);
        assert_eq!(commitment.title.as_deref(), Some("Shift"));
    }

    #[test]
    fn test_record_missing_fields_fail_fast() {
        let cases: [(fn(&mut CommitmentRecord), &str); 4] = [
            (|r| r.day = None, "day"),
            (|r| r.kind = None, "type"),
            (|r| r.start_time = None, "startTime"),
            (|r| r.end_time = None, "endTime"),
        ];

        for (clear, field) in cases {
            let mut r = record();
            clear(&mut r);
            match Commitment::try_from(r) {
                Err(PlannerError::MissingField(missing)) => assert_eq!(missing, field),
                other => panic!("expected missing {}, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_record_bad_time() {
        let mut r = record();
        r.end_time = Some("11h".to_string());
        assert!(matches!(
            Commitment::try_from(r),
            Err(PlannerError::InvalidTime(_))
        ));
    }

    #[test]
    fn test_validate_all_stops_at_first_bad_record() {
        let mut bad = record();
        bad.start_time = None;
        let result = CommitmentRecord::validate_all(vec![record(), bad, record()]);
        assert!(matches!(result, Err(PlannerError::MissingField("startTime"))));

        let ok = CommitmentRecord::validate_all(vec![record(), record()]).unwrap();
        assert_eq!(ok.len(), 2);
    }

    #[test]
    fn test_applies_to_by_weekday_or_date() {
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        let weekly = Commitment::new(CommitmentKind::Class, Weekday::Mon, "09:00", "10:00");
        assert!(weekly.applies_to(monday, Weekday::Mon));
        assert!(!weekly.applies_to(tuesday, Weekday::Tue));

        let pinned = weekly.clone().on_date(tuesday);
        assert!(pinned.applies_to(tuesday, Weekday::Tue));
    }

    #[test]
    fn test_partition_drops_study() {
        let all = vec![
            Commitment::new(CommitmentKind::Work, Weekday::Mon, "09:00", "17:00"),
            Commitment::new(CommitmentKind::Study, Weekday::Mon, "18:00", "20:00"),
            Commitment::new(CommitmentKind::Class, Weekday::Tue, "08:00", "10:00"),
        ];
        let (work, classes) = Commitment::partition(all);
        assert_eq!(work.len(), 1);
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].day, Weekday::Tue);
    }

    #[test]
    fn test_time_of_day_buckets() {
        assert_eq!(TimeOfDay::from_hour(6.0), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11.5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12.0), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17.0), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(21.0), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(3.0), TimeOfDay::Night);
    }

    #[test]
    fn test_energy_reading_level_bounds() {
        assert!(EnergyReading::new(Weekday::Mon, TimeOfDay::Morning, 10).is_ok());
        assert!(EnergyReading::new(Weekday::Mon, TimeOfDay::Morning, 0).is_err());
        assert!(EnergyReading::new(Weekday::Mon, TimeOfDay::Morning, 11).is_err());
    }
}
