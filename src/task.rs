//! Study tasks supplied by the task store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::{PlannerError, Result};

/// Stable identifier of a task.
pub type TaskId = String;

/// How demanding a task is. Harder tasks earn more for high-energy windows.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComplexityLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl ComplexityLevel {
    /// Multiplier applied to a window's energy when scoring a block.
    pub fn factor(self) -> f64 {
        match self {
            ComplexityLevel::High => 3.0,
            ComplexityLevel::Medium => 2.0,
            ComplexityLevel::Low => 1.0,
        }
    }
}

impl FromStr for ComplexityLevel {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(ComplexityLevel::Low),
            "MEDIUM" => Ok(ComplexityLevel::Medium),
            "HIGH" => Ok(ComplexityLevel::High),
            other => Err(PlannerError::invalid(
                "complexityLevel",
                format!("unknown complexity level '{}'", other),
            )),
        }
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ComplexityLevel::Low => "LOW",
            ComplexityLevel::Medium => "MEDIUM",
            ComplexityLevel::High => "HIGH",
        };
        f.write_str(label)
    }
}

/// A unit of study work with an effort estimate and a deadline.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Estimated effort in hours, strictly positive.
    pub estimated_hours: f64,
    /// Priority rank from 1 to 5, where 5 is highest.
    pub priority: u8,
    pub due_date: DateTime<Utc>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub complexity_level: ComplexityLevel,
    #[cfg_attr(feature = "serde", serde(default))]
    pub completed: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub subject_area: String,
}

impl Task {
    /// Creates an incomplete task with an empty subject area.
    pub fn new(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        estimated_hours: f64,
        priority: u8,
        due_date: DateTime<Utc>,
        complexity_level: ComplexityLevel,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            estimated_hours,
            priority,
            due_date,
            complexity_level,
            completed: false,
            subject_area: String::new(),
        }
    }

    pub fn with_subject_area(mut self, subject_area: impl Into<String>) -> Self {
        self.subject_area = subject_area.into();
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Checks the fields the optimizer relies on.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::InvalidField` if the estimated hours are not a
    /// positive finite number or the priority is outside `1..=5`.
    pub fn validate(&self) -> Result<()> {
        if !self.estimated_hours.is_finite() || self.estimated_hours <= 0.0 {
            return Err(PlannerError::invalid(
                "estimatedHours",
                format!(
                    "task '{}' must have positive estimated hours, got {}",
                    self.id, self.estimated_hours
                ),
            ));
        }

        if !(1..=5).contains(&self.priority) {
            return Err(PlannerError::invalid(
                "priority",
                format!(
                    "task '{}' must have a priority between 1 and 5, got {}",
                    self.id, self.priority
                ),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn due() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 6, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_complexity_factor() {
        assert_eq!(ComplexityLevel::High.factor(), 3.0);
        assert_eq!(ComplexityLevel::Medium.factor(), 2.0);
        assert_eq!(ComplexityLevel::Low.factor(), 1.0);
    }

    #[test]
    fn test_complexity_from_str() {
        assert_eq!("HIGH".parse::<ComplexityLevel>().unwrap(), ComplexityLevel::High);
        assert_eq!("medium".parse::<ComplexityLevel>().unwrap(), ComplexityLevel::Medium);
        assert!("EXTREME".parse::<ComplexityLevel>().is_err());
    }

    #[test]
    fn test_new_task_is_incomplete() {
        let task = Task::new("t1", "Linear algebra", 4.0, 5, due(), ComplexityLevel::High)
            .with_subject_area("MATH");
        assert!(!task.completed);
        assert_eq!(task.subject_area, "MATH");
        assert!(task.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_hours() {
        for hours in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let task = Task::new("t1", "Essay", hours, 3, due(), ComplexityLevel::Low);
            assert!(matches!(
                task.validate(),
                Err(PlannerError::InvalidField { field: "estimatedHours", .. })
            ));
        }
    }

    #[test]
    fn test_validate_rejects_bad_priority() {
        for priority in [0, 6] {
            let task = Task::new("t1", "Essay", 2.0, priority, due(), ComplexityLevel::Low);
            assert!(matches!(
                task.validate(),
                Err(PlannerError::InvalidField { field: "priority", .. })
            ));
        }
    }
}
