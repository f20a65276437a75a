//! # Candidate schedules
//!
//! A [`StudySchedule`] is one individual of the population: an ordered list of
//! [`StudyBlock`]s, each pairing a window with a task and a number of hours,
//! plus the fitness last computed for it. Blocks share their window and task
//! through `Arc`, so cloning a schedule never copies the underlying records.
//!
//! A [`PlanningProblem`] is the read-only snapshot an optimization run works
//! on: the incomplete tasks, the derived windows, and the instant deadlines are
//! measured from.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::availability::{Window, WindowKey};
use crate::error::Result;
use crate::task::Task;

/// One (window, task, hours) assignment inside a candidate schedule.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct StudyBlock {
    #[cfg_attr(feature = "serde", serde(rename = "timeSlot"))]
    pub window: Arc<Window>,
    pub task: Option<Arc<Task>>,
    pub hours_assigned: f64,
}

impl StudyBlock {
    pub fn new(window: Arc<Window>, task: Arc<Task>, hours_assigned: f64) -> Self {
        Self {
            window,
            task: Some(task),
            hours_assigned,
        }
    }

    /// A copy of this block with a different number of hours.
    pub fn with_hours(&self, hours_assigned: f64) -> Self {
        Self {
            hours_assigned,
            ..self.clone()
        }
    }

    /// A copy of this block assigned to another task.
    pub fn with_task(&self, task: Arc<Task>, hours_assigned: f64) -> Self {
        Self {
            window: Arc::clone(&self.window),
            task: Some(task),
            hours_assigned,
        }
    }

    /// A copy of this block moved to another window.
    pub fn with_window(&self, window: Arc<Window>, hours_assigned: f64) -> Self {
        Self {
            window,
            task: self.task.clone(),
            hours_assigned,
        }
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task.as_deref().map(|task| task.id.as_str())
    }

    pub fn window_key(&self) -> WindowKey<'_> {
        self.window.key()
    }
}

/// One candidate solution: an ordered collection of blocks and its fitness.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StudySchedule {
    pub blocks: Vec<StudyBlock>,
    pub fitness: f64,
}

impl StudySchedule {
    /// Creates an unevaluated schedule.
    pub fn new(blocks: Vec<StudyBlock>) -> Self {
        Self {
            blocks,
            fitness: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Sum of hours assigned to each task referenced by a block.
    pub fn hours_by_task(&self) -> HashMap<&str, f64> {
        let mut totals: HashMap<&str, f64> = HashMap::new();
        for block in &self.blocks {
            if let Some(task_id) = block.task_id() {
                *totals.entry(task_id).or_insert(0.0) += block.hours_assigned;
            }
        }
        totals
    }

    /// Hours assigned to `task_id` across all blocks.
    pub fn total_hours_for(&self, task_id: &str) -> f64 {
        self.blocks
            .iter()
            .filter(|block| block.task_id() == Some(task_id))
            .map(|block| block.hours_assigned)
            .sum()
    }

    pub fn total_hours(&self) -> f64 {
        self.blocks.iter().map(|block| block.hours_assigned).sum()
    }
}

/// The inputs of one optimization run.
#[derive(Debug, Clone)]
pub struct PlanningProblem {
    tasks: Vec<Arc<Task>>,
    windows: Vec<Arc<Window>>,
    now: DateTime<Utc>,
}

impl PlanningProblem {
    /// Builds a problem from validated tasks. Completed tasks are left out.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::InvalidField` if an incomplete task fails
    /// [`Task::validate`].
    pub fn new(tasks: Vec<Task>, windows: Vec<Window>, now: DateTime<Utc>) -> Result<Self> {
        let tasks = tasks
            .into_iter()
            .filter(|task| !task.completed)
            .map(|task| task.validate().map(|_| Arc::new(task)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            tasks,
            windows: windows.into_iter().map(Arc::new).collect(),
            now,
        })
    }

    /// Incomplete tasks in input order.
    pub fn tasks(&self) -> &[Arc<Task>] {
        &self.tasks
    }

    /// Candidate windows in derivation order.
    pub fn windows(&self) -> &[Arc<Window>] {
        &self.windows
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::task::ComplexityLevel;
    use chrono::{NaiveDate, TimeZone, Weekday};

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap()
    }

    pub fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    pub fn window(start_hour: u32, energy_level: u8) -> Window {
        Window {
            day: Weekday::Mon,
            date: monday(),
            start_time: format!("{:02}:00", start_hour),
            end_time: format!("{:02}:00", start_hour + 2),
            duration: 2.0,
            energy_level,
        }
    }

    pub fn task(id: &str, hours: f64, priority: u8, complexity: ComplexityLevel) -> Task {
        Task::new(
            id,
            format!("Task {}", id),
            hours,
            priority,
            now() + chrono::Duration::days(10),
            complexity,
        )
    }

    pub fn block(window: &Arc<Window>, task: &Arc<Task>, hours: f64) -> StudyBlock {
        StudyBlock::new(Arc::clone(window), Arc::clone(task), hours)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::task::ComplexityLevel;

    #[test]
    fn test_problem_skips_completed_tasks() {
        let tasks = vec![
            task("a", 2.0, 3, ComplexityLevel::Low),
            task("b", 2.0, 3, ComplexityLevel::Low).with_completed(true),
        ];
        let problem = PlanningProblem::new(tasks, vec![window(6, 5)], now()).unwrap();
        assert_eq!(problem.tasks().len(), 1);
        assert_eq!(problem.tasks()[0].id, "a");
        assert_eq!(problem.windows().len(), 1);
    }

    #[test]
    fn test_problem_rejects_invalid_task() {
        let tasks = vec![task("a", 0.0, 3, ComplexityLevel::Low)];
        assert!(PlanningProblem::new(tasks, vec![], now()).is_err());
    }

    #[test]
    fn test_hours_by_task() {
        let a = Arc::new(task("a", 4.0, 3, ComplexityLevel::Low));
        let b = Arc::new(task("b", 4.0, 3, ComplexityLevel::Low));
        let w1 = Arc::new(window(6, 5));
        let w2 = Arc::new(window(8, 5));
        let w3 = Arc::new(window(10, 5));

        let schedule = StudySchedule::new(vec![
            block(&w1, &a, 2.0),
            block(&w2, &b, 1.5),
            block(&w3, &a, 1.0),
        ]);

        let totals = schedule.hours_by_task();
        assert_eq!(totals["a"], 3.0);
        assert_eq!(totals["b"], 1.5);
        assert_eq!(schedule.total_hours_for("a"), 3.0);
        assert_eq!(schedule.total_hours_for("missing"), 0.0);
        assert_eq!(schedule.total_hours(), 4.5);
    }

    #[test]
    fn test_block_copies_keep_other_fields() {
        let a = Arc::new(task("a", 4.0, 3, ComplexityLevel::Low));
        let b = Arc::new(task("b", 1.0, 3, ComplexityLevel::Low));
        let w1 = Arc::new(window(6, 5));
        let w2 = Arc::new(window(8, 7));
        let original = block(&w1, &a, 2.0);

        let fewer = original.with_hours(0.5);
        assert_eq!(fewer.task_id(), Some("a"));
        assert_eq!(fewer.window.start_time, "06:00");

        let retasked = original.with_task(Arc::clone(&b), 1.0);
        assert_eq!(retasked.task_id(), Some("b"));
        assert_eq!(retasked.window_key(), original.window_key());

        let moved = original.with_window(Arc::clone(&w2), 2.0);
        assert_eq!(moved.task_id(), Some("a"));
        assert_eq!(moved.window.energy_level, 7);
        assert_eq!(original.hours_assigned, 2.0);
    }
}
