//! Feasibility rules for study schedules.
//!
//! Repairing a schedule means running [`TaskHoursConstraint`] and then
//! [`PositiveHoursConstraint`]: hours over a task's estimate are trimmed from
//! its blocks in order, and the blocks left with no hours are dropped.
//! [`UniqueWindowConstraint`] has no repair; initialization, crossover and
//! mutation never place two blocks in the same window.

use std::collections::{HashMap, HashSet};

use super::{Constraint, ConstraintManager, ConstraintViolation};
use crate::schedule::StudySchedule;

/// Tolerance used when checking hour totals.
const HOURS_EPSILON: f64 = 1e-9;

/// The constraints every repaired schedule satisfies, in repair order.
pub fn standard_constraints() -> ConstraintManager<StudySchedule> {
    let mut manager = ConstraintManager::new();
    manager
        .add_constraint(TaskHoursConstraint)
        .add_constraint(PositiveHoursConstraint)
        .add_constraint(UniqueWindowConstraint);
    manager
}

/// No task receives more hours than its estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskHoursConstraint;

impl Constraint<StudySchedule> for TaskHoursConstraint {
    fn check(&self, schedule: &StudySchedule) -> Vec<ConstraintViolation> {
        let mut estimates: HashMap<&str, f64> = HashMap::new();
        for task in schedule.blocks.iter().filter_map(|b| b.task.as_deref()) {
            estimates.insert(task.id.as_str(), task.estimated_hours);
        }

        let mut violations: Vec<ConstraintViolation> = schedule
            .hours_by_task()
            .into_iter()
            .filter_map(|(task_id, total)| {
                let estimate = estimates.get(task_id).copied().unwrap_or(0.0);
                (total > estimate + HOURS_EPSILON).then(|| {
                    ConstraintViolation::with_severity(
                        "TaskHours",
                        format!(
                            "task '{}' has {} hours assigned but needs only {}",
                            task_id, total, estimate
                        ),
                        total - estimate,
                    )
                })
            })
            .collect();
        violations.sort_by(|a, b| a.description().cmp(b.description()));
        violations
    }

    fn repair(&self, schedule: &mut StudySchedule) -> bool {
        let mut totals: HashMap<String, f64> = schedule
            .hours_by_task()
            .into_iter()
            .map(|(task_id, total)| (task_id.to_string(), total))
            .collect();

        for block in schedule.blocks.iter_mut() {
            let Some(task) = block.task.as_deref() else {
                continue;
            };
            let Some(total) = totals.get_mut(task.id.as_str()) else {
                continue;
            };

            if *total > task.estimated_hours {
                let excess = *total - task.estimated_hours;
                let adjusted = (block.hours_assigned - excess).max(0.0);
                *total -= block.hours_assigned - adjusted;
                *block = block.with_hours(adjusted);
            }
        }

        true
    }
}

/// Every block carries a task and strictly positive hours.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositiveHoursConstraint;

impl Constraint<StudySchedule> for PositiveHoursConstraint {
    fn check(&self, schedule: &StudySchedule) -> Vec<ConstraintViolation> {
        schedule
            .blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| block.task.is_none() || block.hours_assigned <= 0.0)
            .map(|(idx, block)| {
                ConstraintViolation::new(
                    "PositiveHours",
                    format!(
                        "block {} at {} {} has {} hours for task {:?}",
                        idx,
                        block.window.date,
                        block.window.start_time,
                        block.hours_assigned,
                        block.task_id()
                    ),
                )
            })
            .collect()
    }

    fn repair(&self, schedule: &mut StudySchedule) -> bool {
        schedule
            .blocks
            .retain(|block| block.task.is_some() && block.hours_assigned > 0.0);
        true
    }
}

/// No two blocks share a window.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueWindowConstraint;

impl Constraint<StudySchedule> for UniqueWindowConstraint {
    fn check(&self, schedule: &StudySchedule) -> Vec<ConstraintViolation> {
        let mut seen = HashSet::new();
        schedule
            .blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| !seen.insert(block.window_key()))
            .map(|(idx, block)| {
                ConstraintViolation::new(
                    "UniqueWindow",
                    format!(
                        "block {} reuses window {} {}-{}",
                        idx, block.window.date, block.window.start_time, block.window.end_time
                    ),
                )
            })
            .collect()
    }

    fn repair(&self, schedule: &mut StudySchedule) -> bool {
        self.check(schedule).is_empty()
    }
}
