//! # Fitness
//!
//! A schedule is scored on four objectives, each summed over the incomplete
//! tasks of the run:
//!
//! - **completion**: fraction of each task's estimate that is scheduled
//! - **energy match**: window energy / 10 times the task's complexity factor,
//!   summed over blocks
//! - **deadline**: completion fraction times 3 when due within a day, 2 within
//!   three days, 1 otherwise
//! - **priority**: completion fraction times the task's priority
//!
//! The final fitness is the weighted sum of the four. Scores are not
//! normalized, so they are only comparable within one run.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::Challenge;
use crate::schedule::{PlanningProblem, StudySchedule};
use crate::task::Task;

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Weights of the four fitness objectives.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessWeights {
    pub completion: f64,
    pub energy_match: f64,
    pub deadline: f64,
    pub priority: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            completion: 0.30,
            energy_match: 0.25,
            deadline: 0.25,
            priority: 0.20,
        }
    }
}

/// The unweighted objective scores of one schedule.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitnessBreakdown {
    pub completion: f64,
    pub energy_match: f64,
    pub deadline: f64,
    pub priority: f64,
}

impl FitnessBreakdown {
    pub fn weighted(&self, weights: &FitnessWeights) -> f64 {
        self.completion * weights.completion
            + self.energy_match * weights.energy_match
            + self.deadline * weights.deadline
            + self.priority * weights.priority
    }
}

/// Scores study schedules against the tasks of one planning problem.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    tasks: Vec<Arc<Task>>,
    now: DateTime<Utc>,
    weights: FitnessWeights,
}

impl FitnessEvaluator {
    pub fn new(problem: &PlanningProblem) -> Self {
        Self {
            tasks: problem.tasks().to_vec(),
            now: problem.now(),
            weights: FitnessWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn weights(&self) -> &FitnessWeights {
        &self.weights
    }

    /// Multiplier for a task's deadline score, from the days left at `now`.
    pub fn urgency_multiplier(&self, due_date: DateTime<Utc>) -> f64 {
        let millis = (due_date - self.now).num_milliseconds() as f64;
        let days_until_due = (millis / MILLIS_PER_DAY).max(0.0);

        if days_until_due <= 1.0 {
            3.0
        } else if days_until_due <= 3.0 {
            2.0
        } else {
            1.0
        }
    }

    pub fn breakdown(&self, schedule: &StudySchedule) -> FitnessBreakdown {
        let totals = schedule.hours_by_task();
        let mut breakdown = FitnessBreakdown::default();

        for task in &self.tasks {
            let assigned = totals.get(task.id.as_str()).copied().unwrap_or(0.0);
            let completion = assigned / task.estimated_hours;

            breakdown.completion += completion;
            breakdown.deadline += completion * self.urgency_multiplier(task.due_date);
            breakdown.priority += completion * task.priority as f64;
        }

        breakdown.energy_match = schedule
            .blocks
            .iter()
            .map(|block| {
                let factor = block
                    .task
                    .as_deref()
                    .map(|task| task.complexity_level.factor())
                    .unwrap_or(1.0);
                block.window.energy_level as f64 / 10.0 * factor
            })
            .sum();

        breakdown
    }
}

impl Challenge<StudySchedule> for FitnessEvaluator {
    fn score(&self, schedule: &StudySchedule) -> f64 {
        self.breakdown(schedule).weighted(&self.weights)
    }
}
