//! # OptimizerService
//!
//! Gathers a user's data from the storage collaborators and runs the
//! optimizer on it. Any failure, from a store or from the engine, is reported
//! as [`PlannerError::OptimizationFailed`] carrying the original cause. The
//! service never retries, since a new randomized run would change the result
//! rather than fix the fault.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

use crate::{
    availability::{Commitment, CommitmentRecord, EnergyReading},
    error::{BoxError, PlannerError, Result},
    optimizer::{PlanningRequest, ScheduleOptimizer},
    rng::RandomNumberGenerator,
    schedule::StudySchedule,
    task::Task,
};

const FAILURE_CONTEXT: &str = "Failed to optimize study schedule";

/// Source of a user's tasks.
pub trait TaskStore {
    fn find_incomplete_tasks_by_user(&self, user_id: &str) -> std::result::Result<Vec<Task>, BoxError>;
}

/// Source of a user's stored schedule entries (work, class and study).
pub trait ScheduleStore {
    /// Entries recurring in or pinned to `[start_date, end_date]`.
    fn find_by_user_and_date_range(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> std::result::Result<Vec<CommitmentRecord>, BoxError>;
}

/// Source of a user's energy readings.
pub trait EnergyLevelStore {
    fn find_by_user(&self, user_id: &str) -> std::result::Result<Vec<EnergyReading>, BoxError>;
}

#[derive(Debug, Clone)]
pub struct OptimizerService<T, S, E> {
    tasks: T,
    schedules: S,
    energy_levels: E,
    optimizer: ScheduleOptimizer,
}

impl<T, S, E> OptimizerService<T, S, E>
where
    T: TaskStore,
    S: ScheduleStore,
    E: EnergyLevelStore,
{
    pub fn new(tasks: T, schedules: S, energy_levels: E) -> Self {
        Self {
            tasks,
            schedules,
            energy_levels,
            optimizer: ScheduleOptimizer::default(),
        }
    }

    pub fn with_optimizer(mut self, optimizer: ScheduleOptimizer) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Builds the best study schedule for `user_id` between `start_date` and
    /// `end_date`, both inclusive.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::OptimizationFailed` whose source is the first
    /// store or engine error encountered.
    pub fn optimize_study_schedule(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        now: DateTime<Utc>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<StudySchedule> {
        self.try_optimize(user_id, start_date, end_date, now, rng)
            .map_err(|source| {
                warn!(user_id, error = %source, "study schedule optimization failed");
                PlannerError::OptimizationFailed {
                    context: FAILURE_CONTEXT.to_string(),
                    source: Box::new(source),
                }
            })
    }

    fn try_optimize(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        now: DateTime<Utc>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<StudySchedule> {
        let records = self
            .schedules
            .find_by_user_and_date_range(user_id, start_date, end_date)
            .map_err(PlannerError::Store)?;
        let (work, classes) = Commitment::partition(CommitmentRecord::validate_all(records)?);

        let tasks = self
            .tasks
            .find_incomplete_tasks_by_user(user_id)
            .map_err(PlannerError::Store)?;
        let energy_levels = self
            .energy_levels
            .find_by_user(user_id)
            .map_err(PlannerError::Store)?;

        let request = PlanningRequest::new(tasks, start_date, end_date)
            .with_work(work)
            .with_classes(classes)
            .with_energy_levels(energy_levels);
        self.optimizer.optimize_schedule(request, now, rng)
    }
}
