//! # ScheduleOptimizer
//!
//! The entry point of the engine: derive the open windows for a date range,
//! then evolve a study schedule over them.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{Duration, NaiveDate, TimeZone, Utc};
//! use study_optimizer::optimizer::{PlanningRequest, ScheduleOptimizer};
//! use study_optimizer::rng::RandomNumberGenerator;
//! use study_optimizer::task::{ComplexityLevel, Task};
//!
//! let now = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
//! let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
//! let essay = Task::new("essay", "Essay", 3.0, 4, now + Duration::days(2), ComplexityLevel::High);
//!
//! let request = PlanningRequest::new(vec![essay], monday, monday);
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let schedule = ScheduleOptimizer::default()
//!     .optimize_schedule(request, now, &mut rng)
//!     .unwrap();
//!
//! assert!(schedule.total_hours_for("essay") <= 3.0);
//! ```

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    availability::{derive_windows, Commitment, EnergyReading},
    breeding::StudyBreedStrategy,
    error::Result,
    evolution::{EvolutionLauncher, EvolutionOptions, EvolutionResult, FitnessEvaluator, FitnessWeights},
    rng::RandomNumberGenerator,
    schedule::{PlanningProblem, StudySchedule},
    task::Task,
};

/// Everything one optimization run needs besides its tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningRequest {
    pub tasks: Vec<Task>,
    pub work: Vec<Commitment>,
    pub classes: Vec<Commitment>,
    pub energy_levels: Vec<EnergyReading>,
    /// First date to plan, inclusive.
    pub start_date: NaiveDate,
    /// Last date to plan, inclusive.
    pub end_date: NaiveDate,
}

impl PlanningRequest {
    /// A request with no commitments and no energy readings.
    pub fn new(tasks: Vec<Task>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            tasks,
            work: Vec::new(),
            classes: Vec::new(),
            energy_levels: Vec::new(),
            start_date,
            end_date,
        }
    }

    pub fn with_work(mut self, work: Vec<Commitment>) -> Self {
        self.work = work;
        self
    }

    pub fn with_classes(mut self, classes: Vec<Commitment>) -> Self {
        self.classes = classes;
        self
    }

    pub fn with_energy_levels(mut self, energy_levels: Vec<EnergyReading>) -> Self {
        self.energy_levels = energy_levels;
        self
    }
}

/// Tuning of the optimizer. The default uses the standard options and weights.
#[derive(Debug, Clone, Default)]
pub struct ScheduleOptimizer {
    options: EvolutionOptions,
    weights: FitnessWeights,
}

impl ScheduleOptimizer {
    pub fn new(options: EvolutionOptions) -> Self {
        Self {
            options,
            weights: FitnessWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn options(&self) -> &EvolutionOptions {
        &self.options
    }

    /// Runs one optimization and returns the best schedule with the run's history.
    ///
    /// `now` is the instant deadlines are measured from.
    ///
    /// # Errors
    ///
    /// Returns an error if a commitment has a malformed time, a task fails
    /// validation, or the options are invalid.
    pub fn run(
        &self,
        request: PlanningRequest,
        now: DateTime<Utc>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<EvolutionResult> {
        let windows = derive_windows(
            &request.work,
            &request.classes,
            &request.energy_levels,
            request.start_date,
            request.end_date,
        )?;
        let problem = PlanningProblem::new(request.tasks, windows, now)?;

        let strategy = StudyBreedStrategy::new(&problem);
        let challenge = FitnessEvaluator::new(&problem).with_weights(self.weights);
        EvolutionLauncher::new(strategy, challenge).evolve(&self.options, rng)
    }

    /// Runs one optimization and returns only the best schedule.
    pub fn optimize_schedule(
        &self,
        request: PlanningRequest,
        now: DateTime<Utc>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<StudySchedule> {
        self.run(request, now, rng).map(|result| result.schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::{CommitmentKind, TimeOfDay};
    use crate::error::PlannerError;
    use crate::schedule::fixtures::{monday, now};
    use crate::task::ComplexityLevel;
    use chrono::{Duration, Weekday};

    fn small() -> ScheduleOptimizer {
        ScheduleOptimizer::new(
            EvolutionOptions::builder()
                .population_size(16)
                .elitism_count(2)
                .num_generations(20)
                .build(),
        )
    }

    #[test]
    fn test_commitments_block_windows() {
        let essay = Task::new("essay", "Essay", 16.0, 3, now() + Duration::days(5), ComplexityLevel::Medium);
        let request = PlanningRequest::new(vec![essay], monday(), monday()).with_work(vec![
            Commitment::new(CommitmentKind::Work, Weekday::Mon, "06:00", "14:00"),
        ]);
        let mut rng = RandomNumberGenerator::from_seed(1);

        let schedule = small().optimize_schedule(request, now(), &mut rng).unwrap();
        assert!(!schedule.is_empty());
        assert!(schedule
            .blocks
            .iter()
            .all(|block| block.window.start_time.as_str() >= "14:00"));
    }

    #[test]
    fn test_energy_readings_reach_windows() {
        let essay = Task::new("essay", "Essay", 2.0, 3, now() + Duration::days(5), ComplexityLevel::High);
        let readings = vec![
            EnergyReading::new(Weekday::Mon, TimeOfDay::Morning, 9).unwrap(),
            EnergyReading::new(Weekday::Mon, TimeOfDay::Afternoon, 2).unwrap(),
        ];
        let request =
            PlanningRequest::new(vec![essay], monday(), monday()).with_energy_levels(readings);
        let mut rng = RandomNumberGenerator::from_seed(2);

        let result = small().run(request, now(), &mut rng).unwrap();
        let energies: Vec<u8> = result
            .schedule
            .blocks
            .iter()
            .map(|block| block.window.energy_level)
            .collect();
        assert!(energies.iter().all(|level| [9, 2, 5].contains(level)));
    }

    #[test]
    fn test_reversed_range_yields_empty_schedule() {
        let essay = Task::new("essay", "Essay", 2.0, 3, now(), ComplexityLevel::Low);
        let request = PlanningRequest::new(vec![essay], monday() + Duration::days(1), monday());
        let mut rng = RandomNumberGenerator::from_seed(3);

        let result = small().run(request, now(), &mut rng).unwrap();
        assert!(result.schedule.is_empty());
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_invalid_task_is_rejected() {
        let broken = Task::new("broken", "Broken", -1.0, 3, now(), ComplexityLevel::Low);
        let request = PlanningRequest::new(vec![broken], monday(), monday());
        let mut rng = RandomNumberGenerator::from_seed(4);

        let result = small().run(request, now(), &mut rng);
        assert!(matches!(result, Err(PlannerError::InvalidField { .. })));
    }
}
