//! # EvolutionOptions
//!
//! The `EvolutionOptions` struct represents the tunable parameters of an
//! optimization run: population size, mutation and crossover rates, the number
//! of elites carried between generations, the generation budget, the tournament
//! size, the logging level, and the batch size above which scoring runs in
//! parallel.
//!
//! ## Example
//!
//! ```rust
//! use study_optimizer::evolution::options::{EvolutionOptions, LogLevel};
//!
//! // Create a new EvolutionOptions instance with custom parameters
//! let custom_options = EvolutionOptions::new(30, 0.2, 0.8, 3, 200);
//! assert_eq!(custom_options.get_population_size(), 30);
//!
//! // Create a new EvolutionOptions instance with default parameters
//! let default_options = EvolutionOptions::default();
//! assert_eq!(default_options.get_num_generations(), 100);
//! ```
//!
//! ## Defaults
//!
//! | Parameter | Default |
//! |---|---|
//! | `population_size` | 50 |
//! | `mutation_rate` | 0.1 |
//! | `crossover_rate` | 0.7 |
//! | `elitism_count` | 5 |
//! | `num_generations` | 100 |
//! | `tournament_size` | 3 |
//! | `log_level` | `LogLevel::None` |
//! | `parallel_threshold` | 1000 |

use crate::error::{PlannerError, Result};

const DEFAULT_POPULATION_SIZE: usize = 50;
const DEFAULT_MUTATION_RATE: f64 = 0.1;
const DEFAULT_CROSSOVER_RATE: f64 = 0.7;
const DEFAULT_ELITISM_COUNT: usize = 5;
const DEFAULT_NUM_GENERATIONS: usize = 100;
const DEFAULT_TOURNAMENT_SIZE: usize = 3;
const DEFAULT_PARALLEL_THRESHOLD: usize = 1000;

/// How much the launcher reports through `tracing` while it runs.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// One event per generation plus one per individual.
    Verbose,
    /// One event per generation.
    Minimal,
    #[default]
    None,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionOptions {
    population_size: usize,
    mutation_rate: f64,
    crossover_rate: f64,
    elitism_count: usize,
    num_generations: usize,
    tournament_size: usize,
    log_level: LogLevel,
    /// Minimum number of individuals to score in parallel
    parallel_threshold: usize,
}

impl EvolutionOptions {
    pub fn new(
        population_size: usize,
        mutation_rate: f64,
        crossover_rate: f64,
        elitism_count: usize,
        num_generations: usize,
    ) -> Self {
        Self {
            population_size,
            mutation_rate,
            crossover_rate,
            elitism_count,
            num_generations,
            ..Self::default()
        }
    }

    /// Checks that the options describe a runnable evolution.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::Configuration` if the population has fewer than
    /// two individuals, the elites outnumber the population, a rate lies
    /// outside `[0, 1]`, or the tournament size is zero.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(PlannerError::Configuration(format!(
                "Population size must be at least 2, got {}",
                self.population_size
            )));
        }

        if self.elitism_count > self.population_size {
            return Err(PlannerError::Configuration(format!(
                "Elitism count ({}) cannot exceed population size ({})",
                self.elitism_count, self.population_size
            )));
        }

        for (name, rate) in [
            ("Mutation rate", self.mutation_rate),
            ("Crossover rate", self.crossover_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(PlannerError::Configuration(format!(
                    "{} must be between 0 and 1, got {}",
                    name, rate
                )));
            }
        }

        if self.tournament_size == 0 {
            return Err(PlannerError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn get_crossover_rate(&self) -> f64 {
        self.crossover_rate
    }

    pub fn get_elitism_count(&self) -> usize {
        self.elitism_count
    }

    pub fn get_num_generations(&self) -> usize {
        self.num_generations
    }

    pub fn get_tournament_size(&self) -> usize {
        self.tournament_size
    }

    pub fn get_log_level(&self) -> &LogLevel {
        &self.log_level
    }

    /// Returns the minimum number of individuals to score in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn set_population_size(&mut self, population_size: usize) {
        self.population_size = population_size;
    }

    pub fn set_mutation_rate(&mut self, mutation_rate: f64) {
        self.mutation_rate = mutation_rate;
    }

    pub fn set_crossover_rate(&mut self, crossover_rate: f64) {
        self.crossover_rate = crossover_rate;
    }

    pub fn set_elitism_count(&mut self, elitism_count: usize) {
        self.elitism_count = elitism_count;
    }

    pub fn set_num_generations(&mut self, num_generations: usize) {
        self.num_generations = num_generations;
    }

    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    /// Returns a builder for creating an `EvolutionOptions` instance.
    ///
    /// # Example
    ///
    /// ```rust
    /// use study_optimizer::evolution::options::{EvolutionOptions, LogLevel};
    ///
    /// let options = EvolutionOptions::builder()
    ///     .population_size(20)
    ///     .num_generations(40)
    ///     .log_level(LogLevel::Minimal)
    ///     .build();
    ///
    /// assert_eq!(options.get_population_size(), 20);
    /// assert_eq!(options.get_mutation_rate(), 0.1);
    /// ```
    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            mutation_rate: DEFAULT_MUTATION_RATE,
            crossover_rate: DEFAULT_CROSSOVER_RATE,
            elitism_count: DEFAULT_ELITISM_COUNT,
            num_generations: DEFAULT_NUM_GENERATIONS,
            tournament_size: DEFAULT_TOURNAMENT_SIZE,
            log_level: LogLevel::None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Builder for `EvolutionOptions`.
///
/// Unset parameters fall back to their defaults.
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    population_size: Option<usize>,
    mutation_rate: Option<f64>,
    crossover_rate: Option<f64>,
    elitism_count: Option<usize>,
    num_generations: Option<usize>,
    tournament_size: Option<usize>,
    log_level: Option<LogLevel>,
    parallel_threshold: Option<usize>,
}

impl EvolutionOptionsBuilder {
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn mutation_rate(mut self, value: f64) -> Self {
        self.mutation_rate = Some(value);
        self
    }

    pub fn crossover_rate(mut self, value: f64) -> Self {
        self.crossover_rate = Some(value);
        self
    }

    pub fn elitism_count(mut self, value: usize) -> Self {
        self.elitism_count = Some(value);
        self
    }

    pub fn num_generations(mut self, value: usize) -> Self {
        self.num_generations = Some(value);
        self
    }

    pub fn tournament_size(mut self, value: usize) -> Self {
        self.tournament_size = Some(value);
        self
    }

    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    /// Builds the `EvolutionOptions` instance.
    pub fn build(self) -> EvolutionOptions {
        EvolutionOptions {
            population_size: self.population_size.unwrap_or(DEFAULT_POPULATION_SIZE),
            mutation_rate: self.mutation_rate.unwrap_or(DEFAULT_MUTATION_RATE),
            crossover_rate: self.crossover_rate.unwrap_or(DEFAULT_CROSSOVER_RATE),
            elitism_count: self.elitism_count.unwrap_or(DEFAULT_ELITISM_COUNT),
            num_generations: self.num_generations.unwrap_or(DEFAULT_NUM_GENERATIONS),
            tournament_size: self.tournament_size.unwrap_or(DEFAULT_TOURNAMENT_SIZE),
            log_level: self.log_level.unwrap_or_default(),
            parallel_threshold: self.parallel_threshold.unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
        }
    }
}
