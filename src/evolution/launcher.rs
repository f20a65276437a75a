use rayon::prelude::*;
use tracing::{debug, info};

use super::{
    challenge::Challenge,
    options::{EvolutionOptions, LogLevel},
};
use crate::{
    breeding::BreedStrategy,
    error::{OptionExt, PlannerError, Result},
    rng::RandomNumberGenerator,
    schedule::StudySchedule,
    selection::{ElitistSelection, SelectionStrategy, TournamentSelection},
};

/// Best and mean fitness of one evaluated population.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// 0 for the seeded population, then 1 for the first bred generation.
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
}

impl GenerationStats {
    fn of(generation: usize, population: &[StudySchedule]) -> Self {
        let best_fitness = population
            .iter()
            .map(|schedule| schedule.fitness)
            .fold(f64::NEG_INFINITY, f64::max);
        let mean_fitness = if population.is_empty() {
            0.0
        } else {
            population.iter().map(|schedule| schedule.fitness).sum::<f64>()
                / population.len() as f64
        };

        Self {
            generation,
            best_fitness,
            mean_fitness,
        }
    }
}

/// Represents the result of an evolution: the best schedule found and the
/// per-generation history of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionResult {
    /// The repaired, rescored best schedule.
    pub schedule: StudySchedule,
    /// The fitness score of `schedule`.
    pub score: f64,
    /// One entry for the seeded population, then one per generation.
    pub history: Vec<GenerationStats>,
}

/// Manages the evolution process using a specified breeding strategy and challenge.
#[derive(Debug, Clone)]
pub struct EvolutionLauncher<Strategy, Chall>
where
    Strategy: BreedStrategy<StudySchedule>,
    Chall: Challenge<StudySchedule>,
{
    strategy: Strategy,
    challenge: Chall,
}

impl<Strategy, Chall> EvolutionLauncher<Strategy, Chall>
where
    Strategy: BreedStrategy<StudySchedule>,
    Chall: Challenge<StudySchedule>,
{
    /// Creates a new `EvolutionLauncher` instance with the specified breeding strategy and challenge.
    ///
    /// # Arguments
    ///
    /// * `strategy` - The breeding strategy used for seeding, breeding and repairing schedules.
    /// * `challenge` - The challenge used to evaluate the fitness of schedules.
    pub fn new(strategy: Strategy, challenge: Chall) -> Self {
        Self {
            strategy,
            challenge,
        }
    }

    /// Evolves a population of schedules over `num_generations` generations.
    ///
    /// The population is seeded with repaired random schedules and scored.
    /// Every generation keeps the `elitism_count` best schedules unchanged and
    /// fills the remaining slots with offspring bred from the elites plus
    /// tournament winners. The best schedule of the final population is
    /// repaired and rescored once more before it is returned.
    ///
    /// # Errors
    ///
    /// This method will return an error if:
    /// - The options fail [`EvolutionOptions::validate`]
    /// - The breeding process fails
    /// - A schedule scores a non-finite fitness
    ///
    /// # Performance
    ///
    /// Batches of at least `parallel_threshold` schedules are scored in
    /// parallel with Rayon. Scoring draws no randomness, so the result does
    /// not depend on the threshold.
    pub fn evolve(
        &self,
        options: &EvolutionOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<EvolutionResult> {
        options.validate()?;

        let population_size = options.get_population_size();
        let elitism_count = options.get_elitism_count();
        let num_offspring = population_size - elitism_count;
        let elitist = ElitistSelection::new();
        let tournament = TournamentSelection::new(options.get_tournament_size())?;

        let mut population: Vec<StudySchedule> = (0..population_size)
            .map(|_| {
                let mut schedule = self.strategy.initialize(rng);
                self.strategy.repair(&mut schedule);
                schedule
            })
            .collect();
        self.evaluate(&mut population, options)?;

        let mut history = Vec::with_capacity(options.get_num_generations() + 1);
        history.push(GenerationStats::of(0, &population));

        for generation in 1..=options.get_num_generations() {
            let fitness: Vec<f64> = population.iter().map(|schedule| schedule.fitness).collect();

            let elites = elitist.select(&population, &fitness, elitism_count, rng)?;
            let mut selected = elites.clone();
            selected.extend(tournament.select(&population, &fitness, num_offspring, rng)?);

            let mut offspring = self
                .strategy
                .breed(&selected, options, num_offspring, rng)
                .map_err(|e| {
                    PlannerError::Evolution(format!(
                        "Failed to breed offspring in generation {}: {}",
                        generation, e
                    ))
                })?;
            self.evaluate(&mut offspring, options)?;

            population = elites;
            population.extend(offspring);

            let stats = GenerationStats::of(generation, &population);
            self.log_generation(options, &stats, &population);
            history.push(stats);
        }

        self.finalize(population, history)
    }

    fn finalize(
        &self,
        mut population: Vec<StudySchedule>,
        history: Vec<GenerationStats>,
    ) -> Result<EvolutionResult> {
        let fitness: Vec<f64> = population.iter().map(|schedule| schedule.fitness).collect();
        let best_idx = ElitistSelection::ranked_indices(&fitness)
            .first()
            .copied()
            .ok_or_else_planner(|| {
                PlannerError::Evolution(
                    "Evolution completed but no schedules were produced".to_string(),
                )
            })?;

        let mut schedule = population.swap_remove(best_idx);
        self.strategy.repair(&mut schedule);
        self.score_one(&mut schedule)?;

        debug!(
            best_fitness = schedule.fitness,
            num_blocks = schedule.len(),
            total_hours = schedule.total_hours(),
            "evolution finished"
        );

        Ok(EvolutionResult {
            score: schedule.fitness,
            schedule,
            history,
        })
    }

    fn evaluate(&self, batch: &mut [StudySchedule], options: &EvolutionOptions) -> Result<()> {
        if batch.len() >= options.get_parallel_threshold() {
            batch
                .par_iter_mut()
                .try_for_each(|schedule| self.score_one(schedule))
        } else {
            batch
                .iter_mut()
                .try_for_each(|schedule| self.score_one(schedule))
        }
    }

    fn score_one(&self, schedule: &mut StudySchedule) -> Result<()> {
        let score = self.challenge.score(schedule);
        if !score.is_finite() {
            return Err(PlannerError::FitnessCalculation(format!(
                "Non-finite fitness score encountered: {}",
                score
            )));
        }
        schedule.fitness = score;
        Ok(())
    }

    fn log_generation(
        &self,
        options: &EvolutionOptions,
        stats: &GenerationStats,
        population: &[StudySchedule],
    ) {
        match options.get_log_level() {
            LogLevel::Minimal => info!(
                generation = stats.generation,
                best_fitness = stats.best_fitness,
                mean_fitness = stats.mean_fitness,
                "generation evaluated"
            ),
            LogLevel::Verbose => {
                info!(
                    generation = stats.generation,
                    best_fitness = stats.best_fitness,
                    mean_fitness = stats.mean_fitness,
                    "generation evaluated"
                );
                for (index, schedule) in population.iter().enumerate() {
                    debug!(
                        generation = stats.generation,
                        index,
                        fitness = schedule.fitness,
                        num_blocks = schedule.len(),
                        "individual"
                    );
                }
            }
            LogLevel::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breeding::StudyBreedStrategy;
    use crate::evolution::fitness::FitnessEvaluator;
    use crate::schedule::fixtures::*;
    use crate::schedule::PlanningProblem;
    use crate::task::ComplexityLevel;

    fn problem() -> PlanningProblem {
        let tasks = vec![
            task("a", 4.0, 5, ComplexityLevel::High),
            task("b", 3.0, 1, ComplexityLevel::Low),
        ];
        let windows = [3, 5, 8, 8, 5, 3, 2, 1]
            .iter()
            .enumerate()
            .map(|(i, &energy)| window(6 + 2 * i as u32, energy))
            .collect();
        PlanningProblem::new(tasks, windows, now()).unwrap()
    }

    fn options() -> EvolutionOptions {
        EvolutionOptions::builder()
            .population_size(20)
            .elitism_count(2)
            .num_generations(15)
            .build()
    }

    #[derive(Debug)]
    struct Broken;

    impl Challenge<StudySchedule> for Broken {
        fn score(&self, _schedule: &StudySchedule) -> f64 {
            f64::NAN
        }
    }

    #[test]
    fn test_evolve_records_history() {
        let problem = problem();
        let launcher =
            EvolutionLauncher::new(StudyBreedStrategy::new(&problem), FitnessEvaluator::new(&problem));
        let mut rng = RandomNumberGenerator::from_seed(42);

        let result = launcher.evolve(&options(), &mut rng).unwrap();
        assert_eq!(result.history.len(), 16);
        assert_eq!(result.history[0].generation, 0);
        assert_eq!(result.score, result.schedule.fitness);
        assert!(result.score > 0.0);
    }

    #[test]
    fn test_best_fitness_never_drops() {
        let problem = problem();
        let launcher =
            EvolutionLauncher::new(StudyBreedStrategy::new(&problem), FitnessEvaluator::new(&problem));
        let mut rng = RandomNumberGenerator::from_seed(3);

        let result = launcher.evolve(&options(), &mut rng).unwrap();
        for pair in result.history.windows(2) {
            assert!(pair[1].best_fitness >= pair[0].best_fitness);
        }
        let last = result.history.last().unwrap();
        assert!((result.score - last.best_fitness).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_scoring_matches_sequential() {
        let problem = problem();
        let launcher =
            EvolutionLauncher::new(StudyBreedStrategy::new(&problem), FitnessEvaluator::new(&problem));

        let mut sequential = options();
        sequential.set_parallel_threshold(usize::MAX);
        let mut parallel = options();
        parallel.set_parallel_threshold(1);

        let a = launcher
            .evolve(&sequential, &mut RandomNumberGenerator::from_seed(8))
            .unwrap();
        let b = launcher
            .evolve(&parallel, &mut RandomNumberGenerator::from_seed(8))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_generations_returns_best_seed() {
        let problem = problem();
        let launcher =
            EvolutionLauncher::new(StudyBreedStrategy::new(&problem), FitnessEvaluator::new(&problem));
        let mut opts = options();
        opts.set_num_generations(0);

        let result = launcher
            .evolve(&opts, &mut RandomNumberGenerator::from_seed(1))
            .unwrap();
        assert_eq!(result.history.len(), 1);
        assert!((result.score - result.history[0].best_fitness).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_options() {
        let problem = problem();
        let launcher =
            EvolutionLauncher::new(StudyBreedStrategy::new(&problem), FitnessEvaluator::new(&problem));
        let opts = EvolutionOptions::builder().population_size(1).build();

        let result = launcher.evolve(&opts, &mut RandomNumberGenerator::from_seed(1));
        assert!(matches!(result, Err(PlannerError::Configuration(_))));
    }

    #[test]
    fn test_non_finite_score_is_an_error() {
        let problem = problem();
        let launcher = EvolutionLauncher::new(StudyBreedStrategy::new(&problem), Broken);

        let result = launcher.evolve(&options(), &mut RandomNumberGenerator::from_seed(1));
        assert!(matches!(result, Err(PlannerError::FitnessCalculation(_))));
    }
}
