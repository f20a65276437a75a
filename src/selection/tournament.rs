use crate::error::{PlannerError, Result};
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{check_inputs, SelectionStrategy};

/// A selection strategy that selects individuals through tournament selection.
///
/// Each tournament samples `tournament_size` individuals uniformly at random,
/// with replacement, from the whole population and keeps the fittest of them.
/// Tournaments are repeated until enough individuals are selected, so the same
/// individual may be selected more than once.
///
/// - Smaller tournament sizes lead to more exploration (more random selection)
/// - Larger tournament sizes lead to more exploitation (more focus on the best individuals)
///
/// # Examples
///
/// ```
/// use study_optimizer::rng::RandomNumberGenerator;
/// use study_optimizer::selection::{SelectionStrategy, TournamentSelection};
///
/// let population = vec![1, 2, 3, 4, 5];
/// let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
/// let mut rng = RandomNumberGenerator::from_seed(42);
///
/// let selection = TournamentSelection::default();
/// let selected = selection.select(&population, &fitness, 8, &mut rng).unwrap();
///
/// assert_eq!(selected.len(), 8);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct TournamentSelection {
    tournament_size: usize,
}

impl TournamentSelection {
    /// Creates a new TournamentSelection strategy with the specified tournament size.
    ///
    /// # Errors
    ///
    /// Returns an error if `tournament_size` is 0.
    pub fn new(tournament_size: usize) -> Result<Self> {
        if tournament_size < 1 {
            return Err(PlannerError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }

        Ok(Self { tournament_size })
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    /// Runs a single tournament and returns the index of the winner.
    ///
    /// The first participant with the highest fitness wins.
    fn run_tournament(&self, fitness: &[f64], rng: &mut RandomNumberGenerator) -> usize {
        let mut best_idx = rng.gen_index(fitness.len());

        for _ in 1..self.tournament_size {
            let idx = rng.gen_index(fitness.len());
            if fitness[idx] > fitness[best_idx] {
                best_idx = idx;
            }
        }

        best_idx
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self { tournament_size: 3 }
    }
}

impl<P> SelectionStrategy<P> for TournamentSelection
where
    P: Clone,
{
    fn select(
        &self,
        population: &[P],
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<P>> {
        check_inputs(population, fitness)?;

        Ok((0..num_to_select)
            .map(|_| population[self.run_tournament(fitness, rng)].clone())
            .collect())
    }
}
