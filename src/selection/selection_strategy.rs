use std::cmp::Ordering;
use std::fmt::Debug;

use crate::error::{PlannerError, Result};
use crate::rng::RandomNumberGenerator;

/// Trait for selection strategies.
///
/// Selection strategies choose individuals from a population based on their
/// fitness scores. Higher fitness is always better.
///
/// # Examples
///
/// ```
/// use study_optimizer::rng::RandomNumberGenerator;
/// use study_optimizer::selection::{ElitistSelection, SelectionStrategy};
///
/// let population = vec!["a", "b", "c"];
/// let fitness = vec![0.5, 0.8, 0.3];
/// let mut rng = RandomNumberGenerator::from_seed(1);
///
/// let selected = ElitistSelection::default()
///     .select(&population, &fitness, 2, &mut rng)
///     .unwrap();
/// assert_eq!(selected, vec!["b", "a"]);
/// ```
pub trait SelectionStrategy<P>: Debug + Send + Sync
where
    P: Clone,
{
    /// Selects `num_to_select` individuals from the population.
    ///
    /// # Errors
    ///
    /// Returns an error if the population is empty or the fitness vector
    /// length doesn't match the population length.
    fn select(
        &self,
        population: &[P],
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<P>>;
}

pub(crate) fn check_inputs<P>(population: &[P], fitness: &[f64]) -> Result<()> {
    if population.is_empty() {
        return Err(PlannerError::EmptyPopulation);
    }

    if fitness.len() != population.len() {
        return Err(PlannerError::Configuration(format!(
            "Fitness vector length ({}) doesn't match population length ({})",
            fitness.len(),
            population.len()
        )));
    }

    Ok(())
}

/// Orders scores from best to worst, with NaN after every number.
pub(crate) fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or_else(|| {
        if a.is_nan() && b.is_nan() {
            Ordering::Equal
        } else if a.is_nan() {
            Ordering::Greater
        } else {
            Ordering::Less
        }
    })
}
