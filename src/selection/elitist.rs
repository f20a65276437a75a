use crate::error::Result;
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{check_inputs, descending, SelectionStrategy};

/// A selection strategy that selects the best individuals based on fitness.
///
/// This strategy sorts individuals by their fitness scores and selects the top N
/// individuals, best first. Ties keep population order. This is the elitism
/// step of each generation: the selected individuals are carried forward
/// unchanged.
///
/// # Examples
///
/// ```
/// use study_optimizer::rng::RandomNumberGenerator;
/// use study_optimizer::selection::{ElitistSelection, SelectionStrategy};
///
/// let population = vec![1, 2, 3];
/// let fitness = vec![0.5, 0.8, 0.3];
/// let mut rng = RandomNumberGenerator::new();
///
/// let selected = ElitistSelection::default()
///     .select(&population, &fitness, 2, &mut rng)
///     .unwrap();
///
/// assert_eq!(selected, vec![2, 1]);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct ElitistSelection;

impl ElitistSelection {
    pub fn new() -> Self {
        Self
    }

    /// Indices of the population ordered from best to worst fitness.
    pub fn ranked_indices(fitness: &[f64]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..fitness.len()).collect();
        indices.sort_by(|&a, &b| descending(fitness[a], fitness[b]));
        indices
    }
}

impl<P> SelectionStrategy<P> for ElitistSelection
where
    P: Clone,
{
    fn select(
        &self,
        population: &[P],
        fitness: &[f64],
        num_to_select: usize,
        _rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<P>> {
        check_inputs(population, fitness)?;

        Ok(Self::ranked_indices(fitness)
            .into_iter()
            .take(num_to_select)
            .map(|idx| population[idx].clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;

    #[test]
    fn test_elitist_selection() {
        let population = vec!["a", "b", "c", "d", "e"];
        let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
        let mut rng = RandomNumberGenerator::from_seed(1);

        let selected = ElitistSelection::new()
            .select(&population, &fitness, 3, &mut rng)
            .unwrap();
        assert_eq!(selected, vec!["d", "b", "a"]);
    }

    #[test]
    fn test_select_more_than_population() {
        let population = vec![1, 2];
        let fitness = vec![0.1, 0.2];
        let mut rng = RandomNumberGenerator::from_seed(1);

        let selected = ElitistSelection::new()
            .select(&population, &fitness, 5, &mut rng)
            .unwrap();
        assert_eq!(selected, vec![2, 1]);
    }

    #[test]
    fn test_select_zero() {
        let population = vec![1, 2];
        let fitness = vec![0.1, 0.2];
        let mut rng = RandomNumberGenerator::from_seed(1);

        let selected = ElitistSelection::new()
            .select(&population, &fitness, 0, &mut rng)
            .unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_ties_keep_population_order() {
        let fitness = vec![1.0, 2.0, 1.0, 2.0];
        assert_eq!(ElitistSelection::ranked_indices(&fitness), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_nan_ranks_last() {
        let fitness = vec![f64::NAN, 0.2, 0.9];
        assert_eq!(ElitistSelection::ranked_indices(&fitness), vec![2, 1, 0]);
    }

    #[test]
    fn test_empty_population() {
        let population: Vec<u8> = Vec::new();
        let mut rng = RandomNumberGenerator::from_seed(1);
        let result = ElitistSelection::new().select(&population, &[], 1, &mut rng);
        assert!(matches!(result, Err(PlannerError::EmptyPopulation)));
    }

    #[test]
    fn test_mismatched_lengths() {
        let population = vec![1, 2];
        let mut rng = RandomNumberGenerator::from_seed(1);
        let result = ElitistSelection::new().select(&population, &[0.5], 1, &mut rng);
        assert!(matches!(result, Err(PlannerError::Configuration(_))));
    }
}
