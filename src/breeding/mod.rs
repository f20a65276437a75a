//! # Breeding
//!
//! A [`BreedStrategy`] owns the population operators of an individual type:
//! how a random individual is drawn, how a pool of selected parents produces
//! offspring, and how an individual is restored to feasibility.
//!
//! [`StudyBreedStrategy`] implements them for study schedules.

use std::fmt::Debug;

use crate::{error::Result, evolution::options::EvolutionOptions, rng::RandomNumberGenerator};

pub mod study;

pub use study::StudyBreedStrategy;

pub trait BreedStrategy<P>: Debug + Send + Sync {
    /// Draws a random, unrepaired individual.
    fn initialize(&self, rng: &mut RandomNumberGenerator) -> P;

    /// Breeds `num_offspring` repaired children from a pool of selected parents.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::EmptyPopulation` if `parents` is empty.
    fn breed(
        &self,
        parents: &[P],
        evol_options: &EvolutionOptions,
        num_offspring: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<P>>;

    /// Restores the feasibility invariants of an individual in place.
    fn repair(&self, individual: &mut P);
}
