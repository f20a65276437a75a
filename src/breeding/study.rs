//! # StudyBreedStrategy
//!
//! Population operators for study schedules.
//!
//! - **initialization** shuffles the windows and sweeps them greedily, giving
//!   each window to a random task that still needs hours
//! - **crossover** walks both parents index by index, taking each block from a
//!   randomly chosen parent unless its window is taken or its task would go
//!   over its estimate
//! - **mutation** is gated once per schedule and again per block, and then
//!   changes the block's task, moves it to a free window, or nudges its hours
//!   by half an hour
//! - **repair** runs the [`standard_constraints`]
//!
//! All randomness comes from the caller's [`RandomNumberGenerator`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::trace;

use super::BreedStrategy;
use crate::{
    availability::Window,
    constraints::{standard_constraints, ConstraintManager},
    error::{PlannerError, Result},
    evolution::options::EvolutionOptions,
    rng::RandomNumberGenerator,
    schedule::{PlanningProblem, StudyBlock, StudySchedule},
};

const HOURS_STEP: f64 = 0.5;

/// Breeds study schedules for one planning problem.
#[derive(Debug)]
pub struct StudyBreedStrategy<'a> {
    problem: &'a PlanningProblem,
    constraints: ConstraintManager<StudySchedule>,
}

impl<'a> StudyBreedStrategy<'a> {
    pub fn new(problem: &'a PlanningProblem) -> Self {
        Self {
            problem,
            constraints: standard_constraints(),
        }
    }

    pub fn problem(&self) -> &PlanningProblem {
        self.problem
    }

    /// Builds a feasible-by-construction, unrepaired schedule.
    pub fn random_schedule(&self, rng: &mut RandomNumberGenerator) -> StudySchedule {
        let tasks = self.problem.tasks();
        let mut remaining: Vec<f64> = tasks.iter().map(|task| task.estimated_hours).collect();

        let mut windows: Vec<&Arc<Window>> = self.problem.windows().iter().collect();
        rng.shuffle(&mut windows);

        let mut blocks = Vec::new();
        for window in windows {
            let open: Vec<usize> = (0..tasks.len()).filter(|&idx| remaining[idx] > 0.0).collect();
            if open.is_empty() {
                break;
            }

            let idx = open[rng.gen_index(open.len())];
            let hours = window.duration.min(remaining[idx]);
            remaining[idx] -= hours;
            blocks.push(StudyBlock::new(
                Arc::clone(window),
                Arc::clone(&tasks[idx]),
                hours,
            ));
        }

        StudySchedule::new(blocks)
    }

    /// Combines two parents into an unrepaired child.
    ///
    /// With probability `1 - crossover_rate` the child is a copy of `first`.
    /// Rejected blocks are dropped, so the child may cover fewer hours than
    /// either parent.
    pub fn crossover(
        &self,
        first: &StudySchedule,
        second: &StudySchedule,
        crossover_rate: f64,
        rng: &mut RandomNumberGenerator,
    ) -> StudySchedule {
        if rng.gen_unit() >= crossover_rate {
            return first.clone();
        }

        let mut used_windows = HashSet::new();
        let mut task_hours: HashMap<&str, f64> = HashMap::new();
        let mut blocks = Vec::new();

        let len = first.len().max(second.len());
        for idx in 0..len {
            let parent = if rng.gen_bool(0.5) { first } else { second };
            let Some(block) = parent.blocks.get(idx) else {
                continue;
            };

            let key = block.window_key();
            if used_windows.contains(&key) {
                continue;
            }

            if let Some(task) = block.task.as_deref() {
                let total = task_hours.get(task.id.as_str()).copied().unwrap_or(0.0)
                    + block.hours_assigned;
                if total > task.estimated_hours {
                    continue;
                }
                task_hours.insert(task.id.as_str(), total);
            }

            used_windows.insert(key);
            blocks.push(block.clone());
        }

        StudySchedule::new(blocks)
    }

    /// Mutates a schedule in place.
    ///
    /// The schedule is touched with probability `mutation_rate`; if it is,
    /// each block mutates with probability `mutation_rate` again.
    pub fn mutate(
        &self,
        schedule: &mut StudySchedule,
        mutation_rate: f64,
        rng: &mut RandomNumberGenerator,
    ) {
        if rng.gen_unit() >= mutation_rate {
            return;
        }

        for idx in 0..schedule.blocks.len() {
            if rng.gen_unit() >= mutation_rate {
                continue;
            }

            let mutated = match rng.gen_index(3) {
                0 => self.change_task(&schedule.blocks[idx], rng),
                1 => self.change_window(schedule, idx, rng),
                _ => Some(Self::nudge_hours(&schedule.blocks[idx], rng)),
            };

            if let Some(block) = mutated {
                schedule.blocks[idx] = block;
            }
        }

        schedule.fitness = 0.0;
    }

    fn change_task(&self, block: &StudyBlock, rng: &mut RandomNumberGenerator) -> Option<StudyBlock> {
        let tasks = self.problem.tasks();
        if tasks.is_empty() {
            return None;
        }

        let task = &tasks[rng.gen_index(tasks.len())];
        let hours = block.window.duration.min(task.estimated_hours);
        Some(block.with_task(Arc::clone(task), hours))
    }

    fn change_window(
        &self,
        schedule: &StudySchedule,
        idx: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Option<StudyBlock> {
        let taken: HashSet<_> = schedule
            .blocks
            .iter()
            .enumerate()
            .filter(|&(other, _)| other != idx)
            .map(|(_, block)| block.window_key())
            .collect();

        let free: Vec<&Arc<Window>> = self
            .problem
            .windows()
            .iter()
            .filter(|window| !taken.contains(&window.key()))
            .collect();
        if free.is_empty() {
            return None;
        }

        let block = &schedule.blocks[idx];
        let window = free[rng.gen_index(free.len())];
        let estimate = block
            .task
            .as_deref()
            .map(|task| task.estimated_hours)
            .unwrap_or(0.0);
        Some(block.with_window(Arc::clone(window), window.duration.min(estimate)))
    }

    fn nudge_hours(block: &StudyBlock, rng: &mut RandomNumberGenerator) -> StudyBlock {
        let current = block.hours_assigned;

        let hours = if rng.gen_bool(0.5) && current > HOURS_STEP {
            (current - HOURS_STEP).max(HOURS_STEP)
        } else {
            match block.task.as_deref() {
                Some(task) => {
                    let cap = block.window.duration.min(task.estimated_hours);
                    if current < cap {
                        cap.min(current + HOURS_STEP)
                    } else {
                        current
                    }
                }
                None => current,
            }
        };

        block.with_hours(hours)
    }

    /// Two distinct indices into a pool of `len` parents.
    ///
    /// A pool with a single parent pairs it with itself.
    fn parent_indices(len: usize, rng: &mut RandomNumberGenerator) -> (usize, usize) {
        let first = rng.gen_index(len);
        if len < 2 {
            return (first, first);
        }
        let second = (first + 1 + rng.gen_index(len - 1)) % len;
        (first, second)
    }
}

impl BreedStrategy<StudySchedule> for StudyBreedStrategy<'_> {
    fn initialize(&self, rng: &mut RandomNumberGenerator) -> StudySchedule {
        self.random_schedule(rng)
    }

    fn breed(
        &self,
        parents: &[StudySchedule],
        evol_options: &EvolutionOptions,
        num_offspring: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<StudySchedule>> {
        if parents.is_empty() {
            return Err(PlannerError::EmptyPopulation);
        }

        let mut children = Vec::with_capacity(num_offspring);
        for _ in 0..num_offspring {
            let (first, second) = Self::parent_indices(parents.len(), rng);
            let mut child = self.crossover(
                &parents[first],
                &parents[second],
                evol_options.get_crossover_rate(),
                rng,
            );
            self.mutate(&mut child, evol_options.get_mutation_rate(), rng);
            self.repair(&mut child);
            children.push(child);
        }

        Ok(children)
    }

    fn repair(&self, schedule: &mut StudySchedule) {
        if !self.constraints.repair_all(schedule) {
            trace!(
                violations = self.constraints.check_all(schedule).len(),
                "schedule still violates constraints after repair"
            );
        }
    }
}
