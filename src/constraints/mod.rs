//! # Constraints Module
//!
//! This module provides the framework the optimizer uses to describe and enforce
//! feasibility of candidate schedules.
//!
//! ## Key Components
//!
//! - `Constraint` trait: checks an individual and optionally repairs it
//! - `ConstraintViolation`: a specific violation of a constraint
//! - `ConstraintManager`: runs several constraints in order
//! - [`schedule`]: the constraints that define a feasible study schedule
//!
//! ## Basic Usage
//!
//! ```rust
//! use study_optimizer::constraints::standard_constraints;
//! use study_optimizer::schedule::StudySchedule;
//!
//! let manager = standard_constraints();
//! let mut schedule = StudySchedule::default();
//!
//! manager.repair_all(&mut schedule);
//! assert!(manager.is_valid(&schedule));
//! ```

use std::fmt::{Debug, Display};
use std::sync::Arc;

pub mod schedule;

pub use schedule::{
    standard_constraints, PositiveHoursConstraint, TaskHoursConstraint, UniqueWindowConstraint,
};

/// Represents a violation of a constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintViolation {
    /// The name of the constraint that was violated
    constraint_name: String,
    /// A description of the violation
    description: String,
    /// An optional severity score (higher means more severe)
    severity: Option<f64>,
}

impl ConstraintViolation {
    /// Creates a new constraint violation with the given name and description.
    pub fn new<S: Into<String>, D: Into<String>>(constraint_name: S, description: D) -> Self {
        Self {
            constraint_name: constraint_name.into(),
            description: description.into(),
            severity: None,
        }
    }

    /// Creates a new constraint violation with the given name, description, and severity.
    pub fn with_severity<S: Into<String>, D: Into<String>>(
        constraint_name: S,
        description: D,
        severity: f64,
    ) -> Self {
        Self {
            constraint_name: constraint_name.into(),
            description: description.into(),
            severity: Some(severity),
        }
    }

    /// Returns the name of the constraint that was violated.
    pub fn constraint_name(&self) -> &str {
        &self.constraint_name
    }

    /// Returns the description of the violation.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the severity of the violation, if specified.
    pub fn severity(&self) -> Option<f64> {
        self.severity
    }
}

impl Display for ConstraintViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Constraint '{}' violated: {}{}",
            self.constraint_name(),
            self.description(),
            self.severity()
                .map(|s| format!(" (severity: {})", s))
                .unwrap_or_default()
        )
    }
}

/// Trait for defining constraints that can be applied to individuals.
///
/// Constraints check whether an individual satisfies certain requirements and
/// optionally provide a way to repair individuals that do not.
pub trait Constraint<P>: Debug + Send + Sync {
    /// Checks if the individual satisfies this constraint.
    ///
    /// Returns a vector of constraint violations. An empty vector indicates
    /// that the individual satisfies the constraint.
    fn check(&self, individual: &P) -> Vec<ConstraintViolation>;

    /// Attempts to repair the individual to satisfy this constraint.
    ///
    /// Returns `true` if the individual satisfies the constraint afterwards.
    /// The default implementation does not perform any repair.
    fn repair(&self, _individual: &mut P) -> bool {
        false
    }
}

/// Manages multiple constraints and evaluates them against individuals.
#[derive(Debug, Clone)]
pub struct ConstraintManager<P> {
    constraints: Vec<Arc<dyn Constraint<P>>>,
}

impl<P> ConstraintManager<P> {
    /// Creates a new empty constraint manager.
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
        }
    }

    /// Adds a constraint to the manager. Constraints repair in insertion order.
    pub fn add_constraint<C>(&mut self, constraint: C) -> &mut Self
    where
        C: Constraint<P> + 'static,
    {
        self.constraints.push(Arc::new(constraint));
        self
    }

    /// Checks the individual against all constraints.
    pub fn check_all(&self, individual: &P) -> Vec<ConstraintViolation> {
        self.constraints
            .iter()
            .flat_map(|c| c.check(individual))
            .collect()
    }

    /// Runs every constraint's repair in order.
    ///
    /// Returns `true` if every constraint reported success.
    pub fn repair_all(&self, individual: &mut P) -> bool {
        let mut all_repaired = true;

        for constraint in &self.constraints {
            if !constraint.repair(individual) {
                all_repaired = false;
            }
        }

        all_repaired
    }

    /// Checks if the individual is valid (satisfies all constraints).
    pub fn is_valid(&self, individual: &P) -> bool {
        self.check_all(individual).is_empty()
    }

    /// Returns the number of constraints in the manager.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Returns `true` if the manager has no constraints.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl<P> Default for ConstraintManager<P> {
    fn default() -> Self {
        Self::new()
    }
}
