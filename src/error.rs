//! # Error Types
//!
//! This module defines the error type shared by the optimizer. The core itself
//! degrades gracefully on empty inputs; errors come from malformed boundary
//! records, invalid configuration, or collaborator failures surfaced by the
//! service layer.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use study_optimizer::error::{PlannerError, Result};
//!
//! fn some_function() -> Result<()> {
//!     Ok(())
//! }
//!
//! match some_function() {
//!     Ok(_) => println!("Success!"),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use study_optimizer::error::{OptionExt, PlannerError};
//!
//! fn first_score(scores: &[f64]) -> study_optimizer::error::Result<f64> {
//!     scores.first().copied().ok_or_else_planner(|| PlannerError::EmptyPopulation)
//! }
//! ```

use std::error::Error as StdError;
use thiserror::Error;

/// Boxed error type returned by storage collaborators.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Represents errors that can occur while deriving windows or evolving a schedule.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// A boundary record is missing a field that is required to build it.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A boundary record carries a value that cannot be interpreted.
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    /// A clock-time string is not of the form `HH:MM`.
    #[error("Invalid clock time: {0}")]
    InvalidTime(String),

    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when a fitness calculation produces a non-finite score.
    #[error("Fitness calculation error: {0}")]
    FitnessCalculation(String),

    /// Error that occurs when an evolution process fails.
    #[error("Evolution error: {0}")]
    Evolution(String),

    /// A storage collaborator failed.
    #[error("Store error: {0}")]
    Store(#[source] BoxError),

    /// Internal failure reported by the service layer, carrying the original cause.
    #[error("{context}: {source}")]
    OptimizationFailed {
        context: String,
        #[source]
        source: Box<PlannerError>,
    },
}

impl PlannerError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        PlannerError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// A specialized Result type for optimizer operations.
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T>` using a closure to generate the error.
    fn ok_or_else_planner<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> PlannerError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_planner<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> PlannerError,
    {
        self.ok_or_else(err_fn)
    }
}
