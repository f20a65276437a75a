pub mod availability;
pub mod breeding;
pub mod constraints;
pub mod error;
pub mod evolution;
pub mod optimizer;
pub mod rng;
pub mod schedule;
pub mod selection;
pub mod service;
pub mod task;
pub mod time;

// Re-export commonly used types for convenience
pub use error::{OptionExt, PlannerError, Result};
pub use optimizer::{PlanningRequest, ScheduleOptimizer};
pub use schedule::{PlanningProblem, StudyBlock, StudySchedule};
pub use task::{ComplexityLevel, Task};
