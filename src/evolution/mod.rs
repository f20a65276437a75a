pub mod challenge;
pub mod fitness;
pub mod launcher;
pub mod options;

pub use challenge::Challenge;
pub use fitness::{FitnessBreakdown, FitnessEvaluator, FitnessWeights};
pub use launcher::{EvolutionLauncher, EvolutionResult, GenerationStats};
pub use options::{EvolutionOptions, EvolutionOptionsBuilder, LogLevel};
