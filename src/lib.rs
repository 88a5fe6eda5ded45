pub mod candidate;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod pool;
mod producer;
pub mod rng;
pub mod solver;
pub mod strategy;

// Re-export commonly used types for convenience
pub use error::{Result, SearchError};
pub use genome::{Gene, Genome};
pub use solver::{Solver, SolverOptions, SolverOptionsBuilder};
