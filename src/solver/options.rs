//! # SolverOptions
//!
//! The `SolverOptions` struct represents the configuration options for a
//! search run. It includes the improvement time budget, the hill-climbing
//! round budget, the fitness direction, reproducibility and diagnostic
//! settings.
//!
//! ## Example
//!
//! ```rust
//! use evosearch::solver::options::SolverOptions;
//!
//! // Default options: 20 s improvement budget, 2 rounds, maximize fitness.
//! let default_options = SolverOptions::default();
//!
//! // Custom options through the builder.
//! let custom_options = SolverOptions::builder()
//!     .max_seconds_without_improvement(1.5)
//!     .max_rounds_without_improvement(10)
//!     .lower_fitness_is_better(true)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Fields
//!
//! - `max_seconds_without_improvement`: How long a scheduler round keeps
//!   running without finding a better candidate. Under a fixed seed this
//!   budget is translated into a deterministic candidate count so repeated
//!   runs are bit-identical.
//! - `max_rounds_without_improvement`: How many genome-growth rounds the
//!   hill-climbing driver tolerates without improvement before giving up.
//! - `lower_fitness_is_better`: Direction of the fitness ordering.
//! - `seed`: Optional seed for reproducible runs. Every concurrent unit
//!   derives its own generator from it; absent, units seed from entropy.
//! - `initial_genome`: Optional starting genome. Validated on entry to the
//!   search against the gene set and chromosome size.
//! - `print_diagnostics` / `print_strategy_usage`: Side-channel tracing
//!   output only; they never change the search outcome.

use crate::error::{Result, SearchError};

const DEFAULT_MAX_SECONDS: f64 = 20.0;
const DEFAULT_MAX_ROUNDS: usize = 2;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverOptions {
    max_seconds_without_improvement: f64,
    max_rounds_without_improvement: usize,
    lower_fitness_is_better: bool,
    seed: Option<u64>,
    initial_genome: Option<String>,
    print_diagnostics: bool,
    print_strategy_usage: bool,
}

impl SolverOptions {
    pub fn get_max_seconds_without_improvement(&self) -> f64 {
        self.max_seconds_without_improvement
    }

    pub fn get_max_rounds_without_improvement(&self) -> usize {
        self.max_rounds_without_improvement
    }

    pub fn get_lower_fitness_is_better(&self) -> bool {
        self.lower_fitness_is_better
    }

    pub fn get_seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn get_initial_genome(&self) -> Option<&str> {
        self.initial_genome.as_deref()
    }

    pub fn get_print_diagnostics(&self) -> bool {
        self.print_diagnostics
    }

    pub fn get_print_strategy_usage(&self) -> bool {
        self.print_strategy_usage
    }

    /// Returns a builder for creating a `SolverOptions` instance.
    ///
    /// # Example
    ///
    /// ```rust
    /// use evosearch::solver::options::SolverOptions;
    ///
    /// let options = SolverOptions::builder()
    ///     .max_seconds_without_improvement(5.0)
    ///     .print_strategy_usage(true)
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn builder() -> SolverOptionsBuilder {
        SolverOptionsBuilder::default()
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_seconds_without_improvement: DEFAULT_MAX_SECONDS,
            max_rounds_without_improvement: DEFAULT_MAX_ROUNDS,
            lower_fitness_is_better: false,
            seed: None,
            initial_genome: None,
            print_diagnostics: false,
            print_strategy_usage: false,
        }
    }
}

/// Builder for `SolverOptions`.
///
/// Provides a fluent interface for constructing `SolverOptions` instances.
/// `build` validates the limits and fails with
/// [`SearchError::Configuration`] on nonsense values.
#[derive(Debug, Clone)]
pub struct SolverOptionsBuilder {
    max_seconds_without_improvement: Option<f64>,
    max_rounds_without_improvement: Option<usize>,
    lower_fitness_is_better: bool,
    seed: Option<u64>,
    initial_genome: Option<String>,
    print_diagnostics: bool,
    print_strategy_usage: bool,
}

impl Default for SolverOptionsBuilder {
    fn default() -> Self {
        Self {
            max_seconds_without_improvement: None,
            max_rounds_without_improvement: None,
            lower_fitness_is_better: false,
            seed: None,
            initial_genome: None,
            print_diagnostics: false,
            print_strategy_usage: false,
        }
    }
}

impl SolverOptionsBuilder {
    /// Sets the improvement time budget in seconds.
    pub fn max_seconds_without_improvement(mut self, value: f64) -> Self {
        self.max_seconds_without_improvement = Some(value);
        self
    }

    /// Sets the hill-climbing round budget.
    pub fn max_rounds_without_improvement(mut self, value: usize) -> Self {
        self.max_rounds_without_improvement = Some(value);
        self
    }

    /// Sets the fitness direction. `true` means smaller fitness wins.
    pub fn lower_fitness_is_better(mut self, value: bool) -> Self {
        self.lower_fitness_is_better = value;
        self
    }

    /// Sets the seed for reproducible runs.
    pub fn seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    /// Sets the starting genome.
    pub fn initial_genome(mut self, value: impl Into<String>) -> Self {
        self.initial_genome = Some(value.into());
        self
    }

    /// Enables per-candidate diagnostic tracing.
    pub fn print_diagnostics(mut self, value: bool) -> Self {
        self.print_diagnostics = value;
        self
    }

    /// Enables the end-of-run strategy usage summary.
    pub fn print_strategy_usage(mut self, value: bool) -> Self {
        self.print_strategy_usage = value;
        self
    }

    /// Builds the `SolverOptions` instance.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Configuration`] when the time budget is not a
    /// finite positive number or the round budget is zero.
    pub fn build(self) -> Result<SolverOptions> {
        let max_seconds = self
            .max_seconds_without_improvement
            .unwrap_or(DEFAULT_MAX_SECONDS);
        if !max_seconds.is_finite() || max_seconds <= 0.0 {
            return Err(SearchError::Configuration(format!(
                "max_seconds_without_improvement must be a finite positive number, got {}",
                max_seconds
            )));
        }
        let max_rounds = self
            .max_rounds_without_improvement
            .unwrap_or(DEFAULT_MAX_ROUNDS);
        if max_rounds == 0 {
            return Err(SearchError::Configuration(
                "max_rounds_without_improvement must be at least 1".to_string(),
            ));
        }
        Ok(SolverOptions {
            max_seconds_without_improvement: max_seconds,
            max_rounds_without_improvement: max_rounds,
            lower_fitness_is_better: self.lower_fitness_is_better,
            seed: self.seed,
            initial_genome: self.initial_genome,
            print_diagnostics: self.print_diagnostics,
            print_strategy_usage: self.print_strategy_usage,
        })
    }
}
