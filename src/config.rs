//! Search configuration.
//!
//! [`SearchOptions`] is a plain value object constructed once and passed by
//! reference into both the coordinator and every worker. All fields are
//! validated at call time, before any worker is spawned.

use std::time::Duration;

use crate::error::SearchError;

/// Configuration for one search call.
#[derive(Clone, Debug)]
pub struct SearchOptions {
    /// Maximum number of iterations per worker. `None` means unbounded.
    pub max_iterations: Option<u64>,
    /// Maximum wall-clock time per worker, checked after each iteration.
    /// `None` means unbounded. At least one of `max_iterations` and
    /// `max_time` must be set.
    pub max_time: Option<Duration>,
    /// Number of independent search workers to run concurrently.
    pub parallelism: usize,
    /// Emit progress and decision statistics through the `log` facade.
    pub verbose: bool,
    /// Exploration constant `C` in the UCB1 formula. Higher values explore
    /// more; the default is sqrt(2).
    pub exploration_constant: f64,
    /// Base seed for the per-worker random generators. Worker `i` is seeded
    /// with `seed + i`, so a fixed seed with `parallelism = 1` gives fully
    /// reproducible searches. `None` draws a fresh base seed from entropy.
    pub seed: Option<u64>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_iterations: Some(10_000),
            max_time: None,
            parallelism: num_cpus::get().max(1),
            verbose: false,
            exploration_constant: std::f64::consts::SQRT_2,
            seed: None,
        }
    }
}

impl SearchOptions {
    /// Sets a bound on the number of iterations per worker.
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Removes the iteration bound. `max_time` must then be set.
    pub fn without_max_iterations(mut self) -> Self {
        self.max_iterations = None;
        self
    }

    /// Sets a wall-clock bound per worker.
    pub fn with_max_time(mut self, max_time: Duration) -> Self {
        self.max_time = Some(max_time);
        self
    }

    /// Sets the number of concurrent workers.
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Enables or disables verbose progress logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Overrides the UCB1 exploration constant.
    pub fn with_exploration_constant(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Fixes the base seed for per-worker random generators.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks the configuration invariants. Called by the coordinator before
    /// spawning workers; never retried.
    pub fn validate<E: std::error::Error + 'static>(&self) -> Result<(), SearchError<E>> {
        if self.max_iterations.is_none() && self.max_time.is_none() {
            return Err(SearchError::Unbounded);
        }
        if self.parallelism == 0 {
            return Err(SearchError::ZeroParallelism);
        }
        if !(self.exploration_constant > 0.0) {
            return Err(SearchError::InvalidExploration(self.exploration_constant));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn validate(options: &SearchOptions) -> Result<(), SearchError<Infallible>> {
        options.validate()
    }

    #[test]
    fn default_options_are_valid() {
        let options = SearchOptions::default();
        assert!(validate(&options).is_ok());
        assert!(options.parallelism >= 1);
    }

    #[test]
    fn rejects_unbounded_search() {
        let options = SearchOptions::default().without_max_iterations();
        assert!(matches!(validate(&options), Err(SearchError::Unbounded)));

        // A time bound alone is enough.
        let options = options.with_max_time(Duration::from_millis(10));
        assert!(validate(&options).is_ok());
    }

    #[test]
    fn rejects_zero_parallelism() {
        let options = SearchOptions::default().with_parallelism(0);
        assert!(matches!(
            validate(&options),
            Err(SearchError::ZeroParallelism)
        ));
    }

    #[test]
    fn rejects_non_positive_exploration() {
        for c in [0.0, -1.0, f64::NAN] {
            let options = SearchOptions::default().with_exploration_constant(c);
            assert!(matches!(
                validate(&options),
                Err(SearchError::InvalidExploration(_))
            ));
        }
    }

    #[test]
    fn zero_iterations_is_a_valid_bound() {
        let options = SearchOptions::default().with_max_iterations(0);
        assert!(validate(&options).is_ok());
    }
}
