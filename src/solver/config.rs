//! Solver configuration.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Configuration shared by all solvers.
///
/// # Examples
///
/// ```
/// use u_csp::solver::SolverConfig;
///
/// let config = SolverConfig::exhaustive()
///     .with_max_solutions(10)
///     .with_max_checks(100_000);
/// assert_eq!(config.max_solutions, 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Stop after recording this many solutions. 0 = no limit.
    pub max_solutions: usize,

    /// Stop after this many constraint-set evaluations. 0 = no limit.
    pub max_checks: u64,

    /// External cancellation flag, polled once per search step.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl SolverConfig {
    /// Enumerate every solution (generate-and-test default).
    pub fn exhaustive() -> Self {
        Self::default()
    }

    /// Stop at the first solution (backtracking default).
    pub fn first_solution() -> Self {
        Self::default().with_max_solutions(1)
    }

    pub fn with_max_solutions(mut self, n: usize) -> Self {
        self.max_solutions = n;
        self
    }

    pub fn with_max_checks(mut self, n: u64) -> Self {
        self.max_checks = n;
        self
    }

    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }
}
