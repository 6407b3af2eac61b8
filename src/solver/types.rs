//! Solver traits, statistics and search bookkeeping.

use super::config::SolverConfig;
use super::solution::Solution;
use crate::error::Result;
use crate::model::VcSet;
use crate::network::BinaryNetwork;
use std::sync::atomic::Ordering;

/// How a solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStatus {
    /// At least one solution was recorded.
    Solved,
    /// The search space was exhausted without a solution.
    #[default]
    Exhausted,
    /// The cancellation flag was raised.
    Cancelled,
    /// The configured check budget ran out.
    CheckLimit,
}

/// Counters of the most recent solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverStats {
    /// Constraint-set evaluations (full or partial).
    pub checks: u64,
    /// Solutions recorded.
    pub solutions: usize,
    /// How the search ended.
    pub status: SolverStatus,
}

/// A search strategy over the free variables of a [`VcSet`].
///
/// `solve` assigns free variables, records every accepted combination in
/// `solution` and returns whether at least one was found. Whatever the
/// outcome, the set's values and checkpoints are back to their pre-solve
/// state when `solve` returns.
pub trait Solver {
    fn solve(&mut self, set: &mut VcSet, solution: &mut Solution) -> Result<bool>;

    /// Counters of the most recent solve.
    fn stats(&self) -> SolverStats;

    fn num_checks(&self) -> u64 {
        self.stats().checks
    }

    fn num_solutions(&self) -> usize {
        self.stats().solutions
    }
}

/// A solver driven by a prebuilt [`BinaryNetwork`].
pub trait NetworkSolver: Solver {
    /// Solves `set` through `network`, which must have been built from it.
    fn solve_network(
        &mut self,
        set: &mut VcSet,
        network: &BinaryNetwork,
        solution: &mut Solution,
    ) -> Result<bool>;
}

/// Where the search evaluates constraints: the flat set or a network.
pub(crate) trait Checker {
    fn check(&self, set: &VcSet) -> Result<bool>;
    fn check_labeled(&self, set: &VcSet, labeled: &[bool]) -> Result<bool>;
}

/// Evaluates the set's constraint list directly.
pub(crate) struct FlatChecker;

impl Checker for FlatChecker {
    fn check(&self, set: &VcSet) -> Result<bool> {
        set.check()
    }

    fn check_labeled(&self, set: &VcSet, labeled: &[bool]) -> Result<bool> {
        set.check_labeled(labeled)
    }
}

impl Checker for BinaryNetwork {
    fn check(&self, set: &VcSet) -> Result<bool> {
        BinaryNetwork::check(self, set)
    }

    fn check_labeled(&self, set: &VcSet, labeled: &[bool]) -> Result<bool> {
        BinaryNetwork::check_labeled(self, set, labeled)
    }
}

/// Limits, cancellation and counters of one solve.
pub(crate) struct SearchControl<'a> {
    config: &'a SolverConfig,
    checks: u64,
    solutions: usize,
    halted: Option<SolverStatus>,
}

impl<'a> SearchControl<'a> {
    pub(crate) fn new(config: &'a SolverConfig) -> Self {
        Self {
            config,
            checks: 0,
            solutions: 0,
            halted: None,
        }
    }

    /// Polls the cancellation flag. Sticky once the search halted.
    pub(crate) fn should_stop(&mut self) -> bool {
        if self.halted.is_some() {
            return true;
        }
        if let Some(ref flag) = self.config.cancel {
            if flag.load(Ordering::Relaxed) {
                self.halted = Some(SolverStatus::Cancelled);
                return true;
            }
        }
        false
    }

    /// Counts one evaluation. Returns false when the budget is spent.
    pub(crate) fn begin_check(&mut self) -> bool {
        if self.config.max_checks > 0 && self.checks >= self.config.max_checks {
            self.halted = Some(SolverStatus::CheckLimit);
            return false;
        }
        self.checks += 1;
        true
    }

    /// Counts one solution. Returns true when the solution limit is reached.
    pub(crate) fn record_solution(&mut self) -> bool {
        self.solutions += 1;
        self.config.max_solutions > 0 && self.solutions >= self.config.max_solutions
    }

    pub(crate) fn finish(&self) -> SolverStats {
        let status = self.halted.unwrap_or(if self.solutions > 0 {
            SolverStatus::Solved
        } else {
            SolverStatus::Exhausted
        });
        SolverStats {
            checks: self.checks,
            solutions: self.solutions,
            status,
        }
    }
}
