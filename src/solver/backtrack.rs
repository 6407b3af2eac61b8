//! Chronological backtracking.

use super::config::SolverConfig;
use super::guard::CheckpointGuard;
use super::solution::Solution;
use super::types::{Checker, FlatChecker, SearchControl, Solver, SolverStats};
use crate::error::Result;
use crate::model::{VarId, VcSet};
use log::{debug, trace};

/// Depth-first labeling state of one solve.
struct Backtrack<'s, 'c, C: ?Sized> {
    order: &'s [VarId],
    checker: &'s C,
    labeled: Vec<bool>,
    ctl: &'s mut SearchControl<'c>,
    solution: &'s mut Solution,
}

impl<C: Checker + ?Sized> Backtrack<'_, '_, C> {
    /// Labels `order[depth..]`. Returns true when the search must stop.
    fn backtrack(&mut self, set: &mut VcSet, depth: usize) -> Result<bool> {
        if self.ctl.should_stop() {
            return Ok(true);
        }
        let Some(&var) = self.order.get(depth) else {
            if !self.ctl.begin_check() {
                return Ok(true);
            }
            if !self.checker.check(set)? {
                return Ok(false);
            }
            self.solution.add_solution(set, self.order)?;
            trace!("accepted assignment #{}", self.solution.len());
            return Ok(self.ctl.record_solution());
        };

        self.labeled[var.index()] = true;
        set.var_mut(var).reset_to_lower();
        let stop = loop {
            if !self.ctl.begin_check() {
                break true;
            }
            if self.checker.check_labeled(set, &self.labeled)? && self.backtrack(set, depth + 1)? {
                break true;
            }
            if set.var(var).at_upper_boundary()? {
                break false;
            }
            set.var_mut(var).increment()?;
        };
        self.labeled[var.index()] = false;
        Ok(stop)
    }
}

/// Labels `order` depth-first, pruning on constraints whose variables are
/// all labeled. Variables outside `order` count as labeled from the start.
pub(crate) fn search<C: Checker + ?Sized>(
    set: &mut VcSet,
    order: &[VarId],
    checker: &C,
    ctl: &mut SearchControl<'_>,
    solution: &mut Solution,
) -> Result<()> {
    let mut guard = CheckpointGuard::new(set);
    let mut labeled = vec![true; guard.num_variables()];
    for &h in order {
        labeled[h.index()] = false;
    }
    let mut state = Backtrack {
        order,
        checker,
        labeled,
        ctl,
        solution,
    };
    state.backtrack(&mut guard, 0)?;
    Ok(())
}

/// Backtracking search over the free variables of a set.
///
/// Free variables are labeled in insertion order, each iterating its
/// domain from the minimum. After every assignment the constraints whose
/// variables are all labeled are evaluated; a failure prunes the subtree.
/// By default the search stops at the first solution; configure
/// [`SolverConfig::exhaustive`] to enumerate all of them.
///
/// # Examples
///
/// ```
/// use u_csp::model::VcSet;
/// use u_csp::solver::{BacktrackSolver, Solution, Solver};
///
/// let mut set = VcSet::new();
/// set.add_bounded_variable("A", 0i64, 0, 5, 1).unwrap();
/// set.add_bounded_variable("B", 0i64, 0, 5, 1).unwrap();
/// set.add_constraint("prod", "A*B=12", &["A", "B"], |s, ids| {
///     Ok(s.value::<i64>(&ids[0])? * s.value::<i64>(&ids[1])? == 12)
/// })
/// .unwrap();
///
/// let mut solver = BacktrackSolver::new();
/// let mut solution = Solution::new();
/// assert!(solver.solve(&mut set, &mut solution).unwrap());
/// assert_eq!(solution.len(), 1);
/// assert!(solver.num_checks() < 36);
/// ```
#[derive(Debug, Clone)]
pub struct BacktrackSolver {
    config: SolverConfig,
    stats: SolverStats,
}

impl Default for BacktrackSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl BacktrackSolver {
    /// Stops at the first solution.
    pub fn new() -> Self {
        Self::with_config(SolverConfig::first_solution())
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            config,
            stats: SolverStats::default(),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl Solver for BacktrackSolver {
    fn solve(&mut self, set: &mut VcSet, solution: &mut Solution) -> Result<bool> {
        let order = set.free_variables();
        debug!("backtracking over {} free variables", order.len());
        let mut ctl = SearchControl::new(&self.config);
        let result = search(set, &order, &FlatChecker, &mut ctl, solution);
        self.stats = ctl.finish();
        result?;
        debug!(
            "backtracking finished: {} checks, {} solutions, {:?}",
            self.stats.checks, self.stats.solutions, self.stats.status
        );
        Ok(self.stats.solutions > 0)
    }

    fn stats(&self) -> SolverStats {
        self.stats
    }
}
