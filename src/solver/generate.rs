//! Generate-and-test enumeration.

use super::config::SolverConfig;
use super::guard::CheckpointGuard;
use super::solution::Solution;
use super::types::{Checker, FlatChecker, SearchControl, Solver, SolverStats};
use crate::error::Result;
use crate::model::{VarId, VcSet};
use log::{debug, trace};

/// Odometer over the cross product of the free variables' domains.
///
/// Every position starts at its domain minimum, which is also stored as
/// its checkpoint. A position carries over when its next increment would
/// land back on the checkpoint; the last position turns fastest.
pub(crate) struct Odometer<'a> {
    order: &'a [VarId],
    started: bool,
}

impl<'a> Odometer<'a> {
    pub(crate) fn initiate(set: &mut VcSet, order: &'a [VarId]) -> Self {
        for &h in order {
            let var = set.var_mut(h);
            var.reset_to_lower();
            var.store();
        }
        Self {
            order,
            started: false,
        }
    }

    /// Moves to the next combination. Returns false once every combination
    /// has been produced.
    pub(crate) fn generate(&mut self, set: &mut VcSet) -> Result<bool> {
        if !self.started {
            self.started = true;
            return Ok(true);
        }
        let mut pos = self.order.len();
        loop {
            if pos == 0 {
                return Ok(false);
            }
            pos -= 1;
            if !set.var(self.order[pos]).at_critical_below()? {
                break;
            }
        }
        set.var_mut(self.order[pos]).increment()?;
        for &h in &self.order[pos + 1..] {
            set.var_mut(h).restore();
        }
        Ok(true)
    }
}

/// Evaluates every combination of `order` and records the accepted ones.
pub(crate) fn enumerate<C: Checker + ?Sized>(
    set: &mut VcSet,
    order: &[VarId],
    checker: &C,
    ctl: &mut SearchControl<'_>,
    solution: &mut Solution,
) -> Result<()> {
    let mut guard = CheckpointGuard::new(set);
    let mut odometer = Odometer::initiate(&mut guard, order);
    while !ctl.should_stop() && odometer.generate(&mut guard)? {
        if !ctl.begin_check() {
            break;
        }
        if checker.check(&guard)? {
            solution.add_solution(&guard, order)?;
            trace!("accepted combination #{}", solution.len());
            if ctl.record_solution() {
                break;
            }
        }
    }
    Ok(())
}

/// Exhaustive generate-and-test over the free variables of a set.
///
/// Visits every point of the cross product of the free variables' domains
/// exactly once, so `num_checks()` equals the product of the domain sizes
/// unless a limit stops the search early.
///
/// # Examples
///
/// ```
/// use u_csp::model::VcSet;
/// use u_csp::solver::{GenerateTestSolver, Solution, Solver};
///
/// let mut set = VcSet::new();
/// set.add_bounded_variable("A", 0i64, 0, 3, 1).unwrap();
/// set.add_bounded_variable("B", 0i64, 0, 3, 1).unwrap();
/// set.add_constraint("sum", "A+B=3", &["A", "B"], |s, ids| {
///     Ok(s.value::<i64>(&ids[0])? + s.value::<i64>(&ids[1])? == 3)
/// })
/// .unwrap();
///
/// let mut solver = GenerateTestSolver::new();
/// let mut solution = Solution::new();
/// assert!(solver.solve(&mut set, &mut solution).unwrap());
/// assert_eq!(solver.num_checks(), 16);
/// assert_eq!(solution.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct GenerateTestSolver {
    config: SolverConfig,
    stats: SolverStats,
}

impl Default for GenerateTestSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerateTestSolver {
    /// Enumerates every solution.
    pub fn new() -> Self {
        Self::with_config(SolverConfig::exhaustive())
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

impl Solver for GenerateTestSolver {
    fn solve(&mut self, set: &mut VcSet, solution: &mut Solution) -> Result<bool> {
        let order = set.free_variables();
        debug!("generate-and-test over {} free variables", order.len());
        let mut ctl = SearchControl::new(&self.config);
        let result = enumerate(set, &order, &FlatChecker, &mut ctl, solution);
        self.stats = ctl.finish();
        result?;
        debug!(
            "generate-and-test finished: {} checks, {} solutions, {:?}",
            self.stats.checks, self.stats.solutions, self.stats.status
        );
        Ok(self.stats.solutions > 0)
    }

    fn stats(&self) -> SolverStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Domain, Interval};
    use crate::error::CspError;
    use crate::solver::SolverStatus;
    use crate::value::Value;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use test_log::test;

    fn sum_is(target: i64) -> impl Fn(&VcSet, &[String]) -> Result<bool> + Send + Sync {
        move |s, ids| {
            let mut total = 0;
            for id in ids {
                total += s.value::<i64>(id)?;
            }
            Ok(total == target)
        }
    }

    #[test]
    fn test_odometer_visits_cross_product_once() {
        let mut set = VcSet::new();
        set.add_bounded_variable("A", 1i64, 0, 2, 1).unwrap();
        let mut d = Domain::new();
        d.insert(Interval::new(0, 1, 1).unwrap()).unwrap();
        d.insert(Interval::new(5, 9, 4).unwrap()).unwrap();
        set.add_variable_with_domain("B", 9i64, d).unwrap();
        let order: Vec<VarId> = set.handles().collect();

        let mut odometer = Odometer::initiate(&mut set, &order);
        let mut seen = Vec::new();
        while odometer.generate(&mut set).unwrap() {
            seen.push((set.value::<i64>("A").unwrap(), set.value::<i64>("B").unwrap()));
        }
        let mut expected = Vec::new();
        for a in 0..=2 {
            for b in [0, 1, 5, 9] {
                expected.push((a, b));
            }
        }
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_counts_every_combination() {
        let mut set = VcSet::new();
        for id in ["A", "B", "C"] {
            set.add_bounded_variable(id, 0i64, 0, 3, 1).unwrap();
        }
        set.add_constraint("sum", "A+B+C=3", &["A", "B", "C"], sum_is(3)).unwrap();

        let mut solver = GenerateTestSolver::new();
        let mut solution = Solution::new();
        assert!(solver.solve(&mut set, &mut solution).unwrap());
        assert_eq!(solver.num_checks(), 64);
        // compositions of 3 into three parts in 0..=3
        assert_eq!(solver.num_solutions(), 10);
        assert_eq!(solution.len(), 10);
        assert_eq!(solver.stats().status, SolverStatus::Solved);
    }

    #[test]
    fn test_const_and_unconstrained_are_not_enumerated() {
        let mut set = VcSet::new();
        set.add_bounded_variable("A", 0i64, 0, 3, 1).unwrap();
        set.add_bounded_variable("B", 2i64, 0, 3, 1).unwrap();
        set.add_bounded_variable("idle", 0i64, 0, 99, 1).unwrap();
        set.add_constraint("sum", "A+B=3", &["A", "B"], sum_is(3)).unwrap();
        set.set_const("B", true).unwrap();

        let mut solver = GenerateTestSolver::new();
        let mut solution = Solution::new();
        assert!(solver.solve(&mut set, &mut solution).unwrap());
        assert_eq!(solver.num_checks(), 4);
        assert_eq!(solution.len(), 1);
        assert_eq!(solution.get(0).unwrap().get("A"), Some(Value::Int(1)));
        assert_eq!(solution.get(0).unwrap().get("B"), None);
    }

    #[test]
    fn test_restores_values_after_solve() {
        let mut set = VcSet::new();
        set.add_bounded_variable("A", 2i64, 0, 3, 1).unwrap();
        set.add_bounded_variable("B", 3i64, 0, 3, 1).unwrap();
        set.add_constraint("sum", "A+B=9", &["A", "B"], sum_is(9)).unwrap();

        let mut solver = GenerateTestSolver::new();
        let mut solution = Solution::new();
        assert!(!solver.solve(&mut set, &mut solution).unwrap());
        assert_eq!(solver.stats().status, SolverStatus::Exhausted);
        assert!(solution.is_empty());
        assert_eq!(set.value::<i64>("A").unwrap(), 2);
        assert_eq!(set.value::<i64>("B").unwrap(), 3);
    }

    #[test]
    fn test_domain_at_numeric_limit() {
        let mut set = VcSet::new();
        set.add_bounded_variable("A", i64::MAX, i64::MAX - 2, i64::MAX, 1).unwrap();
        set.add_constraint("odd", "A%2=1", &["A"], |s, ids| {
            Ok(s.value::<i64>(&ids[0])? % 2 == 1)
        })
        .unwrap();

        let mut solver = GenerateTestSolver::new();
        let mut solution = Solution::new();
        assert!(solver.solve(&mut set, &mut solution).unwrap());
        assert_eq!(solver.num_checks(), 3);
        assert_eq!(solution.len(), 2);
        assert_eq!(solution.get(0).unwrap().get("A"), Some(Value::Int(i64::MAX - 2)));
        assert_eq!(solution.get(1).unwrap().get("A"), Some(Value::Int(i64::MAX)));
        assert_eq!(set.value::<i64>("A").unwrap(), i64::MAX);
    }

    #[test]
    fn test_no_free_variables_checks_once() {
        let mut set = VcSet::new();
        set.add_variable("A", 3i64).unwrap();
        set.add_constraint("three", "A=3", &["A"], sum_is(3)).unwrap();
        set.set_const("A", true).unwrap();

        let mut solver = GenerateTestSolver::new();
        let mut solution = Solution::new();
        assert!(solver.solve(&mut set, &mut solution).unwrap());
        assert_eq!(solver.num_checks(), 1);
    }

    #[test]
    fn test_limits() {
        let mut set = VcSet::new();
        set.add_bounded_variable("A", 0i64, 0, 9, 1).unwrap();
        set.add_constraint("any", "true", &["A"], |_, _| Ok(true)).unwrap();

        let mut solver =

            GenerateTestSolver::with_config(SolverConfig::exhaustive().with_max_solutions(3));
        let mut solution = Solution::new();
        assert!(solver.solve(&mut set, &mut solution).unwrap());
        assert_eq!(solution.len(), 3);
        assert_eq!(solver.num_checks(), 3);

        let mut solver =

            GenerateTestSolver::with_config(SolverConfig::exhaustive().with_max_checks(5));
        let mut solution = Solution::new();
        solver.solve(&mut set, &mut solution).unwrap();
        assert_eq!(solver.num_checks(), 5);
        assert_eq!(solver.stats().status, SolverStatus::CheckLimit);
    }

    #[test]
    fn test_cancelled_before_start() {
        let mut set = VcSet::new();
        set.add_bounded_variable("A", 0i64, 0, 9, 1).unwrap();
        set.add_constraint("any", "true", &["A"], |_, _| Ok(true)).unwrap();

        let flag = Arc::new(AtomicBool::new(true));
        let mut solver =
            GenerateTestSolver::with_config(SolverConfig::exhaustive().with_cancel(flag));
        let mut solution = Solution::new();
        assert!(!solver.solve(&mut set, &mut solution).unwrap());
        assert_eq!(solver.num_checks(), 0);
        assert_eq!(solver.stats().status, SolverStatus::Cancelled);
    }

    #[test]
    fn test_evaluator_error_restores_set() {
        let mut set = VcSet::new();
        set.add_bounded_variable("A", 4i64, 0, 9, 1).unwrap();
        set.add_constraint("boom", "A<3", &["A"], |s, ids| {
            let a = s.value::<i64>(&ids[0])?;
            if a >= 3 {
                return Err(CspError::evaluation("out of range"));
            }
            Ok(true)
        })
        .unwrap();

        let mut solver = GenerateTestSolver::new();
        let mut solution = Solution::new();
        assert_eq!(
            solver.solve(&mut set, &mut solution),
            Err(CspError::Evaluation("out of range".into()))
        );
        assert_eq!(solver.num_checks(), 4);
        assert_eq!(solution.len(), 3);
        assert_eq!(set.value::<i64>("A").unwrap(), 4);
    }
}
