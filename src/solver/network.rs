//! Solvers driven by a [`BinaryNetwork`].

use super::backtrack::search;
use super::config::SolverConfig;
use super::generate::enumerate;
use super::solution::Solution;
use super::types::{NetworkSolver, SearchControl, Solver, SolverStats};
use crate::error::Result;
use crate::model::VcSet;
use crate::network::BinaryNetwork;
use log::debug;

/// Generate-and-test over the network's free vertices, checking through
/// its edges.
///
/// Produces the same solutions and check count as
/// [`GenerateTestSolver`](super::GenerateTestSolver).
#[derive(Debug, Clone)]
pub struct NetworkGenerateTestSolver {
    config: SolverConfig,
    stats: SolverStats,
}

impl Default for NetworkGenerateTestSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkGenerateTestSolver {
    pub fn new() -> Self {
        Self::with_config(SolverConfig::exhaustive())
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            config,
            stats: SolverStats::default(),
        }
    }
}

impl NetworkSolver for NetworkGenerateTestSolver {
    fn solve_network(
        &mut self,
        set: &mut VcSet,
        network: &BinaryNetwork,
        solution: &mut Solution,
    ) -> Result<bool> {
        network.validate(set)?;
        let order = network.free_vertices(set);
        debug!(
            "network generate-and-test over {} free vertices, {} edges",
            order.len(),
            network.edge_count()
        );
        let mut ctl = SearchControl::new(&self.config);
        let result = enumerate(set, &order, network, &mut ctl, solution);
        self.stats = ctl.finish();
        result?;
        debug!(
            "network generate-and-test finished: {} checks, {} solutions",
            self.stats.checks, self.stats.solutions
        );
        Ok(self.stats.solutions > 0)
    }
}

impl Solver for NetworkGenerateTestSolver {
    fn solve(&mut self, set: &mut VcSet, solution: &mut Solution) -> Result<bool> {
        let network = BinaryNetwork::build(set);
        self.solve_network(set, &network, solution)
    }

    fn stats(&self) -> SolverStats {
        self.stats
    }
}

/// Backtracking over the network's free vertices.
///
/// An edge is evaluated once both endpoints, and any interior variables of
/// its constraint, are labeled. Finds the same solutions as
/// [`BacktrackSolver`](super::BacktrackSolver).
#[derive(Debug, Clone)]
pub struct NetworkBacktrackSolver {
    config: SolverConfig,
    stats: SolverStats,
}

impl Default for NetworkBacktrackSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkBacktrackSolver {
    pub fn new() -> Self {
        Self::with_config(SolverConfig::first_solution())
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            config,
            stats: SolverStats::default(),
        }
    }
}

impl NetworkSolver for NetworkBacktrackSolver {
    fn solve_network(
        &mut self,
        set: &mut VcSet,
        network: &BinaryNetwork,
        solution: &mut Solution,
    ) -> Result<bool> {
        network.validate(set)?;
        let order = network.free_vertices(set);
        debug!(
            "network backtracking over {} free vertices, {} edges",
            order.len(),
            network.edge_count()
        );
        let mut ctl = SearchControl::new(&self.config);
        let result = search(set, &order, network, &mut ctl, solution);
        self.stats = ctl.finish();
        result?;
        debug!(
            "network backtracking finished: {} checks, {} solutions",
            self.stats.checks, self.stats.solutions
        );
        Ok(self.stats.solutions > 0)
    }
}

impl Solver for NetworkBacktrackSolver {
    fn solve(&mut self, set: &mut VcSet, solution: &mut Solution) -> Result<bool> {
        let network = BinaryNetwork::build(set);
        self.solve_network(set, &network, solution)
    }

    fn stats(&self) -> SolverStats {
        self.stats
    }
}
