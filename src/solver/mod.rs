//! Search over the free variables of a constraint set.
//!
//! # Key Components
//!
//! - **Solvers**: [`GenerateTestSolver`], [`BacktrackSolver`] and their
//!   network-driven twins [`NetworkGenerateTestSolver`],
//!   [`NetworkBacktrackSolver`]
//! - **Interface**: [`Solver`] / [`NetworkSolver`] traits
//! - **Configuration**: [`SolverConfig`] — solution and check limits,
//!   cancellation
//! - **Results**: [`Solution`] of [`Assignment`]s, [`SolverStats`]
//!
//! # Checkpoints
//!
//! Every solve leaves the set exactly as it found it: values and
//! checkpoints are saved on entry and put back on every exit path. Found
//! assignments live only in the [`Solution`].
//!
//! # References
//!
//! Dechter (2003), "Constraint Processing", ch. 5 (backtracking search)

mod backtrack;
mod config;
mod generate;
mod guard;
mod network;
mod solution;
mod types;

pub use backtrack::BacktrackSolver;
pub use config::SolverConfig;
pub use generate::GenerateTestSolver;
pub use network::{NetworkBacktrackSolver, NetworkGenerateTestSolver};
pub use solution::{Assignment, Solution, ValueRange};
pub use types::{NetworkSolver, Solver, SolverStats, SolverStatus};
