//! Finite-domain constraint satisfaction over stepped numeric intervals.
//!
//! Provides a small constraint modeling layer and exhaustive solvers:
//!
//! - **Domains**: [`Interval`](domain::Interval) and
//!   [`Domain`](domain::Domain) — sorted, packed unions of stepped ranges
//!   over `i64` or `f64`.
//! - **Model**: [`VcSet`](model::VcSet) owns variables, parameters
//!   (scalar, point and vector groupings) and constraints whose predicates
//!   are user closures.
//! - **Networks**: [`BinaryNetwork`](network::BinaryNetwork) — graph view
//!   with one edge per constraint.
//! - **Solvers**: generate-and-test and chronological backtracking, each
//!   over the flat set or the network.
//!
//! # Example
//!
//! ```
//! use u_csp::model::VcSet;
//! use u_csp::solver::{BacktrackSolver, Solution, Solver};
//!
//! let mut set = VcSet::new();
//! set.add_bounded_variable("A", 1i64, 0, 5, 1)?;
//! set.add_bounded_variable("B", 3i64, 0, 5, 1)?;
//! set.add_constraint("c0", "A*B=12", &["A", "B"], |s, ids| {
//!     Ok(s.value::<i64>(&ids[0])? * s.value::<i64>(&ids[1])? == 12)
//! })?;
//!
//! let mut solution = Solution::new();
//! assert!(BacktrackSolver::new().solve(&mut set, &mut solution)?);
//! assert_eq!(solution.to_string(), "A = 3, B = 4\n");
//! // the set itself is untouched
//! assert_eq!(set.value::<i64>("A")?, 1);
//! # Ok::<(), u_csp::CspError>(())
//! ```
//!
//! # Logging
//!
//! The crate logs through the `log` facade and never installs a logger.

pub mod domain;
pub mod error;
pub mod model;
pub mod network;
pub mod solver;
pub mod value;

pub use error::{CspError, Result};
