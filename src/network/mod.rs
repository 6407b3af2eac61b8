//! Binary constraint networks.
//!
//! A [`BinaryNetwork`] is a graph view of a
//! [`VcSet`](crate::model::VcSet): one vertex per variable and one edge per
//! constraint, joining the constraint's first and last variable. The
//! network-driven solvers in [`solver`](crate::solver) walk this graph
//! instead of the flat variable list.

mod graph;

pub use graph::{BinaryNetwork, NetworkDisplay};
