//! Variable domains.
//!
//! A domain is a sorted, disjoint union of stepped [`Interval`]s. Solvers
//! walk it value by value, so the step is part of the domain: `[0, 10]/2`
//! admits `0, 2, ..., 10` and nothing in between.
//!
//! # Key Types
//!
//! - [`Interval`]: `[low, high]` with a positive step
//! - [`Domain`]: packed collection of intervals with insert/intersect

mod interval;
mod interval_set;

pub use interval::Interval;
pub use interval_set::Domain;
