//! Constraint model: variables, parameters, constraints and their owner.
//!
//! # Key Components
//!
//! - **Variables**: [`Variable`] (generic over [`Element`](crate::value::Element))
//!   and the type-erased [`AnyVariable`]
//! - **Parameters**: [`Parameter`] — named groups of component variables
//! - **Constraints**: [`Constraint`] — named predicates over variable ids
//! - **Set**: [`VcSet`] — owning registry and checkpoint coordinator
//!
//! # Handles
//!
//! Variables and constraints are addressed by string id at the API
//! surface and by index handles ([`VarId`], [`ConstraintId`]) internally.
//! Handles never dangle: nothing is removed from a set once added.

mod constraint;
mod parameter;
mod variables;
mod vcset;

pub use constraint::{Constraint, ConstraintId, Evaluator};
pub use parameter::{Parameter, ParameterKind};
pub use variables::{AnyVariable, VarId, Variable};
pub use vcset::{SetId, VcSet};
