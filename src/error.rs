//! Error type shared by every module of the crate.

use crate::value::ValueKind;
use thiserror::Error;

/// Errors raised while building or solving a constraint set.
///
/// Every failure is reported at the call that detected it; nothing is
/// retried. Errors returned by constraint evaluators propagate unchanged
/// out of `solve()`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CspError {
    /// A value is not enclosed by any interval of a domain.
    #[error("value {value} is not covered by any interval of the domain")]
    DomainLookup { value: String },

    /// Two adjacent or overlapping intervals carry different steps.
    #[error("intervals {first} and {second} overlap with different steps")]
    IntervalStepMismatch { first: String, second: String },

    /// `low > high` or a non-positive step.
    #[error("invalid interval [{low}, {high}] with step {step}")]
    InvalidInterval {
        low: String,
        high: String,
        step: String,
    },

    /// The operation would leave a variable without admissible values.
    #[error("domain is empty")]
    EmptyDomain,

    /// `add_solution` got a variable set other than the established one.
    #[error("variable set does not match the one established by the first solution")]
    SolutionSetMismatch,

    #[error("duplicate variable id: {0}")]
    DuplicateVariableId(String),

    #[error("duplicate parameter id: {0}")]
    DuplicateParameterId(String),

    #[error("duplicate constraint id: {0}")]
    DuplicateConstraintId(String),

    #[error("unknown id: {0}")]
    UnknownId(String),

    /// A typed accessor was used with the wrong element type.
    #[error("variable {id} holds {found} values, not {expected}")]
    TypeMismatch {
        id: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("parameter {name} of kind {kind} expects {expected} components, got {found}")]
    ParameterArity {
        name: String,
        kind: String,
        expected: usize,
        found: usize,
    },

    #[error("constraint {0} references no variables")]
    EmptyConstraint(String),

    /// A network was used with a set it was not built from, or the set
    /// has grown since.
    #[error("network was built from a different or since-modified variable set")]
    NetworkMismatch,

    /// Raised by user evaluators.
    #[error("evaluation failed: {0}")]
    Evaluation(String),
}

impl CspError {
    /// Convenience constructor for evaluator failures.
    pub fn evaluation(message: impl Into<String>) -> Self {
        CspError::Evaluation(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CspError>;
