//! Named predicates over variables.

use super::variables::VarId;
use super::vcset::VcSet;
use crate::error::Result;
use std::cell::Cell;
use std::fmt;

/// Evaluation callback of a [`Constraint`].
///
/// Receives the owning set and the constraint's variable ids in
/// declaration order. Errors are propagated out of the solver that
/// triggered the evaluation.
pub type Evaluator = Box<dyn Fn(&VcSet, &[String]) -> Result<bool> + Send + Sync>;

/// Index handle of a constraint inside its [`VcSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub(crate) usize);

impl ConstraintId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named boolean predicate bound to an ordered list of variables.
///
/// The variable list is never empty; its first and last entries are the
/// endpoints of the constraint's edge in a
/// [`BinaryNetwork`](crate::network::BinaryNetwork).
pub struct Constraint {
    id: String,
    expression: String,
    variable_ids: Vec<String>,
    handles: Vec<VarId>,
    evaluator: Evaluator,
    last_status: Cell<Option<bool>>,
}

impl Constraint {
    pub(crate) fn new(
        id: String,
        expression: String,
        variable_ids: Vec<String>,
        handles: Vec<VarId>,
        evaluator: Evaluator,
    ) -> Self {
        Self {
            id,
            expression,
            variable_ids,
            handles,
            evaluator,
            last_status: Cell::new(None),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable form, for diagnostics only.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn variable_ids(&self) -> &[String] {
        &self.variable_ids
    }

    /// Handles of the referenced variables, in declaration order.
    pub fn variables(&self) -> &[VarId] {
        &self.handles
    }

    /// Result of the most recent [`check`](Self::check), if any.
    pub fn last_status(&self) -> Option<bool> {
        self.last_status.get()
    }

    /// Evaluates the predicate against the current values of `set`.
    pub fn check(&self, set: &VcSet) -> Result<bool> {
        let status = (self.evaluator)(set, &self.variable_ids)?;
        self.last_status.set(Some(status));
        Ok(status)
    }

    /// Whether every referenced variable is marked in `labeled`.
    pub fn is_ready(&self, labeled: &[bool]) -> bool {
        self.handles
            .iter()
            .all(|h| labeled.get(h.index()).copied().unwrap_or(false))
    }

    /// First and last referenced variable.
    pub fn endpoints(&self) -> (VarId, VarId) {
        let first = self.handles[0];
        let last = self.handles[self.handles.len() - 1];
        (first, last)
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("id", &self.id)
            .field("expression", &self.expression)
            .field("variable_ids", &self.variable_ids)
            .field("last_status", &self.last_status.get())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.id,
            self.expression,
            self.variable_ids.join(", ")
        )
    }
}
