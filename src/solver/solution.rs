//! Recorded solutions.

use crate::error::{CspError, Result};
use crate::model::{SetId, VarId, VcSet};
use crate::value::Value;
use std::fmt;

/// One accepted combination: `(variable id, value)` in solve order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    entries: Vec<(String, Value)>,
}

impl Assignment {
    /// Value recorded for `id`.
    pub fn get(&self, id: &str) -> Option<Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == id)
            .map(|&(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> {
        self.entries.iter().map(|(id, v)| (id.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (id, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{id} = {value}")?;
        }
        Ok(())
    }
}

/// Smallest and largest recorded value of one variable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueRange {
    pub id: String,
    pub min: Value,
    pub max: Value,
}

/// Collection of assignments over one fixed, ordered variable list.
///
/// The first accepted assignment establishes the variable list and the
/// source set; later ones must use the same set and the same list in the
/// same order.
///
/// # Examples
///
/// ```
/// use u_csp::model::VcSet;
/// use u_csp::solver::Solution;
///
/// let mut set = VcSet::new();
/// let a = set.add_variable("A", 4i64).unwrap();
/// let mut solution = Solution::new();
/// solution.add_solution(&set, &[a]).unwrap();
/// assert_eq!(solution.to_string(), "A = 4\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Solution {
    variable_set: Option<Vec<VarId>>,
    source: Option<SetId>,
    assignments: Vec<Assignment>,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the current values of `variables`.
    ///
    /// Fails with [`CspError::SolutionSetMismatch`] when `variables` or
    /// `set` differ from the ones established by the first snapshot.
    pub fn add_solution(&mut self, set: &VcSet, variables: &[VarId]) -> Result<()> {
        match (&self.variable_set, self.source) {
            (Some(established), Some(source)) => {
                if source != set.set_id() || established.as_slice() != variables {
                    return Err(CspError::SolutionSetMismatch);
                }
            }
            _ => {
                if variables.iter().any(|&h| set.get(h).is_none()) {
                    return Err(CspError::SolutionSetMismatch);
                }
                self.variable_set = Some(variables.to_vec());
                self.source = Some(set.set_id());
            }
        }
        let entries = variables
            .iter()
            .filter_map(|&h| set.get(h))
            .map(|var| (var.id().to_string(), var.value()))
            .collect();
        self.assignments.push(Assignment { entries });
        Ok(())
    }

    /// Snapshots every variable of `set`.
    pub fn add_current(&mut self, set: &VcSet) -> Result<()> {
        let all: Vec<VarId> = set.handles().collect();
        self.add_solution(set, &all)
    }

    /// The established variable list, if any snapshot was taken.
    pub fn variable_set(&self) -> Option<&[VarId]> {
        self.variable_set.as_deref()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Assignment> {
        self.assignments.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter()
    }

    /// Drops every assignment and the established variable list.
    pub fn clear(&mut self) {
        self.variable_set = None;
        self.source = None;
        self.assignments.clear();
    }

    /// Per-variable min/max over all assignments, in variable order.
    pub fn ranges(&self) -> Vec<ValueRange> {
        let Some(first) = self.assignments.first() else {
            return Vec::new();
        };
        first
            .entries
            .iter()
            .enumerate()
            .map(|(col, (id, value))| {
                let mut range = ValueRange {
                    id: id.clone(),
                    min: *value,
                    max: *value,
                };
                for row in &self.assignments[1..] {
                    if let Some(&(_, v)) = row.entries.get(col) {
                        if v < range.min {
                            range.min = v;
                        }
                        if v > range.max {
                            range.max = v;
                        }
                    }
                }
                range
            })
            .collect()
    }

    /// One `id: [min, max]` line per variable.
    pub fn range_display(&self) -> String {
        self.ranges()
            .iter()
            .map(|r| format!("{}: [{}, {}]\n", r.id, r.min, r.max))
            .collect()
    }
}

impl fmt::Display for Solution {
    /// A single assignment prints as one row; several print as ranges.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.assignments.as_slice() {
            [] => writeln!(f, "(no solutions)"),
            [only] => writeln!(f, "{only}"),
            _ => write!(f, "{}", self.range_display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> (VcSet, VarId, VarId) {
        let mut set = VcSet::new();
        let a = set.add_bounded_variable("A", 1i64, 0, 9, 1).unwrap();
        let b = set.add_bounded_variable("B", 0.5, 0.0, 1.0, 0.5).unwrap();
        (set, a, b)
    }

    #[test]
    fn test_add_solution_snapshots_values() {
        let (mut set, a, b) = pair();
        let mut solution = Solution::new();
        solution.add_solution(&set, &[a, b]).unwrap();
        set.set_value("A", 7i64).unwrap();
        solution.add_solution(&set, &[a, b]).unwrap();

        assert_eq!(solution.len(), 2);
        assert_eq!(solution.get(0).unwrap().get("A"), Some(Value::Int(1)));
        assert_eq!(solution.get(1).unwrap().get("A"), Some(Value::Int(7)));
        assert_eq!(solution.get(1).unwrap().get("B"), Some(Value::Real(0.5)));
        assert_eq!(solution.variable_set(), Some(&[a, b][..]));
    }

    #[test]
    fn test_mismatched_variable_list() {
        let (set, a, b) = pair();
        let mut solution = Solution::new();
        solution.add_solution(&set, &[a, b]).unwrap();
        assert_eq!(
            solution.add_solution(&set, &[b, a]),
            Err(CspError::SolutionSetMismatch)
        );
        assert_eq!(
            solution.add_solution(&set, &[a]),
            Err(CspError::SolutionSetMismatch)
        );
        assert_eq!(solution.len(), 1);
    }

    #[test]
    fn test_mismatched_source_set() {
        let (set, a, b) = pair();
        let (other, _, _) = pair();
        let mut solution = Solution::new();
        solution.add_solution(&set, &[a, b]).unwrap();
        assert_eq!(
            solution.add_solution(&other, &[a, b]),
            Err(CspError::SolutionSetMismatch)
        );
    }

    #[test]
    fn test_foreign_handle_rejected() {
        let (set, _, _) = pair();
        let mut solution = Solution::new();
        assert_eq!(
            solution.add_solution(&set, &[VarId(5)]),
            Err(CspError::SolutionSetMismatch)
        );
        assert!(solution.variable_set().is_none());
    }

    #[test]
    fn test_clear_forgets_variable_set() {
        let (set, a, b) = pair();
        let mut solution = Solution::new();
        solution.add_solution(&set, &[a, b]).unwrap();
        solution.clear();
        assert!(solution.is_empty());
        solution.add_solution(&set, &[b]).unwrap();
        assert_eq!(solution.len(), 1);
    }

    #[test]
    fn test_ranges_and_display() {
        let (mut set, _, _) = pair();
        let mut solution = Solution::new();
        assert_eq!(solution.to_string(), "(no solutions)\n");

        solution.add_current(&set).unwrap();
        assert_eq!(solution.to_string(), "A = 1, B = 0.5\n");

        set.set_value("A", 4i64).unwrap();
        set.set_value("B", 0.0).unwrap();
        solution.add_current(&set).unwrap();
        set.set_value("A", 2i64).unwrap();
        solution.add_current(&set).unwrap();

        let ranges = solution.ranges();
        assert_eq!(ranges[0].min, Value::Int(1));
        assert_eq!(ranges[0].max, Value::Int(4));
        assert_eq!(ranges[1].min, Value::Real(0.0));
        assert_eq!(ranges[1].max, Value::Real(0.5));
        assert_eq!(solution.to_string(), "A: [1, 4]\nB: [0, 0.5]\n");
    }
}
