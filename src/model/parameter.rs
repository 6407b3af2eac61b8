//! Named groupings of component variables.

use super::variables::VarId;
use crate::error::{CspError, Result};
use std::fmt;

/// Shape of a [`Parameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParameterKind {
    /// One scalar component.
    Scalar,
    /// A position with `x`, `y`, `z` components.
    Point,
    /// A direction with `x`, `y`, `z` components.
    Vector,
}

impl ParameterKind {
    /// Number of component variables.
    pub fn arity(self) -> usize {
        match self {
            ParameterKind::Scalar => 1,
            ParameterKind::Point | ParameterKind::Vector => 3,
        }
    }

    /// Name suffixes of generated component variables.
    pub(crate) fn suffixes(self) -> &'static [&'static str] {
        match self {
            ParameterKind::Scalar => &[""],
            ParameterKind::Point | ParameterKind::Vector => &[".x", ".y", ".z"],
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterKind::Scalar => write!(f, "scalar"),
            ParameterKind::Point => write!(f, "point"),
            ParameterKind::Vector => write!(f, "vector"),
        }
    }
}

/// A composite quantity whose components are variables of the same set.
///
/// The component handles are ordered (`x`, `y`, `z` for points and
/// vectors) and do not own the variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    kind: ParameterKind,
    variables: Vec<VarId>,
}

impl Parameter {
    pub(crate) fn new(name: String, kind: ParameterKind, variables: Vec<VarId>) -> Result<Self> {
        if variables.len() != kind.arity() {
            return Err(CspError::ParameterArity {
                name,
                kind: kind.to_string(),
                expected: kind.arity(),
                found: variables.len(),
            });
        }
        Ok(Self {
            name,
            kind,
            variables,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    /// Component handles in order.
    pub fn variables(&self) -> &[VarId] {
        &self.variables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity() {
        assert_eq!(ParameterKind::Scalar.arity(), 1);
        assert_eq!(ParameterKind::Point.arity(), 3);
        assert_eq!(ParameterKind::Vector.suffixes(), &[".x", ".y", ".z"]);
    }

    #[test]
    fn test_arity_mismatch() {
        let err = Parameter::new("p".into(), ParameterKind::Point, vec![VarId(0)]).unwrap_err();
        assert_eq!(
            err,
            CspError::ParameterArity {
                name: "p".into(),
                kind: "point".into(),
                expected: 3,
                found: 1,
            }
        );
    }

    #[test]
    fn test_components_keep_order() {
        let p = Parameter::new(
            "v".into(),
            ParameterKind::Vector,
            vec![VarId(2), VarId(0), VarId(1)],
        )
        .unwrap();
        assert_eq!(p.variables(), &[VarId(2), VarId(0), VarId(1)]);
        assert_eq!(p.kind(), ParameterKind::Vector);
    }
}
