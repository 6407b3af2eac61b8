//! Numeric element types and their type-erased form.
//!
//! Variables are generic over an [`Element`] type, but a [`VcSet`] stores
//! variables of different element types side by side. [`Value`] and
//! [`AnyVariable`] are the tagged unions that make that possible; the
//! [`Element`] trait converts between the generic and the erased side.
//!
//! [`VcSet`]: crate::model::VcSet

use crate::model::{AnyVariable, Variable};
use num_traits::{Num, NumCast};
use std::cmp::Ordering;
use std::fmt;

/// Element type tag of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueKind {
    /// `i64` elements.
    Int,
    /// `f64` elements.
    Real,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Int => write!(f, "int"),
            ValueKind::Real => write!(f, "real"),
        }
    }
}

/// A single variable value of either element type.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Int(i64),
    Real(f64),
}

impl Value {
    /// Element type of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Real(_) => ValueKind::Real,
        }
    }

    /// Lossy conversion used for reporting and mixed comparisons.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Int(v) => v as f64,
            Value::Real(v) => v,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Value::Int(v) => Some(v),
            Value::Real(_) => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match *self {
            Value::Real(v) => Some(v),
            Value::Int(_) => None,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Real(a), Value::Real(b)) => a.partial_cmp(b),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

/// A numeric type a [`Variable`] can range over.
///
/// Implemented for `i64` and `f64`. The conversion hooks let generic code
/// move in and out of the heterogeneous [`AnyVariable`] container without
/// a runtime type switch at the call site.
pub trait Element:
    Num + NumCast + Copy + PartialOrd + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Tag stored alongside erased values of this type.
    const KIND: ValueKind;

    fn into_value(self) -> Value;

    /// Returns `None` when `value` holds another element type.
    fn from_value(value: Value) -> Option<Self>;

    fn from_variable(var: &AnyVariable) -> Option<&Variable<Self>>;

    fn from_variable_mut(var: &mut AnyVariable) -> Option<&mut Variable<Self>>;

    fn into_variable(var: Variable<Self>) -> AnyVariable;

    /// Whether `self` and `other` denote the same stepped position.
    fn coincides(self, other: Self, step: Self) -> bool;

    /// `self + step`, or `None` when the sum overflows or no longer moves
    /// past `self`.
    fn checked_step(self, step: Self) -> Option<Self>;
}

impl Element for i64 {
    const KIND: ValueKind = ValueKind::Int;

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_int()
    }

    fn from_variable(var: &AnyVariable) -> Option<&Variable<Self>> {
        match var {
            AnyVariable::Int(v) => Some(v),
            AnyVariable::Real(_) => None,
        }
    }

    fn from_variable_mut(var: &mut AnyVariable) -> Option<&mut Variable<Self>> {
        match var {
            AnyVariable::Int(v) => Some(v),
            AnyVariable::Real(_) => None,
        }
    }

    fn into_variable(var: Variable<Self>) -> AnyVariable {
        AnyVariable::Int(var)
    }

    fn coincides(self, other: Self, _step: Self) -> bool {
        self == other
    }

    fn checked_step(self, step: Self) -> Option<Self> {
        self.checked_add(step)
    }
}

impl Element for f64 {
    const KIND: ValueKind = ValueKind::Real;

    fn into_value(self) -> Value {
        Value::Real(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_real()
    }

    fn from_variable(var: &AnyVariable) -> Option<&Variable<Self>> {
        match var {
            AnyVariable::Real(v) => Some(v),
            AnyVariable::Int(_) => None,
        }
    }

    fn from_variable_mut(var: &mut AnyVariable) -> Option<&mut Variable<Self>> {
        match var {
            AnyVariable::Real(v) => Some(v),
            AnyVariable::Int(_) => None,
        }
    }

    fn into_variable(var: Variable<Self>) -> AnyVariable {
        AnyVariable::Real(var)
    }

    fn coincides(self, other: Self, step: Self) -> bool {
        within_half_step(self, other, step)
    }

    fn checked_step(self, step: Self) -> Option<Self> {
        let next = self + step;
        (next > self).then_some(next)
    }
}

/// Whether `a` and `b` are closer than half of `step`; absorbs rounding
/// accumulated by repeated increments.
fn within_half_step(a: f64, b: f64, step: f64) -> bool {
    (a - b).abs() * 2.0 < step
}
