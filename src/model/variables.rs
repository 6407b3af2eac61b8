//! Typed variables and their type-erased container.

use crate::domain::{Domain, Interval};
use crate::error::{CspError, Result};
use crate::value::{Element, Value, ValueKind};
use std::fmt;

/// Index handle of a variable inside its [`VcSet`](super::VcSet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of the variable in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named value holder restricted to a [`Domain`].
///
/// The `checkpoint` slot lets search code save a value with
/// [`store`](Self::store) and undo speculative assignments with
/// [`restore`](Self::restore). A variable referenced by at least one
/// constraint is *constrained*; constrained, non-const variables are the
/// free variables solvers search over.
///
/// The domain is never empty.
///
/// # Examples
///
/// ```
/// use u_csp::model::Variable;
///
/// let mut v = Variable::bounded("x", 0i64, 0, 2, 1).unwrap();
/// v.increment().unwrap();
/// v.increment().unwrap();
/// assert!(v.at_upper_boundary().unwrap());
/// v.increment().unwrap(); // wraps to the domain minimum
/// assert_eq!(v.value(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Variable<T> {
    id: String,
    value: T,
    checkpoint: T,
    domain: Domain<T>,
    is_const: bool,
    constrained: usize,
}

impl<T: Element> Variable<T> {
    /// Creates a variable; fails with [`CspError::EmptyDomain`] on an empty domain.
    pub fn new(id: impl Into<String>, value: T, domain: Domain<T>) -> Result<Self> {
        if domain.is_empty() {
            return Err(CspError::EmptyDomain);
        }
        Ok(Self {
            id: id.into(),
            value,
            checkpoint: value,
            domain,
            is_const: false,
            constrained: 0,
        })
    }

    /// A variable whose domain is the single point `value`.
    pub fn fixed(id: impl Into<String>, value: T) -> Self {
        Self {
            id: id.into(),
            value,
            checkpoint: value,
            domain: Domain::from_interval(Interval::point(value)),
            is_const: false,
            constrained: 0,
        }
    }

    /// A variable ranging over `[low, high]/step`.
    pub fn bounded(id: impl Into<String>, value: T, low: T, high: T, step: T) -> Result<Self> {
        Self::new(id, value, Domain::with_bounds(low, high, step)?)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn set_value(&mut self, value: T) {
        self.value = value;
    }

    pub fn checkpoint(&self) -> T {
        self.checkpoint
    }

    pub fn domain(&self) -> &Domain<T> {
        &self.domain
    }

    /// Adds an interval to the domain.
    pub fn insert_interval(&mut self, interval: Interval<T>) -> Result<()> {
        self.domain.insert(interval)
    }

    /// Narrows the domain to `bound` (e.g. to hold the variable constant).
    pub fn restrict(&mut self, bound: Interval<T>) -> Result<()> {
        self.domain.intersect(bound)
    }

    pub fn is_const(&self) -> bool {
        self.is_const
    }

    pub fn set_const(&mut self, is_const: bool) {
        self.is_const = is_const;
    }

    /// Whether any constraint references this variable.
    pub fn is_constrained(&self) -> bool {
        self.constrained > 0
    }

    /// Number of constraints referencing this variable.
    pub fn constraint_count(&self) -> usize {
        self.constrained
    }

    pub(crate) fn mark_constrained(&mut self) {
        self.constrained += 1;
    }

    /// Constrained and not const: a variable the solvers search over.
    pub fn is_free(&self) -> bool {
        self.is_constrained() && !self.is_const
    }

    /// Saves the value into the checkpoint slot.
    pub fn store(&mut self) {
        self.checkpoint = self.value;
    }

    /// Resets the value from the checkpoint slot.
    pub fn restore(&mut self) {
        self.value = self.checkpoint;
    }

    /// Smallest admissible value.
    pub fn first(&self) -> T {
        // domain is never empty
        self.domain.first().unwrap_or(self.value)
    }

    /// Largest admissible bound.
    pub fn last(&self) -> T {
        self.domain.last().unwrap_or(self.value)
    }

    pub fn step_at(&self, value: T) -> Result<T> {
        self.domain.step_at(value)
    }

    /// The value [`increment`](Self::increment) would move to.
    pub fn next_value(&self) -> Result<T> {
        self.successor(self.value)
    }

    fn successor(&self, value: T) -> Result<T> {
        let ivl = self.domain.interval_containing(value)?;
        if let Some(next) = ivl.step_from(value) {
            return Ok(next);
        }
        Ok(self.domain.low_after(ivl.high()).unwrap_or(value))
    }

    /// Steps to the next admissible value.
    ///
    /// Within an interval the value advances by the interval's step. Past
    /// the interval's end it lands exactly on the next interval's `low`, and
    /// past the last interval it wraps around to the domain minimum. Fails
    /// with [`CspError::DomainLookup`] when the current value lies outside
    /// the domain.
    pub fn increment(&mut self) -> Result<()> {
        self.value = self.next_value()?;
        Ok(())
    }

    /// Moves the value to the domain minimum.
    pub fn reset_to_lower(&mut self) {
        self.value = self.first();
    }

    /// Whether the value is the last stepped value of the domain.
    pub fn at_upper_boundary(&self) -> Result<bool> {
        let last = self.last();
        let ivl = self.domain.interval_containing(last)?;
        Ok(ivl.contains(self.value) && last - self.value < ivl.step())
    }

    /// Whether the value is within one step of the domain minimum.
    pub fn at_lower_boundary(&self) -> Result<bool> {
        let first = self.first();
        let ivl = self.domain.interval_containing(first)?;
        Ok(ivl.contains(self.value) && self.value - first < ivl.step())
    }

    /// Whether the next increment would bring the value back to the
    /// checkpoint, i.e. this position is about to carry over.
    pub fn at_critical_below(&self) -> Result<bool> {
        let next = self.next_value()?;
        let step = self.finer_step(next, self.checkpoint)?;
        Ok(next.coincides(self.checkpoint, step))
    }

    /// Whether the value is one increment past the checkpoint.
    pub fn at_critical_above(&self) -> Result<bool> {
        let next = self.successor(self.checkpoint)?;
        let step = self.finer_step(next, self.value)?;
        Ok(self.value.coincides(next, step))
    }

    /// Step at `at`, or at `other` when that one is smaller.
    fn finer_step(&self, at: T, other: T) -> Result<T> {
        let step = self.domain.step_at(at)?;
        Ok(match self.domain.step_at(other) {
            Ok(s) if s < step => s,
            _ => step,
        })
    }
}

impl<T: Element> fmt::Display for Variable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} in {}", self.id, self.value, self.domain)?;
        if self.is_const {
            write!(f, " (const)")?;
        }
        Ok(())
    }
}

/// A variable of any element type, as stored in a [`VcSet`](super::VcSet).
#[derive(Debug, Clone)]
pub enum AnyVariable {
    Int(Variable<i64>),
    Real(Variable<f64>),
}

macro_rules! each {
    ($var:expr, $v:ident => $body:expr) => {
        match $var {
            AnyVariable::Int($v) => $body,
            AnyVariable::Real($v) => $body,
        }
    };
}

impl AnyVariable {
    pub fn id(&self) -> &str {
        each!(self, v => v.id())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            AnyVariable::Int(_) => ValueKind::Int,
            AnyVariable::Real(_) => ValueKind::Real,
        }
    }

    pub fn value(&self) -> Value {
        each!(self, v => v.value().into_value())
    }

    pub fn checkpoint(&self) -> Value {
        each!(self, v => v.checkpoint().into_value())
    }

    /// Assigns a value of the matching element type.
    pub fn set_value(&mut self, value: Value) -> Result<()> {
        let kind = self.kind();
        let mismatch = |id: &str| CspError::TypeMismatch {
            id: id.to_string(),
            expected: value.kind(),
            found: kind,
        };
        match (self, value) {
            (AnyVariable::Int(v), Value::Int(x)) => v.set_value(x),
            (AnyVariable::Real(v), Value::Real(x)) => v.set_value(x),
            (var, _) => return Err(mismatch(var.id())),
        }
        Ok(())
    }

    pub fn is_const(&self) -> bool {
        each!(self, v => v.is_const())
    }

    pub fn set_const(&mut self, is_const: bool) {
        each!(self, v => v.set_const(is_const))
    }

    pub fn is_constrained(&self) -> bool {
        each!(self, v => v.is_constrained())
    }

    pub fn is_free(&self) -> bool {
        each!(self, v => v.is_free())
    }

    pub(crate) fn mark_constrained(&mut self) {
        each!(self, v => v.mark_constrained())
    }

    pub fn store(&mut self) {
        each!(self, v => v.store())
    }

    pub fn restore(&mut self) {
        each!(self, v => v.restore())
    }

    pub fn increment(&mut self) -> Result<()> {
        each!(self, v => v.increment())
    }

    pub fn reset_to_lower(&mut self) {
        each!(self, v => v.reset_to_lower())
    }

    /// Whether the value lies inside the domain bounds.
    pub fn in_domain(&self) -> bool {
        each!(self, v => v.domain().contains(v.value()))
    }

    pub fn at_upper_boundary(&self) -> Result<bool> {
        each!(self, v => v.at_upper_boundary())
    }

    pub fn at_lower_boundary(&self) -> Result<bool> {
        each!(self, v => v.at_lower_boundary())
    }

    pub fn at_critical_below(&self) -> Result<bool> {
        each!(self, v => v.at_critical_below())
    }

    pub fn at_critical_above(&self) -> Result<bool> {
        each!(self, v => v.at_critical_above())
    }

    /// Number of stepped values in the domain.
    pub fn domain_size(&self) -> usize {
        each!(self, v => v.domain().size())
    }

    /// Every stepped domain value, in enumeration order.
    pub fn domain_values(&self) -> Vec<Value> {
        each!(self, v => v.domain().values().map(Element::into_value).collect())
    }

    pub(crate) fn state(&self) -> (Value, Value) {
        (self.value(), self.checkpoint())
    }

    /// Reinstates a `(value, checkpoint)` pair taken by [`state`](Self::state).
    pub(crate) fn reset_state(&mut self, (value, checkpoint): (Value, Value)) {
        match self {
            AnyVariable::Int(v) => {
                if let (Some(x), Some(c)) = (value.as_int(), checkpoint.as_int()) {
                    v.value = x;
                    v.checkpoint = c;
                }
            }
            AnyVariable::Real(v) => {
                if let (Some(x), Some(c)) = (value.as_real(), checkpoint.as_real()) {
                    v.value = x;
                    v.checkpoint = c;
                }
            }
        }
    }
}

impl fmt::Display for AnyVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        each!(self, v => fmt::Display::fmt(v, f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_pieces() -> Variable<i64> {
        let mut d = Domain::new();
        d.insert(Interval::new(0, 2, 1).unwrap()).unwrap();
        d.insert(Interval::new(6, 10, 2).unwrap()).unwrap();
        Variable::new("x", 0, d).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_domain() {
        assert_eq!(
            Variable::new("x", 0i64, Domain::new()).unwrap_err(),
            CspError::EmptyDomain
        );
    }

    #[test]
    fn test_fixed_variable() {
        let v = Variable::fixed("k", 3i64);
        assert_eq!(v.first(), 3);
        assert_eq!(v.last(), 3);
        assert!(v.at_upper_boundary().unwrap());
        assert!(v.at_lower_boundary().unwrap());
        assert!(!v.is_free());
    }

    #[test]
    fn test_store_restore_idempotent() {
        let mut v = Variable::bounded("x", 2i64, 0, 5, 1).unwrap();
        v.store();
        v.restore();
        assert_eq!(v.value(), 2);
        assert_eq!(v.checkpoint(), 2);

        v.store();
        v.increment().unwrap();
        assert_eq!(v.value(), 3);
        v.restore();
        assert_eq!(v.value(), 2);
    }

    #[test]
    fn test_increment_crosses_intervals_exactly() {
        let mut v = two_pieces();
        let mut seen = vec![v.value()];
        for _ in 0..6 {
            v.increment().unwrap();
            seen.push(v.value());
        }
        assert_eq!(seen, vec![0, 1, 2, 6, 8, 10, 0]);
    }

    #[test]
    fn test_increment_outside_domain_fails() {
        let mut v = two_pieces();
        v.set_value(4);
        assert!(matches!(v.increment(), Err(CspError::DomainLookup { .. })));
        assert_eq!(v.value(), 4);
    }

    #[test]
    fn test_boundaries() {
        let mut v = two_pieces();
        assert!(v.at_lower_boundary().unwrap());
        assert!(!v.at_upper_boundary().unwrap());

        v.set_value(10);
        assert!(v.at_upper_boundary().unwrap());
        assert!(!v.at_lower_boundary().unwrap());

        // 9 is one step (2) below the end of the last interval.
        v.set_value(9);
        assert!(v.at_upper_boundary().unwrap());

        // In the first piece, far from the end.
        v.set_value(2);
        assert!(!v.at_upper_boundary().unwrap());
    }

    #[test]
    fn test_critical_positions() {
        let mut v = two_pieces();
        v.store(); // checkpoint at 0
        assert!(!v.at_critical_below().unwrap());

        v.set_value(10);
        assert!(v.at_critical_below().unwrap());

        v.set_value(1);
        assert!(v.at_critical_above().unwrap());
        v.set_value(2);
        assert!(!v.at_critical_above().unwrap());
    }

    #[test]
    fn test_critical_next_to_coarse_interval() {
        let mut d = Domain::new();
        d.insert(Interval::point(0i64)).unwrap();
        d.insert(Interval::new(1, 9, 4).unwrap()).unwrap();
        let mut v = Variable::new("x", 0, d).unwrap();
        v.store();
        // 1 is a distinct position even though it is within half of step 4
        assert!(!v.at_critical_below().unwrap());
        v.set_value(9);
        assert!(v.at_critical_below().unwrap());
    }

    #[test]
    fn test_critical_with_mid_checkpoint() {
        let mut v = Variable::bounded("x", 3i64, 0, 5, 1).unwrap();
        v.store();
        v.set_value(2);
        assert!(v.at_critical_below().unwrap());
        v.set_value(4);
        assert!(v.at_critical_above().unwrap());
    }

    #[test]
    fn test_increment_at_numeric_limit() {
        let mut v = Variable::bounded("x", i64::MAX, i64::MAX - 1, i64::MAX, 1).unwrap();
        assert!(v.at_upper_boundary().unwrap());
        v.increment().unwrap();
        assert_eq!(v.value(), i64::MAX - 1);

        v.store();
        v.set_value(i64::MAX);
        assert!(v.at_critical_below().unwrap());
        assert!(v.at_critical_above().unwrap());
    }

    #[test]
    fn test_real_critical_positions() {
        let mut d = Domain::new();
        d.insert(Interval::new(0.0, 0.3, 0.1).unwrap()).unwrap();
        d.insert(Interval::new(0.5, 1.0, 0.25).unwrap()).unwrap();
        let mut v = Variable::new("r", 0.0, d).unwrap();
        v.store();

        let mut seen = vec![v.value()];
        while !v.at_critical_below().unwrap() {
            v.increment().unwrap();
            seen.push(v.value());
        }
        assert_eq!(seen.len(), v.domain().size());
        assert_eq!(seen[3..], [0.5, 0.75, 1.0]);

        v.set_value(0.1);
        assert!(v.at_critical_above().unwrap());
        v.set_value(0.2);
        assert!(!v.at_critical_above().unwrap());
    }

    #[test]
    fn test_real_critical_absorbs_rounding() {
        let mut v = Variable::bounded("r", 0.3, 0.0, 1.0, 0.1).unwrap();
        v.store();

        v.set_value(0.1);
        v.increment().unwrap();
        // accumulated 0.1 + 0.1 + 0.1 overshoots the stored 0.3
        assert_ne!(v.next_value().unwrap(), 0.3);
        assert!(v.at_critical_below().unwrap());

        v.increment().unwrap();
        assert!(!v.at_critical_below().unwrap());
        assert!(!v.at_critical_above().unwrap());
        v.increment().unwrap();
        assert!(v.at_critical_above().unwrap());
    }

    #[test]
    fn test_real_enumeration_matches_domain_values() {
        let mut v = Variable::bounded("r", 0.0, 0.0, 1.0, 0.1).unwrap();
        let mut count = 1;
        while !v.at_upper_boundary().unwrap() {
            v.increment().unwrap();
            count += 1;
        }
        assert_eq!(count, v.domain().size());
    }

    #[test]
    fn test_restrict_hold_constant() {
        let mut v = Variable::bounded("x", 4i64, 0, 10, 1).unwrap();
        v.restrict(Interval::point(4)).unwrap();
        assert_eq!(v.first(), 4);
        assert_eq!(v.last(), 4);
    }

    #[test]
    fn test_any_variable_dispatch() {
        let mut any = AnyVariable::Int(Variable::bounded("n", 1i64, 0, 3, 1).unwrap());
        assert_eq!(any.kind(), ValueKind::Int);
        assert_eq!(any.value(), Value::Int(1));
        any.increment().unwrap();
        assert_eq!(any.value(), Value::Int(2));
        assert_eq!(any.domain_size(), 4);

        assert!(matches!(
            any.set_value(Value::Real(1.0)),
            Err(CspError::TypeMismatch { .. })
        ));
        any.set_value(Value::Int(0)).unwrap();
        assert!(any.at_lower_boundary().unwrap());
    }

    #[test]
    fn test_any_variable_state_roundtrip() {
        let mut any = AnyVariable::Real(Variable::bounded("r", 0.5, 0.0, 1.0, 0.5).unwrap());
        let saved = any.state();
        any.increment().unwrap();
        any.store();
        any.reset_state(saved);
        assert_eq!(any.value(), Value::Real(0.5));
        assert_eq!(any.checkpoint(), Value::Real(0.5));
    }

    #[test]
    fn test_display() {
        let mut v = Variable::bounded("x", 1i64, 0, 5, 1).unwrap();
        assert_eq!(v.to_string(), "x = 1 in {[0, 5]/1}");
        v.set_const(true);
        assert_eq!(v.to_string(), "x = 1 in {[0, 5]/1} (const)");
    }
}
