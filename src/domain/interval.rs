//! Stepped numeric ranges.

use crate::error::{CspError, Result};
use crate::value::Element;
use std::cmp::Ordering;
use std::fmt;

/// A contiguous range `[low, high]` walked in increments of `step`.
///
/// Invariant: `low <= high` and `step > 0`.
///
/// # Examples
///
/// ```
/// use u_csp::domain::Interval;
///
/// let ivl = Interval::new(0i64, 4, 2).unwrap();
/// assert_eq!(ivl.values().collect::<Vec<_>>(), vec![0, 2, 4]);
/// assert!(Interval::new(3i64, 1, 1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval<T> {
    pub(crate) low: T,
    pub(crate) high: T,
    pub(crate) step: T,
}

impl<T: Element> Interval<T> {
    /// Creates an interval, rejecting `low > high`, `step <= 0` and NaN bounds.
    pub fn new(low: T, high: T, step: T) -> Result<Self> {
        #[allow(clippy::neg_cmp_op_on_partial_ord)]
        let invalid = !(low <= high) || !(step > T::zero());
        if invalid {
            return Err(CspError::InvalidInterval {
                low: low.to_string(),
                high: high.to_string(),
                step: step.to_string(),
            });
        }
        Ok(Self { low, high, step })
    }

    /// The single value `[value, value]` with a unit step.
    pub fn point(value: T) -> Self {
        Self {
            low: value,
            high: value,
            step: T::one(),
        }
    }

    pub fn low(&self) -> T {
        self.low
    }

    pub fn high(&self) -> T {
        self.high
    }

    pub fn step(&self) -> T {
        self.step
    }

    pub fn width(&self) -> T {
        self.high - self.low
    }

    /// Whether the interval holds exactly one value.
    pub fn is_unique(&self) -> bool {
        self.low == self.high
    }

    pub fn contains(&self, value: T) -> bool {
        self.low <= value && value <= self.high
    }

    /// Orders intervals by their lower bound.
    pub fn cmp_low(&self, other: &Self) -> Option<Ordering> {
        self.low.partial_cmp(&other.low)
    }

    /// Stepped values `low, low + step, ...` not exceeding `high`.
    ///
    /// Values accumulate the step exactly as [`Variable::increment`] does,
    /// so real-valued enumeration visits the same points.
    ///
    /// [`Variable::increment`]: crate::model::Variable::increment
    pub fn values(&self) -> impl Iterator<Item = T> {
        let ivl = *self;
        std::iter::successors(Some(self.low), move |&v| ivl.step_from(v))
    }

    /// `value + step` when that still lies within the interval.
    ///
    /// Returns `None` instead of overflowing near the numeric limits.
    pub fn step_from(&self, value: T) -> Option<T> {
        value
            .checked_step(self.step)
            .filter(|&next| self.low <= next && next <= self.high)
    }

    /// Number of stepped values.
    pub fn num_values(&self) -> usize {
        self.values().count()
    }
}

impl<T: fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]/{}", self.low, self.high, self.step)
    }
}
