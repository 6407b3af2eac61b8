//! Packed interval domains.

use super::interval::Interval;
use crate::error::{CspError, Result};
use crate::value::Element;
use log::trace;
use std::fmt;

/// The admissible values of one variable.
///
/// Intervals are sorted by `low` and strictly disjoint: every insertion is
/// followed by a pack pass that merges adjacent or overlapping intervals of
/// equal step. Adjacent or overlapping intervals with different steps are
/// rejected, since they would make the enumeration order ambiguous.
///
/// A merged interval keeps the first interval's `low` and walks the shared
/// step from there. Values of the second interval that are out of phase
/// with it are dropped: `[0, 4]/2` packed with `[3, 7]/2` gives `[0, 7]/2`,
/// which holds `0, 2, 4, 6` but not `3, 5, 7`.
///
/// # Examples
///
/// ```
/// use u_csp::domain::{Domain, Interval};
///
/// let mut d = Domain::new();
/// d.insert(Interval::new(0i64, 3, 1).unwrap()).unwrap();
/// d.insert(Interval::new(2i64, 6, 1).unwrap()).unwrap();
/// assert_eq!(d.len(), 1);
/// assert_eq!(d.last(), Some(6));
///
/// // Overlap with a different step is an error and changes nothing.
/// assert!(d.insert(Interval::new(5i64, 9, 2).unwrap()).is_err());
/// assert_eq!(d.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Domain<T> {
    intervals: Vec<Interval<T>>,
}

impl<T: Element> Default for Domain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> Domain<T> {
    /// Creates an empty domain.
    pub fn new() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }

    pub fn from_interval(interval: Interval<T>) -> Self {
        Self {
            intervals: vec![interval],
        }
    }

    /// A single-interval domain `[low, high]/step`.
    pub fn with_bounds(low: T, high: T, step: T) -> Result<Self> {
        Ok(Self::from_interval(Interval::new(low, high, step)?))
    }

    pub fn intervals(&self) -> &[Interval<T>] {
        &self.intervals
    }

    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Inserts an interval, keeping the domain sorted and packed.
    ///
    /// Merging re-phases the inserted values onto the merged interval's
    /// `low`; see the type-level docs. On [`CspError::IntervalStepMismatch`]
    /// the domain is left unchanged.
    pub fn insert(&mut self, interval: Interval<T>) -> Result<()> {
        let mut candidate = self.intervals.clone();
        let at = candidate.partition_point(|i| i.low <= interval.low);
        candidate.insert(at, interval);
        pack(&mut candidate)?;
        self.intervals = candidate;
        Ok(())
    }

    /// Narrows the domain to its overlap with `bound`.
    ///
    /// Intervals wholly outside `bound` are dropped; the ones cut by it are
    /// clamped to its bounds and take its step. Fails with
    /// [`CspError::EmptyDomain`] (domain unchanged) when nothing overlaps.
    pub fn intersect(&mut self, bound: Interval<T>) -> Result<()> {
        let mut narrowed = Vec::with_capacity(self.intervals.len());
        for ivl in &self.intervals {
            if ivl.high < bound.low || ivl.low > bound.high {
                continue;
            }
            let mut clamped = *ivl;
            let mut cut = false;
            if clamped.low < bound.low {
                clamped.low = bound.low;
                cut = true;
            }
            if clamped.high > bound.high {
                clamped.high = bound.high;
                cut = true;
            }
            if cut {
                clamped.step = bound.step;
            }
            narrowed.push(clamped);
        }
        if narrowed.is_empty() {
            return Err(CspError::EmptyDomain);
        }
        pack(&mut narrowed)?;
        self.intervals = narrowed;
        Ok(())
    }

    /// Smallest admissible value.
    pub fn first(&self) -> Option<T> {
        self.intervals.first().map(|i| i.low)
    }

    /// Largest interval bound.
    pub fn last(&self) -> Option<T> {
        self.intervals.iter().map(|i| i.high).fold(None, |acc, h| match acc {
            Some(m) if m >= h => Some(m),
            _ => Some(h),
        })
    }

    /// The interval whose bounds enclose `value`.
    pub fn interval_containing(&self, value: T) -> Result<&Interval<T>> {
        self.intervals
            .iter()
            .find(|i| i.contains(value))
            .ok_or_else(|| CspError::DomainLookup {
                value: value.to_string(),
            })
    }

    pub fn contains(&self, value: T) -> bool {
        self.intervals.iter().any(|i| i.contains(value))
    }

    /// Step of the interval enclosing `value`.
    pub fn step_at(&self, value: T) -> Result<T> {
        self.interval_containing(value).map(|i| i.step)
    }

    /// `low` of the first interval with `low >= value`, wrapping around to
    /// the first interval when none qualifies.
    pub fn next_low_above(&self, value: T) -> Option<T> {
        self.intervals
            .iter()
            .find(|i| i.low >= value)
            .or_else(|| self.intervals.first())
            .map(|i| i.low)
    }

    /// `low` of the first interval starting strictly above `value`,
    /// wrapping around to the first interval when none qualifies.
    pub fn low_after(&self, value: T) -> Option<T> {
        self.intervals
            .iter()
            .find(|i| i.low > value)
            .or_else(|| self.intervals.first())
            .map(|i| i.low)
    }

    /// Total number of stepped values.
    pub fn size(&self) -> usize {
        self.intervals.iter().map(Interval::num_values).sum()
    }

    /// All stepped values in enumeration order.
    pub fn values(&self) -> impl Iterator<Item = T> + '_ {
        self.intervals.iter().flat_map(Interval::values)
    }
}

/// Merges neighbours that touch or overlap; `intervals` must be sorted by `low`.
fn pack<T: Element>(intervals: &mut Vec<Interval<T>>) -> Result<()> {
    let mut k = 0;
    while k + 1 < intervals.len() {
        let (a, b) = (intervals[k], intervals[k + 1]);
        if a.high >= b.low {
            if a.step != b.step {
                return Err(CspError::IntervalStepMismatch {
                    first: a.to_string(),
                    second: b.to_string(),
                });
            }
            if b.high > a.high {
                intervals[k].high = b.high;
            }
            intervals.remove(k + 1);
            trace!("merged {} and {} into {}", a, b, intervals[k]);
            continue;
        }
        k += 1;
    }
    Ok(())
}

impl<T: fmt::Display> fmt::Display for Domain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, ivl) in self.intervals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{ivl}")?;
        }
        write!(f, "}}")
    }
}
