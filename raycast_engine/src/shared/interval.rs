use std::fmt::{Display, Formatter};
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

/// Represents an interval of values. There may/not be a `start` and/or `end` bound.
///
/// Used as the valid parametric range of a ray: a query only accepts hits with
/// `start <= dist <= end`.
///
/// # Requirements
/// It is a logic error for `start > end`. Construction does not enforce this
/// (for performance reasons); the scene entry point rejects invalid intervals
/// before traversal (see [`Interval::is_valid`]).
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub struct Interval<T> {
    pub start: Option<T>,
    pub end: Option<T>,
}

// region Range conversions

impl<T> From<RangeFull> for Interval<T> {
    fn from(_value: RangeFull) -> Self { Self { start: None, end: None } }
}
impl<T> From<RangeInclusive<T>> for Interval<T> {
    fn from(value: RangeInclusive<T>) -> Self {
        let (min, max) = value.into_inner();
        Self {
            start: Some(min),
            end: Some(max),
        }
    }
}
impl<T> From<RangeTo<T>> for Interval<T> {
    fn from(value: RangeTo<T>) -> Self {
        Self {
            start: None,
            end: Some(value.end),
        }
    }
}
impl<T> From<RangeToInclusive<T>> for Interval<T> {
    fn from(value: RangeToInclusive<T>) -> Self {
        Self {
            start: None,
            end: Some(value.end),
        }
    }
}
impl<T> From<RangeFrom<T>> for Interval<T> {
    fn from(value: RangeFrom<T>) -> Self {
        Self {
            start: Some(value.start),
            end: None,
        }
    }
}
impl<T> From<Range<T>> for Interval<T> {
    fn from(value: Range<T>) -> Self {
        Self {
            start: Some(value.start),
            end: Some(value.end),
        }
    }
}

// endregion Range conversions

impl<T> Interval<T> {
    pub const FULL: Self = Self { start: None, end: None };

    /// Shrinks the interval's far bound; used during traversal so that subtrees
    /// farther than the current-best hit get pruned
    pub fn with_some_end(self, end: T) -> Self { Self { end: Some(end), ..self } }
}

impl<T: PartialOrd> Interval<T> {
    /// Checks the `start <= end` invariant holds (trivially true for open ends)
    pub fn is_valid(&self) -> bool {
        match self {
            Self {
                start: Some(start),
                end: Some(end),
            } => start <= end,
            _ => true,
        }
    }

    /// Checks if the given range `min..max` overlaps with the interval (`self`)
    pub fn range_overlaps(&self, min: &T, max: &T) -> bool {
        return match self {
            Self { start: None, end: None } => min <= max,
            Self {
                start: Some(start),
                end: Some(end),
            } => {
                let low = if min > start { min } else { start };
                let high = if max < end { max } else { end };
                low <= high
            }
            Self {
                start: None,
                end: Some(end),
            } => {
                let high = if max < end { max } else { end };
                min <= high
            }
            Self {
                start: Some(start),
                end: None,
            } => {
                let low = if min > start { min } else { start };
                low <= max
            }
        };
    }

    pub fn contains(&self, item: &T) -> bool {
        match self {
            Self {
                start: Some(start),
                end: Some(end),
            } => start <= item && item <= end,
            Self {
                start: Some(start),
                end: None,
            } => start <= item,
            Self {
                start: None,
                end: Some(end),
            } => item <= end,
            Self { start: None, end: None } => true,
        }
    }
}

impl<T: Display> Display for Interval<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(start) = &self.start {
            write!(f, "{start}")?;
        }
        write!(f, "..")?;
        if let Some(end) = &self.end {
            write!(f, "{end}")?
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::types::Number;

    #[test]
    fn contains_respects_bounds() {
        let i = Interval::from(1.0..=4.0);
        assert!(i.contains(&1.0));
        assert!(i.contains(&4.0));
        assert!(!i.contains(&0.5));
        assert!(!i.contains(&4.5));

        let from = Interval::from(2.0..);
        assert!(from.contains(&Number::INFINITY));
        assert!(!from.contains(&1.0));

        assert!(Interval::<Number>::FULL.contains(&-1e300));
    }

    #[test]
    fn range_overlaps_partial_and_disjoint() {
        let i = Interval::from(1.0..=4.0);
        assert!(i.range_overlaps(&0.0, &2.0));
        assert!(i.range_overlaps(&3.0, &10.0));
        assert!(i.range_overlaps(&2.0, &3.0));
        assert!(!i.range_overlaps(&5.0, &10.0));
        assert!(!i.range_overlaps(&-2.0, &0.5));
        // inverted query range never overlaps
        assert!(!i.range_overlaps(&3.0, &2.0));
    }

    #[test]
    fn validity() {
        assert!(Interval::from(0.0..1.0).is_valid());
        assert!(Interval::<Number>::FULL.is_valid());
        assert!(Interval::from(1.0..).is_valid());
        assert!(!Interval::from(1.0..=0.0).is_valid());
    }

    #[test]
    fn shrinking_far_bound() {
        let i = Interval::from(0.0..).with_some_end(3.0);
        assert!(i.contains(&3.0));
        assert!(!i.contains(&3.1));
    }
}
