//! Streaming accumulators fed by a grouping.

use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::Extreme;
use crate::traits::{Comparator, Error, Projection, Result};

/// Private fold state for one terminal operation on one grouping.
///
/// Elements arrive in source order. Accumulators never fail while folding;
/// anything that can go wrong is reported when the result is read.
pub trait Accumulator<T> {
    fn accumulate(&mut self, item: &T);
}

pub(crate) type SharedAccumulator<T> = Rc<RefCell<dyn Accumulator<T>>>;

#[derive(Debug, Default)]
pub struct CountAccumulator {
    seen: usize,
}

impl CountAccumulator {
    pub fn count(&mut self) -> usize {
        self.seen
    }
}

impl<T> Accumulator<T> for CountAccumulator {
    fn accumulate(&mut self, _item: &T) {
        self.seen += 1;
    }
}

/// Running max or min; ties break the same way the default runtime does.
pub struct ExtremumAccumulator<T> {
    extreme: Extreme,
    cmp: Comparator<T>,
    best: Option<T>,
}

impl<T> ExtremumAccumulator<T> {
    pub fn new(extreme: Extreme, cmp: Comparator<T>) -> Self {
        Self {
            extreme,
            cmp,
            best: None,
        }
    }

    pub fn take(&mut self) -> Result<T> {
        self.best.take().ok_or(Error::EmptySequence)
    }
}

impl<T: Clone> Accumulator<T> for ExtremumAccumulator<T> {
    fn accumulate(&mut self, item: &T) {
        let replace = match &self.best {
            Some(current) => self.extreme.replaces((self.cmp)(item, current)),
            None => true,
        };
        if replace {
            self.best = Some(item.clone());
        }
    }
}

pub struct SumAccumulator<T> {
    projection: Projection<T>,
    // `None` once the total overflowed.
    total: Option<i64>,
}

impl<T> SumAccumulator<T> {
    pub fn new(projection: Projection<T>) -> Self {
        Self {
            projection,
            total: Some(0),
        }
    }

    pub fn total(&mut self) -> Result<i64> {
        self.total.ok_or(Error::Overflow)
    }
}

impl<T> Accumulator<T> for SumAccumulator<T> {
    fn accumulate(&mut self, item: &T) {
        if let Some(total) = self.total {
            self.total = total.checked_add((self.projection)(item));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_overflow_is_reported_on_read() {
        let mut acc = SumAccumulator::new(Box::new(|v: &i64| *v));
        acc.accumulate(&i64::MAX);
        acc.accumulate(&1);
        acc.accumulate(&-5);
        assert_eq!(acc.total(), Err(Error::Overflow));
    }

    #[test]
    fn extremum_keeps_last_max_and_first_min() {
        let by_len =
            || -> Comparator<&str> { Box::new(|a: &&str, b: &&str| a.len().cmp(&b.len())) };
        let mut max = ExtremumAccumulator::new(Extreme::Max, by_len());
        let mut min = ExtremumAccumulator::new(Extreme::Min, by_len());
        for word in ["ab", "c", "de", "f"] {
            max.accumulate(&word);
            min.accumulate(&word);
        }
        assert_eq!(max.take().unwrap(), "de");
        assert_eq!(min.take().unwrap(), "c");
        assert_eq!(max.take(), Err(Error::EmptySequence));
    }
}
