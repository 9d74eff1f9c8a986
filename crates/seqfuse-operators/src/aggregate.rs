//! Terminal operation families: count, max/min, sum, to_vec.
//!
//! Results are plain values, so a decorator that forwards one of these has
//! nothing to re-apply.

use std::rc::Rc;

use crate::decorator::Decoration;
use crate::dispatch::Operation;
use crate::runtime::{self, Extreme};
use crate::seq::Seq;
use crate::traits::{Attempt, Comparator, Projection, Result};

pub struct Count;

impl<T: 'static> Operation<T> for Count {
    type Output = Result<usize>;

    const NAME: &'static str = "count";

    fn offer(self, seq: Seq<T>) -> Attempt<T, Self, Result<usize>> {
        seq.into_box().try_count().map_declined(|()| Count)
    }

    fn redecorate(output: Result<usize>, _: &Rc<dyn Decoration>) -> Result<usize> {
        output
    }

    fn fallback(self, seq: Seq<T>) -> Result<usize> {
        runtime::count(seq.into_elements())
    }
}

pub struct Extremum<T> {
    extreme: Extreme,
    cmp: Comparator<T>,
}

impl<T> Extremum<T> {
    pub fn max(cmp: Comparator<T>) -> Self {
        Self {
            extreme: Extreme::Max,
            cmp,
        }
    }

    pub fn min(cmp: Comparator<T>) -> Self {
        Self {
            extreme: Extreme::Min,
            cmp,
        }
    }
}

impl<T: 'static> Operation<T> for Extremum<T> {
    type Output = Result<T>;

    // Max and min share one family value; the hook picked below follows
    // `extreme`.
    const NAME: &'static str = "extremum";

    fn offer(self, seq: Seq<T>) -> Attempt<T, Self, Result<T>> {
        let Extremum { extreme, cmp } = self;
        let attempt = match extreme {
            Extreme::Max => seq.into_box().try_max(cmp),
            Extreme::Min => seq.into_box().try_min(cmp),
        };
        attempt.map_declined(|cmp| Extremum { extreme, cmp })
    }

    fn redecorate(output: Result<T>, _: &Rc<dyn Decoration>) -> Result<T> {
        output
    }

    fn fallback(self, seq: Seq<T>) -> Result<T> {
        runtime::extremum(seq.into_elements(), self.extreme, self.cmp)
    }
}

pub struct Sum<T> {
    projection: Projection<T>,
}

impl<T> Sum<T> {
    pub fn new(projection: Projection<T>) -> Self {
        Self { projection }
    }
}

impl<T: 'static> Operation<T> for Sum<T> {
    type Output = Result<i64>;

    const NAME: &'static str = "sum";

    fn offer(self, seq: Seq<T>) -> Attempt<T, Self, Result<i64>> {
        seq.into_box().try_sum(self.projection).map_declined(Sum::new)
    }

    fn redecorate(output: Result<i64>, _: &Rc<dyn Decoration>) -> Result<i64> {
        output
    }

    fn fallback(self, seq: Seq<T>) -> Result<i64> {
        runtime::sum(seq.into_elements(), self.projection)
    }
}

pub struct ToVec;

impl<T: 'static> Operation<T> for ToVec {
    type Output = Result<Vec<T>>;

    const NAME: &'static str = "to_vec";

    fn offer(self, seq: Seq<T>) -> Attempt<T, Self, Result<Vec<T>>> {
        seq.into_box().try_to_vec().map_declined(|()| ToVec)
    }

    fn redecorate(output: Result<Vec<T>>, _: &Rc<dyn Decoration>) -> Result<Vec<T>> {
        output
    }

    fn fallback(self, seq: Seq<T>) -> Result<Vec<T>> {
        runtime::to_vec(seq.into_elements())
    }
}
