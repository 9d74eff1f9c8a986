//! `Grouping`: the per-key handle handed to a group-by result selector.
//!
//! Aggregating a fused grouping (`count`, `max`, `sum_by`, ...) attaches a
//! streaming accumulator and drives the shared cursor to exhaustion; nothing
//! is buffered. Reading it as a plain sequence (`to_vec`, iteration, or any
//! operation without a capability here) buffers it instead.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use seqfuse_core::id::GroupId;

use super::accumulator::{
    Accumulator, CountAccumulator, ExtremumAccumulator, SharedAccumulator, SumAccumulator,
};
use super::engine::Driver;
use crate::runtime::{self, Extreme};
use crate::seq::Seq;
use crate::traits::{Attempt, Comparator, Elements, Error, Projection, Result, Sequence};

enum Backing<T: 'static> {
    Fused(Rc<dyn Driver<T>>),
    Materialized(Rc<Vec<T>>),
}

impl<T: 'static> Clone for Backing<T> {
    fn clone(&self) -> Self {
        match self {
            Backing::Fused(driver) => Backing::Fused(Rc::clone(driver)),
            Backing::Materialized(items) => Backing::Materialized(Rc::clone(items)),
        }
    }
}

/// Clones are handles to the same group.
pub struct Grouping<K, T: 'static> {
    id: GroupId,
    key: K,
    backing: Backing<T>,
}

impl<K: Clone, T: 'static> Clone for Grouping<K, T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            key: self.key.clone(),
            backing: self.backing.clone(),
        }
    }
}

impl<K: fmt::Debug, T: 'static> fmt::Debug for Grouping<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backing = match self.backing {
            Backing::Fused(_) => "fused",
            Backing::Materialized(_) => "materialized",
        };
        f.debug_struct("Grouping")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("backing", &backing)
            .finish()
    }
}

impl<K, T: Clone + 'static> Grouping<K, T> {
    pub(crate) fn fused(id: GroupId, key: K, driver: Rc<dyn Driver<T>>) -> Self {
        Self {
            id,
            key,
            backing: Backing::Fused(driver),
        }
    }

    pub(crate) fn materialized(id: GroupId, key: K, items: Vec<T>) -> Self {
        Self {
            id,
            key,
            backing: Backing::Materialized(Rc::new(items)),
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    /// Discovery index of this group.
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Whether the group's elements are (being) kept in memory.
    pub fn is_buffered(&self) -> Result<bool> {
        match &self.backing {
            Backing::Fused(driver) => driver.is_buffered(self.id),
            Backing::Materialized(_) => Ok(true),
        }
    }

    /// Fold every element of the group into `accumulator`, then read the
    /// result with `finish`.
    ///
    /// On a fused grouping this drives the shared cursor to the end of the
    /// source, so sibling groups are fed along the way.
    pub fn aggregate<A, O, F>(&self, accumulator: A, finish: F) -> Result<O>
    where
        A: Accumulator<T> + 'static,
        F: FnOnce(&mut A) -> O,
    {
        match &self.backing {
            Backing::Fused(driver) => {
                let state = Rc::new(RefCell::new(accumulator));
                let shared: SharedAccumulator<T> = state.clone();
                driver.attach(self.id, shared)?;
                driver.drain()?;
                let mut state = state.try_borrow_mut().map_err(|_| Error::ReentrantAdvance)?;
                Ok(finish(&mut *state))
            }
            Backing::Materialized(items) => {
                let mut state = accumulator;
                for item in items.iter() {
                    state.accumulate(item);
                }
                Ok(finish(&mut state))
            }
        }
    }

    fn extremum(&self, extreme: Extreme, cmp: Comparator<T>) -> Result<T> {
        self.aggregate(
            ExtremumAccumulator::new(extreme, cmp),
            ExtremumAccumulator::take,
        )?
    }

    /// The group's elements in source order.
    pub fn items(&self) -> Result<Vec<T>> {
        match &self.backing {
            Backing::Fused(driver) => driver.materialize(self.id),
            Backing::Materialized(items) => Ok(items.as_ref().clone()),
        }
    }
}

impl<K: Clone + 'static, T: Clone + 'static> Grouping<K, T> {
    /// This group as a sequence; further operations dispatch as usual.
    pub fn into_seq(self) -> Seq<T> {
        Seq::new(self)
    }

    pub fn count(&self) -> Result<usize> {
        self.clone().into_seq().count()
    }

    pub fn max(&self) -> Result<T>
    where
        T: Ord,
    {
        self.clone().into_seq().max()
    }

    pub fn min(&self) -> Result<T>
    where
        T: Ord,
    {
        self.clone().into_seq().min()
    }

    pub fn max_by_key<B, F>(&self, f: F) -> Result<T>
    where
        B: Ord + 'static,
        F: Fn(&T) -> B + 'static,
    {
        self.clone().into_seq().max_by_key(f)
    }

    pub fn min_by_key<B, F>(&self, f: F) -> Result<T>
    where
        B: Ord + 'static,
        F: Fn(&T) -> B + 'static,
    {
        self.clone().into_seq().min_by_key(f)
    }

    pub fn sum_by<F>(&self, projection: F) -> Result<i64>
    where
        F: Fn(&T) -> i64 + 'static,
    {
        self.clone().into_seq().sum_by(projection)
    }

    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.clone().into_seq().to_vec()
    }
}

impl<K: 'static, T: Clone + 'static> Sequence<T> for Grouping<K, T> {
    fn into_elements(self: Box<Self>) -> Elements<T> {
        let Grouping { id, backing, .. } = *self;
        match backing {
            Backing::Fused(driver) => runtime::deferred(move || driver.materialize(id)),
            Backing::Materialized(items) => Box::new(items.as_ref().clone().into_iter().map(Ok)),
        }
    }

    fn try_count(self: Box<Self>) -> Attempt<T, (), Result<usize>> {
        Attempt::Done(self.aggregate(CountAccumulator::default(), CountAccumulator::count))
    }

    fn try_max(self: Box<Self>, cmp: Comparator<T>) -> Attempt<T, Comparator<T>, Result<T>> {
        Attempt::Done(self.extremum(Extreme::Max, cmp))
    }

    fn try_min(self: Box<Self>, cmp: Comparator<T>) -> Attempt<T, Comparator<T>, Result<T>> {
        Attempt::Done(self.extremum(Extreme::Min, cmp))
    }

    fn try_sum(
        self: Box<Self>,
        projection: Projection<T>,
    ) -> Attempt<T, Projection<T>, Result<i64>> {
        Attempt::Done(
            self.aggregate(SumAccumulator::new(projection), SumAccumulator::total)
                .and_then(|total| total),
        )
    }

    fn try_to_vec(self: Box<Self>) -> Attempt<T, (), Result<Vec<T>>> {
        Attempt::Done(self.items())
    }
}
