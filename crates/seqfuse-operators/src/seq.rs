//! `Seq<T>`: the owning handle for a boxed `Sequence`.
//!
//! Every operation method builds the operation value and hands it to
//! `dispatch::perform`; nothing here knows which implementation will run.

use std::cmp::Ordering;
use std::hash::Hash;
use std::rc::Rc;

use crate::aggregate::{Count, Extremum, Sum, ToVec};
use crate::concat::Concat;
use crate::decorator::{Decorated, Decoration, Decorator};
use crate::dispatch::perform;
use crate::filter::Filter;
use crate::group::{DefaultEquivalence, Equivalence, Fusion, GroupBy, GroupOffer, Grouping};
use crate::map::{Map, Skip, Take};
use crate::source::{Lazy, Materialized};
use crate::traits::{Elements, Result, Sequence};

pub struct Seq<T: 'static> {
    inner: Box<dyn Sequence<T>>,
}

impl<T: 'static> Seq<T> {
    pub fn new<S: Sequence<T> + 'static>(sequence: S) -> Self {
        Self {
            inner: Box::new(sequence),
        }
    }

    pub fn from_box(inner: Box<dyn Sequence<T>>) -> Self {
        Self { inner }
    }

    /// Buffered sequence; knows its length.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::new(Materialized::new(items))
    }

    /// Lazy sequence over any iterator.
    pub fn from_iter_lazy<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::from_elements(Box::new(iter.into_iter().map(Ok)))
    }

    /// Lazy sequence over fallible items.
    pub fn from_elements(elements: Elements<T>) -> Self {
        Self::new(Lazy::new(elements))
    }

    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Generic iteration protocol.
    pub fn into_elements(self) -> Elements<T> {
        self.inner.into_elements()
    }

    pub(crate) fn into_decorator(self) -> std::result::Result<Decorator<T>, Seq<T>> {
        self.inner.into_decorator()
    }

    pub(crate) fn into_box(self) -> Box<dyn Sequence<T>> {
        self.inner
    }

    pub(crate) fn try_group_by(self) -> GroupOffer<T> {
        self.inner.try_group_by()
    }

    /// Wrap this sequence in `decoration`; it is re-applied to every
    /// sequence-valued result forwarded through it.
    pub fn decorate<D: Decoration>(self, decoration: D) -> Seq<T> {
        Decorated::wrap(self, Rc::new(decoration))
    }

    /// Decorate with a default `Fusion`: group-by runs in a single pass.
    pub fn fused(self) -> Seq<T> {
        self.decorate(Fusion::default())
    }

    pub fn filter<P>(self, predicate: P) -> Seq<T>
    where
        P: FnMut(&T) -> bool + 'static,
    {
        perform(Filter::new(Box::new(predicate)), self)
    }

    pub fn map<U, F>(self, f: F) -> Seq<U>
    where
        U: 'static,
        F: FnMut(T) -> U + 'static,
    {
        perform(Map::new(f), self)
    }

    pub fn take(self, n: usize) -> Seq<T> {
        perform(Take::new(n), self)
    }

    pub fn skip(self, n: usize) -> Seq<T> {
        perform(Skip::new(n), self)
    }

    pub fn concat(self, tail: Seq<T>) -> Seq<T> {
        perform(Concat::new(tail), self)
    }

    pub fn count(self) -> Result<usize> {
        perform(Count, self)
    }

    /// Greatest element; the last one wins among equals.
    pub fn max(self) -> Result<T>
    where
        T: Ord,
    {
        perform(Extremum::max(Box::new(|a: &T, b: &T| a.cmp(b))), self)
    }

    /// Least element; the first one wins among equals.
    pub fn min(self) -> Result<T>
    where
        T: Ord,
    {
        perform(Extremum::min(Box::new(|a: &T, b: &T| a.cmp(b))), self)
    }

    pub fn max_by_key<K, F>(self, f: F) -> Result<T>
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + 'static,
    {
        perform(Extremum::max(by_key(f)), self)
    }

    pub fn min_by_key<K, F>(self, f: F) -> Result<T>
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + 'static,
    {
        perform(Extremum::min(by_key(f)), self)
    }

    /// Sum of `projection` over the elements; 0 for an empty sequence.
    pub fn sum_by<F>(self, projection: F) -> Result<i64>
    where
        F: Fn(&T) -> i64 + 'static,
    {
        perform(Sum::new(Box::new(projection)), self)
    }

    pub fn to_vec(self) -> Result<Vec<T>> {
        perform(ToVec, self)
    }

    /// Group by `key_of`, producing `result_of(grouping)` per distinct key in
    /// discovery order.
    pub fn group_by<K, R, KF, RF>(self, key_of: KF, result_of: RF) -> Seq<R>
    where
        T: Clone,
        K: Hash + Eq + Clone + 'static,
        R: 'static,
        KF: Fn(&T) -> K + 'static,
        RF: Fn(Grouping<K, T>) -> Result<R> + 'static,
    {
        self.group_by_with(key_of, result_of, DefaultEquivalence)
    }

    /// [`Seq::group_by`] with a caller-supplied key equivalence.
    pub fn group_by_with<K, R, KF, RF, E>(self, key_of: KF, result_of: RF, equivalence: E) -> Seq<R>
    where
        T: Clone,
        K: Clone + 'static,
        R: 'static,
        KF: Fn(&T) -> K + 'static,
        RF: Fn(Grouping<K, T>) -> Result<R> + 'static,
        E: Equivalence<K> + 'static,
    {
        perform(GroupBy::new(key_of, result_of, equivalence), self)
    }
}

fn by_key<T, K, F>(f: F) -> Box<dyn Fn(&T, &T) -> Ordering>
where
    T: 'static,
    K: Ord + 'static,
    F: Fn(&T) -> K + 'static,
{
    Box::new(move |a: &T, b: &T| f(a).cmp(&f(b)))
}

impl<T: 'static> IntoIterator for Seq<T> {
    type Item = Result<T>;
    type IntoIter = Elements<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_elements()
    }
}

impl<T: 'static> FromIterator<T> for Seq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Seq::from_vec(iter.into_iter().collect())
    }
}

impl<T: 'static> From<Vec<T>> for Seq<T> {
    fn from(items: Vec<T>) -> Self {
        Seq::from_vec(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lazy_sources_do_not_pull_until_iterated() {
        use std::cell::Cell;
        let pulled = Rc::new(Cell::new(0));
        let p = pulled.clone();
        let seq = Seq::from_iter_lazy((0..5).inspect(move |_| p.set(p.get() + 1)))
            .filter(|v| v % 2 == 0)
            .map(|v| v + 1);
        assert_eq!(pulled.get(), 0);
        assert_eq!(seq.to_vec().unwrap(), vec![1, 3, 5]);
        assert_eq!(pulled.get(), 5);
    }

    #[test]
    fn by_key_extrema_follow_std_tie_breaking() {
        let words = || Seq::from_vec(vec!["bb", "a", "cc", "d"]);
        assert_eq!(words().max_by_key(|w| w.len()).unwrap(), "cc");
        assert_eq!(words().min_by_key(|w| w.len()).unwrap(), "a");
    }

    #[test]
    fn empty_extremum_is_an_error() {
        assert_eq!(
            Seq::<i64>::empty().max().unwrap_err(),
            crate::Error::EmptySequence
        );
        assert_eq!(Seq::<i64>::empty().sum_by(|v| *v).unwrap(), 0);
    }

    #[test]
    fn into_iter_yields_results() {
        let collected: Result<Vec<i64>> = Seq::from_vec(vec![1, 2]).into_iter().collect();
        assert_eq!(collected.unwrap(), vec![1, 2]);
    }
}
