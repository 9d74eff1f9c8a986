//! Default sequence runtime: reference algorithms over the generic
//! iteration protocol.
//!
//! Dispatch only lands here when neither the sequence nor any decorator
//! around it specialises the operation. Errors already present in the
//! element stream are passed through untouched (lazy operators) or returned
//! (terminal operators).

use std::cmp::Ordering;

use crate::seq::Seq;
use crate::traits::{Comparator, Elements, Error, Predicate, Projection, Result};

/// Lazily run `produce` on the first pull and yield what it returns.
///
/// On failure only the error is yielded; nothing produced before it leaks.
pub(crate) fn deferred<R, F>(produce: F) -> Elements<R>
where
    R: 'static,
    F: FnOnce() -> Result<Vec<R>> + 'static,
{
    Box::new(std::iter::once_with(produce).flat_map(|produced| {
        let (items, failure) = match produced {
            Ok(items) => (items, None),
            Err(e) => (Vec::new(), Some(e)),
        };
        items.into_iter().map(Ok).chain(failure.map(Err))
    }))
}

pub fn filter<T: 'static>(elements: Elements<T>, mut predicate: Predicate<T>) -> Seq<T> {
    Seq::from_elements(Box::new(elements.filter(move |item| match item {
        Ok(v) => predicate(v),
        Err(_) => true,
    })))
}

pub fn map<T, U, F>(elements: Elements<T>, mut f: F) -> Seq<U>
where
    T: 'static,
    U: 'static,
    F: FnMut(T) -> U + 'static,
{
    Seq::from_elements(Box::new(elements.map(move |item| item.map(&mut f))))
}

pub fn take<T: 'static>(elements: Elements<T>, n: usize) -> Seq<T> {
    Seq::from_elements(Box::new(elements.take(n)))
}

pub fn skip<T: 'static>(elements: Elements<T>, n: usize) -> Seq<T> {
    Seq::from_elements(Box::new(elements.skip(n)))
}

pub fn count<T: 'static>(elements: Elements<T>) -> Result<usize> {
    let mut n = 0usize;
    for item in elements {
        item?;
        n += 1;
    }
    Ok(n)
}

/// Which end of the ordering an extremum keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    /// Last of equals wins (matches `Iterator::max_by`).
    Max,
    /// First of equals wins (matches `Iterator::min_by`).
    Min,
}

impl Extreme {
    /// Should `candidate` replace the current best?
    pub fn replaces(self, ordering: Ordering) -> bool {
        match self {
            Extreme::Max => ordering != Ordering::Less,
            Extreme::Min => ordering == Ordering::Less,
        }
    }
}

pub fn extremum<T: 'static>(
    elements: Elements<T>,
    extreme: Extreme,
    cmp: Comparator<T>,
) -> Result<T> {
    let mut best: Option<T> = None;
    for item in elements {
        let item = item?;
        best = match best {
            Some(current) if !extreme.replaces(cmp(&item, &current)) => Some(current),
            _ => Some(item),
        };
    }
    best.ok_or(Error::EmptySequence)
}

pub fn sum<T: 'static>(elements: Elements<T>, projection: Projection<T>) -> Result<i64> {
    let mut total = 0i64;
    for item in elements {
        let item = item?;
        total = total
            .checked_add(projection(&item))
            .ok_or(Error::Overflow)?;
    }
    Ok(total)
}

pub fn to_vec<T: 'static>(elements: Elements<T>) -> Result<Vec<T>> {
    elements.collect()
}
