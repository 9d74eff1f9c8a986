//! Concrete leaf sequences.

use crate::traits::{Attempt, Elements, Result, Sequence};

/// Wraps an arbitrary iterator. Specialises nothing.
pub struct Lazy<T> {
    elements: Elements<T>,
}

impl<T> Lazy<T> {
    pub fn new(elements: Elements<T>) -> Self {
        Self { elements }
    }
}

impl<T: 'static> Sequence<T> for Lazy<T> {
    fn into_elements(self: Box<Self>) -> Elements<T> {
        self.elements
    }
}

/// Items already in memory.
pub struct Materialized<T> {
    items: Vec<T>,
}

impl<T> Materialized<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T: 'static> Sequence<T> for Materialized<T> {
    fn into_elements(self: Box<Self>) -> Elements<T> {
        Box::new(self.items.into_iter().map(Ok))
    }

    fn try_count(self: Box<Self>) -> Attempt<T, (), Result<usize>> {
        Attempt::Done(Ok(self.items.len()))
    }

    fn try_to_vec(self: Box<Self>) -> Attempt<T, (), Result<Vec<T>>> {
        Attempt::Done(Ok(self.items))
    }
}
