//! Sequence trait + capability hooks.
//!
//! A `Sequence` only has to support the generic iteration protocol
//! (`into_elements`). Every other method is a capability hook for one
//! operation family: the default body declines and hands the sequence (and
//! the operation's arguments) back, so `dispatch::perform` can try the next
//! strategy. Implementations override exactly the hooks they can do better.
//!
//! Hooks take `self: Box<Self>` so the trait stays object-safe; `Seq<T>` is
//! the owning handle callers work with.

use std::cmp::Ordering;

pub use seqfuse_core::error::{Error, Result};

use crate::decorator::Decorator;
use crate::group::GroupOffer;
use crate::seq::Seq;

/// Items pulled through the generic iteration protocol.
///
/// Producing the iterator must not pull anything; work starts on the first
/// `next()`.
pub type Elements<T> = Box<dyn Iterator<Item = Result<T>>>;

pub type Predicate<T> = Box<dyn FnMut(&T) -> bool>;
pub type Comparator<T> = Box<dyn Fn(&T, &T) -> Ordering>;
pub type Projection<T> = Box<dyn Fn(&T) -> i64>;

/// Outcome of offering an operation to a capability hook.
pub enum Attempt<T: 'static, A, O> {
    /// The sequence ran its specialised implementation.
    Done(O),
    /// No capability; the sequence and the arguments come back untouched.
    Declined(Seq<T>, A),
}

impl<T: 'static, A, O> Attempt<T, A, O> {
    /// Rebuild the declined arguments (e.g. into the operation value).
    pub fn map_declined<B>(self, f: impl FnOnce(A) -> B) -> Attempt<T, B, O> {
        match self {
            Attempt::Done(out) => Attempt::Done(out),
            Attempt::Declined(seq, args) => Attempt::Declined(seq, f(args)),
        }
    }
}

/// Boxes a concrete sequence into a `Seq`. Blanket-implemented; do not
/// implement by hand.
pub trait IntoSeq<T: 'static> {
    fn into_seq(self: Box<Self>) -> Seq<T>;
}

impl<T: 'static, S: Sequence<T> + 'static> IntoSeq<T> for S {
    fn into_seq(self: Box<Self>) -> Seq<T> {
        Seq::from_box(self)
    }
}

/// A lazy, forward-only sequence of `T`.
///
/// Invariants:
/// - At most one logical pass: every hook consumes the sequence.
/// - A hook that returns `Done` owns the whole operation; its result is
///   returned to the caller verbatim.
pub trait Sequence<T: 'static>: IntoSeq<T> {
    /// Generic iteration protocol; the default runtime drains this.
    fn into_elements(self: Box<Self>) -> Elements<T>;

    /// Delegating decorators expose their inner source and decoration.
    fn into_decorator(self: Box<Self>) -> std::result::Result<Decorator<T>, Seq<T>> {
        Err(self.into_seq())
    }

    fn try_filter(self: Box<Self>, predicate: Predicate<T>) -> Attempt<T, Predicate<T>, Seq<T>> {
        Attempt::Declined(self.into_seq(), predicate)
    }

    fn try_concat(self: Box<Self>, tail: Seq<T>) -> Attempt<T, Seq<T>, Seq<T>> {
        Attempt::Declined(self.into_seq(), tail)
    }

    fn try_count(self: Box<Self>) -> Attempt<T, (), Result<usize>> {
        Attempt::Declined(self.into_seq(), ())
    }

    fn try_max(self: Box<Self>, cmp: Comparator<T>) -> Attempt<T, Comparator<T>, Result<T>> {
        Attempt::Declined(self.into_seq(), cmp)
    }

    fn try_min(self: Box<Self>, cmp: Comparator<T>) -> Attempt<T, Comparator<T>, Result<T>> {
        Attempt::Declined(self.into_seq(), cmp)
    }

    fn try_sum(
        self: Box<Self>,
        projection: Projection<T>,
    ) -> Attempt<T, Projection<T>, Result<i64>> {
        Attempt::Declined(self.into_seq(), projection)
    }

    fn try_to_vec(self: Box<Self>) -> Attempt<T, (), Result<Vec<T>>> {
        Attempt::Declined(self.into_seq(), ())
    }

    /// Group-by changes the item type, so the hook cannot run the operation
    /// itself; it declares how the caller should evaluate it instead.
    fn try_group_by(self: Box<Self>) -> GroupOffer<T> {
        GroupOffer::Declined(self.into_seq())
    }
}
