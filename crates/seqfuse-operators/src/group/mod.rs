//! Group-by: the operation family, the fusion engine and its groupings.
//!
//! Unlike the other families the group-by hook cannot run the operation
//! itself (the result type is chosen by the caller), so `try_group_by`
//! returns a `GroupOffer` and `GroupBy::offer` acts on it:
//! - `Fuse(source, context)`: evaluate with the single-pass engine.
//! - `Declined(seq)`: keep dispatching (decorators, then materialized
//!   grouping in the default runtime).

mod accumulator;
mod engine;
mod equivalence;
mod fusion;
mod grouping;
mod materialized;
mod table;

use std::marker::PhantomData;
use std::rc::Rc;

pub use accumulator::{Accumulator, CountAccumulator, ExtremumAccumulator, SumAccumulator};
pub use equivalence::{DefaultEquivalence, Equivalence};
pub use fusion::{Fusion, FusionContext};
pub use grouping::Grouping;

use crate::decorator::{Decorated, Decoration};
use crate::dispatch::Operation;
use crate::seq::Seq;
use crate::traits::{Attempt, Result};

/// Answer of a sequence's group-by hook.
pub enum GroupOffer<T: 'static> {
    /// Fuse over `source` (the decoration's inner sequence).
    Fuse(Seq<T>, FusionContext),
    Declined(Seq<T>),
}

pub struct GroupBy<T, K, R, KF, RF, E> {
    key_of: KF,
    result_of: RF,
    equivalence: E,
    _types: PhantomData<fn(T) -> (K, R)>,
}

impl<T: 'static, K, R, KF, RF, E> GroupBy<T, K, R, KF, RF, E>
where
    KF: Fn(&T) -> K,
    RF: Fn(Grouping<K, T>) -> Result<R>,
    E: Equivalence<K>,
{
    pub fn new(key_of: KF, result_of: RF, equivalence: E) -> Self {
        Self {
            key_of,
            result_of,
            equivalence,
            _types: PhantomData,
        }
    }
}

impl<T, K, R, KF, RF, E> Operation<T> for GroupBy<T, K, R, KF, RF, E>
where
    T: Clone + 'static,
    K: Clone + 'static,
    R: 'static,
    KF: Fn(&T) -> K + 'static,
    RF: Fn(Grouping<K, T>) -> Result<R> + 'static,
    E: Equivalence<K> + 'static,
{
    type Output = Seq<R>;

    const NAME: &'static str = "group_by";

    fn offer(self, seq: Seq<T>) -> Attempt<T, Self, Seq<R>> {
        match seq.try_group_by() {
            GroupOffer::Fuse(source, context) => Attempt::Done(engine::group_by(
                source,
                self.key_of,
                self.result_of,
                self.equivalence,
                context,
            )),
            GroupOffer::Declined(seq) => Attempt::Declined(seq, self),
        }
    }

    fn redecorate(output: Seq<R>, decoration: &Rc<dyn Decoration>) -> Seq<R> {
        Decorated::wrap(output, Rc::clone(decoration))
    }

    fn fallback(self, seq: Seq<T>) -> Seq<R> {
        materialized::group_by(seq, self.key_of, self.result_of, self.equivalence)
    }
}
