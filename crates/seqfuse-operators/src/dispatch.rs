//! Capability dispatch protocol.
//!
//! `perform(op, seq)` resolves an operation in three steps:
//! 1. the sequence's own capability hook for the operation's family;
//! 2. if the sequence is a delegating decorator, `perform` on the inner
//!    source and re-apply the decoration to the result;
//! 3. the default runtime's reference algorithm over `into_elements`.
//!
//! The protocol itself never fails; errors come from whichever
//! implementation ran.

use std::rc::Rc;

use crate::decorator::{Decoration, Decorator};
use crate::seq::Seq;
use crate::traits::Attempt;

/// One operation family, carried as a value through the dispatch steps.
pub trait Operation<T: 'static>: Sized {
    type Output;

    /// Stable family name (used for traces and decorator bookkeeping).
    const NAME: &'static str;

    /// Step 1: hand the operation to `seq`'s capability hook, if it has one.
    fn offer(self, seq: Seq<T>) -> Attempt<T, Self, Self::Output>;

    /// Step 2: re-apply `decoration` to a result computed on the inner source.
    fn redecorate(output: Self::Output, decoration: &Rc<dyn Decoration>) -> Self::Output;

    /// Step 3: reference algorithm.
    fn fallback(self, seq: Seq<T>) -> Self::Output;
}

pub fn perform<T: 'static, O: Operation<T>>(op: O, seq: Seq<T>) -> O::Output {
    match op.offer(seq) {
        Attempt::Done(output) => {
            #[cfg(feature = "tracing")]
            tracing::trace!(op = O::NAME, "specialised");
            output
        }
        Attempt::Declined(seq, op) => match seq.into_decorator() {
            Ok(Decorator { inner, decoration }) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(op = O::NAME, decoration = decoration.name(), "forwarded");
                decoration.forwarded(O::NAME);
                let output = perform(op, inner);
                O::redecorate(output, &decoration)
            }
            Err(seq) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(op = O::NAME, "default runtime");
                op.fallback(seq)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorator::Traced;
    use crate::source::Materialized;
    use crate::traits::{Elements, Sequence};
    use std::cell::Cell;

    /// Counts how often the generic iteration protocol is used.
    struct Probe {
        items: Vec<i64>,
        drained: Rc<Cell<usize>>,
    }

    impl Sequence<i64> for Probe {
        fn into_elements(self: Box<Self>) -> Elements<i64> {
            self.drained.set(self.drained.get() + 1);
            Box::new(self.items.into_iter().map(Ok))
        }

        fn try_count(self: Box<Self>) -> Attempt<i64, (), crate::Result<usize>> {
            Attempt::Done(Ok(1000))
        }
    }

    #[test]
    fn specialised_hook_wins_and_is_returned_verbatim() {
        let drained = Rc::new(Cell::new(0));
        let seq = Seq::new(Probe {
            items: vec![1, 2, 3],
            drained: drained.clone(),
        });
        assert_eq!(seq.count().unwrap(), 1000);
        assert_eq!(drained.get(), 0);
    }

    #[test]
    fn missing_hook_falls_back_to_the_default_runtime() {
        let drained = Rc::new(Cell::new(0));
        let seq = Seq::new(Probe {
            items: vec![1, 2, 3],
            drained: drained.clone(),
        });
        assert_eq!(seq.sum_by(|v| *v).unwrap(), 6);
        assert_eq!(drained.get(), 1);
    }

    #[test]
    fn decorator_forwards_to_the_inner_capability() {
        let drained = Rc::new(Cell::new(0));
        let traced = Traced::new("probe");
        let seq = Seq::new(Probe {
            items: vec![1, 2, 3],
            drained: drained.clone(),
        })
        .decorate(traced.clone());

        assert_eq!(seq.count().unwrap(), 1000);
        assert_eq!(traced.forwarded_ops(), vec!["count"]);
        assert_eq!(drained.get(), 0);
    }

    #[test]
    fn decoration_sticks_across_forwarded_operations() {
        let traced = Traced::new("chain");
        let seq = Seq::new(Materialized::new(vec![1_i64, 2, 3, 4]))
            .decorate(traced.clone())
            .filter(|v| v % 2 == 0)
            .map(|v| v * 10);

        assert_eq!(seq.to_vec().unwrap(), vec![20, 40]);
        assert_eq!(traced.forwarded_ops(), vec!["filter", "map", "to_vec"]);
    }
}
