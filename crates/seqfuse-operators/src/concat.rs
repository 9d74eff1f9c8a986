//! Concatenation.

use std::rc::Rc;

use crate::decorator::{Decorated, Decoration};
use crate::dispatch::Operation;
use crate::seq::Seq;
use crate::traits::{Attempt, Elements, Result, Sequence};

pub struct Concat<T: 'static> {
    tail: Seq<T>,
}

impl<T: 'static> Concat<T> {
    pub fn new(tail: Seq<T>) -> Self {
        Self { tail }
    }
}

impl<T: 'static> Operation<T> for Concat<T> {
    type Output = Seq<T>;

    const NAME: &'static str = "concat";

    fn offer(self, seq: Seq<T>) -> Attempt<T, Self, Seq<T>> {
        seq.into_box().try_concat(self.tail).map_declined(Concat::new)
    }

    fn redecorate(output: Seq<T>, decoration: &Rc<dyn Decoration>) -> Seq<T> {
        Decorated::wrap(output, Rc::clone(decoration))
    }

    fn fallback(self, seq: Seq<T>) -> Seq<T> {
        Seq::new(Chain {
            parts: vec![seq, self.tail],
        })
    }
}

/// Parts read back to back.
///
/// Further concatenations append to `parts` instead of nesting, and `count`
/// is dispatched per part so each part can use its own shortcut.
pub struct Chain<T: 'static> {
    parts: Vec<Seq<T>>,
}

impl<T: 'static> Sequence<T> for Chain<T> {
    fn into_elements(self: Box<Self>) -> Elements<T> {
        Box::new(self.parts.into_iter().flat_map(Seq::into_elements))
    }

    fn try_concat(self: Box<Self>, tail: Seq<T>) -> Attempt<T, Seq<T>, Seq<T>> {
        let mut me = *self;
        me.parts.push(tail);
        Attempt::Done(Seq::new(me))
    }

    fn try_count(self: Box<Self>) -> Attempt<T, (), Result<usize>> {
        let total = self.parts.into_iter().try_fold(0usize, |acc, part| {
            let n = part.count()?;
            acc.checked_add(n).ok_or(crate::Error::Overflow)
        });
        Attempt::Done(total)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::seq::Seq;

    #[test]
    fn concatenation_keeps_order() {
        let seq = Seq::from_vec(vec![1, 2])
            .concat(Seq::from_iter_lazy(3..5))
            .concat(Seq::from_vec(vec![5]));
        assert_eq!(seq.to_vec().unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn count_uses_each_part_shortcut() {
        let pulled = Rc::new(Cell::new(0));
        let p = pulled.clone();
        let lazy = Seq::from_iter_lazy((0..4).inspect(move |_| p.set(p.get() + 1)));
        let seq = Seq::from_vec(vec![0; 1000]).concat(lazy);
        assert_eq!(seq.count().unwrap(), 1004);
        // Only the lazy part had to be walked.
        assert_eq!(pulled.get(), 4);
    }
}
