//! Projection and slicing families: map, take, skip.
//!
//! None of these has a capability hook; they still go through dispatch so
//! decorations are forwarded and re-applied around their results.

use std::marker::PhantomData;
use std::rc::Rc;

use crate::decorator::{Decorated, Decoration};
use crate::dispatch::Operation;
use crate::runtime;
use crate::seq::Seq;
use crate::traits::Attempt;

pub struct Map<T, U, F> {
    f: F,
    _types: PhantomData<fn(T) -> U>,
}

impl<T, U, F> Map<T, U, F>
where
    F: FnMut(T) -> U,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _types: PhantomData,
        }
    }
}

impl<T, U, F> Operation<T> for Map<T, U, F>
where
    T: 'static,
    U: 'static,
    F: FnMut(T) -> U + 'static,
{
    type Output = Seq<U>;

    const NAME: &'static str = "map";

    fn offer(self, seq: Seq<T>) -> Attempt<T, Self, Seq<U>> {
        Attempt::Declined(seq, self)
    }

    fn redecorate(output: Seq<U>, decoration: &Rc<dyn Decoration>) -> Seq<U> {
        Decorated::wrap(output, Rc::clone(decoration))
    }

    fn fallback(self, seq: Seq<T>) -> Seq<U> {
        runtime::map(seq.into_elements(), self.f)
    }
}

pub struct Take {
    n: usize,
}

impl Take {
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

impl<T: 'static> Operation<T> for Take {
    type Output = Seq<T>;

    const NAME: &'static str = "take";

    fn offer(self, seq: Seq<T>) -> Attempt<T, Self, Seq<T>> {
        Attempt::Declined(seq, self)
    }

    fn redecorate(output: Seq<T>, decoration: &Rc<dyn Decoration>) -> Seq<T> {
        Decorated::wrap(output, Rc::clone(decoration))
    }

    fn fallback(self, seq: Seq<T>) -> Seq<T> {
        runtime::take(seq.into_elements(), self.n)
    }
}

pub struct Skip {
    n: usize,
}

impl Skip {
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

impl<T: 'static> Operation<T> for Skip {
    type Output = Seq<T>;

    const NAME: &'static str = "skip";

    fn offer(self, seq: Seq<T>) -> Attempt<T, Self, Seq<T>> {
        Attempt::Declined(seq, self)
    }

    fn redecorate(output: Seq<T>, decoration: &Rc<dyn Decoration>) -> Seq<T> {
        Decorated::wrap(output, Rc::clone(decoration))
    }

    fn fallback(self, seq: Seq<T>) -> Seq<T> {
        runtime::skip(seq.into_elements(), self.n)
    }
}

#[cfg(test)]
mod tests {
    use crate::seq::Seq;

    #[test]
    fn map_take_skip_compose_lazily() {
        let seq = Seq::from_iter_lazy(1..)
            .map(|v: i64| v * v)
            .skip(2)
            .take(3);
        assert_eq!(seq.to_vec().unwrap(), vec![9, 16, 25]);
    }

    #[test]
    fn map_changes_the_item_type() {
        let seq = Seq::from_vec(vec!["ab", "c"]).map(|s| s.to_uppercase());
        assert_eq!(seq.to_vec().unwrap(), vec!["AB".to_string(), "C".to_string()]);
    }
}
