//! Filter operation family.

use std::rc::Rc;

use crate::decorator::{Decorated, Decoration};
use crate::dispatch::Operation;
use crate::runtime;
use crate::seq::Seq;
use crate::traits::{Attempt, Predicate};

pub struct Filter<T> {
    predicate: Predicate<T>,
}

impl<T> Filter<T> {
    pub fn new(predicate: Predicate<T>) -> Self {
        Self { predicate }
    }
}

impl<T: 'static> Operation<T> for Filter<T> {
    type Output = Seq<T>;

    const NAME: &'static str = "filter";

    fn offer(self, seq: Seq<T>) -> Attempt<T, Self, Seq<T>> {
        seq.into_box()
            .try_filter(self.predicate)
            .map_declined(Filter::new)
    }

    fn redecorate(output: Seq<T>, decoration: &Rc<dyn Decoration>) -> Seq<T> {
        Decorated::wrap(output, Rc::clone(decoration))
    }

    fn fallback(self, seq: Seq<T>) -> Seq<T> {
        runtime::filter(seq.into_elements(), self.predicate)
    }
}
