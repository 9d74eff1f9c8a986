//! Delegating decorators.
//!
//! A decoration is a policy that does not depend on the item type, so one
//! `Decorated<T>` wrapper can re-apply it around any sequence an operation
//! returns (`Decorated::wrap` is the re-wrap factory used by dispatch). That
//! is what lets a specialisation stick across `filter`, `map`, ... without the
//! decoration implementing those operations itself.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::group::{FusionContext, GroupOffer};
use crate::seq::Seq;
use crate::traits::{Elements, IntoSeq, Sequence};

pub trait Decoration: fmt::Debug + 'static {
    fn name(&self) -> &'static str;

    /// `Some` when group-by reaching this decoration should be fused.
    fn group_by_fusion(&self) -> Option<FusionContext> {
        None
    }

    /// Observe an operation being forwarded to the inner source.
    fn forwarded(&self, _operation: &'static str) {}
}

/// Inner source plus decoration, as exposed to dispatch step 2.
pub struct Decorator<T: 'static> {
    pub inner: Seq<T>,
    pub decoration: Rc<dyn Decoration>,
}

pub struct Decorated<T: 'static> {
    inner: Seq<T>,
    decoration: Rc<dyn Decoration>,
}

impl<T: 'static> Decorated<T> {
    /// Rebuild the decoration around a new inner sequence.
    pub fn wrap(inner: Seq<T>, decoration: Rc<dyn Decoration>) -> Seq<T> {
        Seq::new(Decorated { inner, decoration })
    }
}

impl<T: 'static> Sequence<T> for Decorated<T> {
    fn into_elements(self: Box<Self>) -> Elements<T> {
        self.inner.into_elements()
    }

    fn into_decorator(self: Box<Self>) -> Result<Decorator<T>, Seq<T>> {
        let Decorated { inner, decoration } = *self;
        Ok(Decorator { inner, decoration })
    }

    fn try_group_by(self: Box<Self>) -> GroupOffer<T> {
        match self.decoration.group_by_fusion() {
            Some(context) => GroupOffer::Fuse(self.inner, context),
            None => GroupOffer::Declined(self.into_seq()),
        }
    }
}

/// Specialises nothing; records every operation forwarded through it.
#[derive(Debug, Clone)]
pub struct Traced {
    label: String,
    ops: Rc<RefCell<Vec<&'static str>>>,
}

impl Traced {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ops: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Operation families forwarded so far, oldest first.
    pub fn forwarded_ops(&self) -> Vec<&'static str> {
        self.ops.borrow().clone()
    }
}

impl Decoration for Traced {
    fn name(&self) -> &'static str {
        "traced"
    }

    fn forwarded(&self, operation: &'static str) {
        #[cfg(feature = "tracing")]
        tracing::debug!(label = %self.label, operation, "forwarded through traced sequence");
        self.ops.borrow_mut().push(operation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_decoration_declines_group_by() {
        let seq = Seq::from_vec(vec!["a", "b", "a"]).decorate(Traced::new("t"));
        let counts = seq
            .group_by(|s| *s, |g| g.count())
            .to_vec()
            .unwrap();
        assert_eq!(counts, vec![2, 1]);
    }

    #[test]
    fn nested_decorations_forward_in_order() {
        let outer = Traced::new("outer");
        let inner = Traced::new("inner");
        let seq = Seq::from_vec(vec![3_i64, 1, 2])
            .decorate(inner.clone())
            .decorate(outer.clone());

        assert_eq!(seq.max().unwrap(), 3);
        assert_eq!(outer.forwarded_ops(), vec!["extremum"]);
        assert_eq!(inner.forwarded_ops(), vec!["extremum"]);
        assert_eq!(outer.label(), "outer");
    }
}
