//! Single-pass group-by evaluation over one shared cursor.
//!
//! An `Evaluation` owns the source cursor, the key index and every group's
//! state. Groupings only hold an `Rc<dyn Driver>` back to it plus their
//! group id, so however many of them are being aggregated there is exactly
//! one cursor, advanced from one place (`advance`).
//!
//! Driving is re-entrant by construction: routing an element may discover a
//! key, which runs the result selector immediately, which may ask for an
//! aggregate, which drains the cursor from inside the outer `advance`. No
//! `RefCell` borrow is held across a call into caller code.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use seqfuse_core::config::LateRegistration;
use seqfuse_core::id::GroupId;

use super::accumulator::SharedAccumulator;
use super::equivalence::Equivalence;
use super::fusion::FusionContext;
use super::grouping::Grouping;
use super::table::KeyIndex;
use crate::metrics;
use crate::runtime;
use crate::seq::Seq;
use crate::traits::{Elements, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Advanced,
    Exhausted,
}

/// What a fused grouping may ask of its evaluation.
pub(crate) trait Driver<T> {
    /// Pull one element from the shared cursor and route it.
    fn advance(&self) -> Result<Step>;

    fn drain(&self) -> Result<()> {
        while self.advance()? == Step::Advanced {}
        Ok(())
    }

    /// Register `accumulator` on `group` and replay what the group already
    /// holds into it.
    fn attach(&self, group: GroupId, accumulator: SharedAccumulator<T>) -> Result<()>;

    /// Buffer `group` (if it is not already), drain, and return its elements.
    fn materialize(&self, group: GroupId) -> Result<Vec<T>>;

    fn is_buffered(&self, group: GroupId) -> Result<bool>;
}

struct GroupState<T> {
    first: T,
    accumulators: Vec<SharedAccumulator<T>>,
    buffer: Option<Vec<T>>,
    /// Elements routed here after `first`.
    routed: usize,
    /// Some element was routed while no buffer existed, so a late consumer
    /// cannot be replayed everything.
    gaps: bool,
}

struct Evaluation<T: 'static, K, R, KF, RF, E> {
    me: Weak<Self>,
    cursor: RefCell<Elements<T>>,
    exhausted: Cell<bool>,
    key_of: KF,
    result_of: RF,
    keys: RefCell<KeyIndex<K, E>>,
    groups: RefCell<Vec<GroupState<T>>>,
    results: RefCell<Vec<Option<R>>>,
    failure: RefCell<Option<Error>>,
    context: FusionContext,
}

fn reentrant<B>(_: B) -> Error {
    Error::ReentrantAdvance
}

fn missing(group: GroupId) -> Error {
    Error::Invariant(format!("{group} is not part of this evaluation"))
}

impl<T, K, R, KF, RF, E> Evaluation<T, K, R, KF, RF, E>
where
    T: Clone + 'static,
    K: Clone + 'static,
    R: 'static,
    KF: Fn(&T) -> K + 'static,
    RF: Fn(Grouping<K, T>) -> Result<R> + 'static,
    E: Equivalence<K> + 'static,
{
    fn new(
        cursor: Elements<T>,
        key_of: KF,
        result_of: RF,
        equivalence: E,
        context: FusionContext,
    ) -> Rc<Self> {
        let capacity = context.config.group_capacity_hint;
        Rc::new_cyclic(|me| Evaluation {
            me: me.clone(),
            cursor: RefCell::new(cursor),
            exhausted: Cell::new(false),
            key_of,
            result_of,
            keys: RefCell::new(KeyIndex::new(equivalence, capacity)),
            groups: RefCell::new(Vec::with_capacity(capacity)),
            results: RefCell::new(Vec::with_capacity(capacity)),
            failure: RefCell::new(None),
            context,
        })
    }

    fn step(&self) -> Result<Step> {
        if self.exhausted.get() {
            return Ok(Step::Exhausted);
        }
        let next = self.cursor.try_borrow_mut().map_err(reentrant)?.next();
        match next {
            None => {
                self.exhausted.set(true);
                Ok(Step::Exhausted)
            }
            Some(item) => {
                self.route(item?)?;
                Ok(Step::Advanced)
            }
        }
    }

    fn route(&self, item: T) -> Result<()> {
        self.context.metrics.record_element();
        let key = (self.key_of)(&item);
        let (hash, found) = self.keys.try_borrow().map_err(reentrant)?.find(&key);
        match found {
            Some(group) => self.push(group, item),
            None => self.discover(hash, key, item),
        }
    }

    /// New key: record the group, then run the result selector right away.
    fn discover(&self, hash: u64, key: K, first: T) -> Result<()> {
        let group = self
            .keys
            .try_borrow_mut()
            .map_err(reentrant)?
            .insert(hash, key.clone());
        self.groups.try_borrow_mut().map_err(reentrant)?.push(GroupState {
            first,
            accumulators: Vec::new(),
            buffer: None,
            routed: 0,
            gaps: false,
        });
        self.results.try_borrow_mut().map_err(reentrant)?.push(None);
        self.context.metrics.record_group();
        #[cfg(feature = "tracing")]
        tracing::trace!(%group, "group discovered");

        let driver: Rc<dyn Driver<T>> = self
            .me
            .upgrade()
            .ok_or_else(|| Error::Invariant("evaluation dropped while advancing".into()))?;
        let result = (self.result_of)(Grouping::fused(group, key, driver))?;

        let mut results = self.results.try_borrow_mut().map_err(reentrant)?;
        let slot = results.get_mut(group.get()).ok_or_else(|| missing(group))?;
        *slot = Some(result);
        Ok(())
    }

    /// Fan `item` out to every consumer registered on `group`.
    fn push(&self, group: GroupId, item: T) -> Result<()> {
        let accumulators = {
            let mut groups = self.groups.try_borrow_mut().map_err(reentrant)?;
            let state = groups.get_mut(group.get()).ok_or_else(|| missing(group))?;
            if state.accumulators.is_empty() && state.buffer.is_none() {
                // Nothing asked for an aggregate before the second element:
                // the grouping is being read as a plain sequence, if at all.
                state.buffer = Some(self.new_buffer(&state.first));
            }
            state.routed += 1;
            match state.buffer.as_mut() {
                Some(buffer) => {
                    buffer.push(item.clone());
                    self.context.metrics.record_buffered(1);
                }
                None => state.gaps = true,
            }
            state.accumulators.clone()
        };

        for accumulator in &accumulators {
            accumulator.try_borrow_mut().map_err(reentrant)?.accumulate(&item);
        }
        self.context.metrics.record_streamed(accumulators.len());
        Ok(())
    }

    fn new_buffer(&self, first: &T) -> Vec<T> {
        let mut buffer = Vec::with_capacity(self.context.config.buffer_capacity_hint.max(1));
        buffer.push(first.clone());
        self.context.metrics.record_accumulator();
        self.context.metrics.record_buffered(1);
        buffer
    }

    /// Late consumers of a group with gaps only get the first element back.
    fn admit_late(&self, group: GroupId, state: &GroupState<T>) -> Result<()> {
        if !state.gaps {
            return Ok(());
        }
        match self.context.config.late_registration {
            LateRegistration::Reject => Err(Error::LateRegistration {
                group,
                routed: state.routed,
            }),
            LateRegistration::Tolerate => {
                self.context.metrics.record_late_registration();
                Ok(())
            }
        }
    }

    fn into_results(&self) -> Result<Vec<R>> {
        let results = std::mem::take(&mut *self.results.try_borrow_mut().map_err(reentrant)?);
        results
            .into_iter()
            .enumerate()
            .map(|(i, slot)| slot.ok_or_else(|| missing(GroupId::new(i))))
            .collect()
    }

    /// Drop results produced so far. They may hold groupings that point
    /// back at this evaluation.
    fn discard(&self) {
        if let Ok(mut results) = self.results.try_borrow_mut() {
            results.clear();
        }
    }
}

impl<T, K, R, KF, RF, E> Driver<T> for Evaluation<T, K, R, KF, RF, E>
where
    T: Clone + 'static,
    K: Clone + 'static,
    R: 'static,
    KF: Fn(&T) -> K + 'static,
    RF: Fn(Grouping<K, T>) -> Result<R> + 'static,
    E: Equivalence<K> + 'static,
{
    fn advance(&self) -> Result<Step> {
        let failed = self.failure.borrow().clone();
        if let Some(e) = failed {
            return Err(e);
        }
        let step = self.step();
        if let Err(e) = &step {
            self.failure.borrow_mut().get_or_insert_with(|| e.clone());
        }
        step
    }

    fn attach(&self, group: GroupId, accumulator: SharedAccumulator<T>) -> Result<()> {
        let replay = {
            let mut groups = self.groups.try_borrow_mut().map_err(reentrant)?;
            let state = groups.get_mut(group.get()).ok_or_else(|| missing(group))?;
            self.admit_late(group, state)?;
            state.accumulators.push(Rc::clone(&accumulator));
            match &state.buffer {
                Some(buffer) => buffer.clone(),
                None => vec![state.first.clone()],
            }
        };
        self.context.metrics.record_accumulator();
        #[cfg(feature = "tracing")]
        tracing::trace!(%group, replayed = replay.len(), "accumulator attached");

        let mut accumulator = accumulator.try_borrow_mut().map_err(reentrant)?;
        for item in &replay {
            accumulator.accumulate(item);
        }
        Ok(())
    }

    fn materialize(&self, group: GroupId) -> Result<Vec<T>> {
        {
            let mut groups = self.groups.try_borrow_mut().map_err(reentrant)?;
            let state = groups.get_mut(group.get()).ok_or_else(|| missing(group))?;
            if state.buffer.is_none() {
                self.admit_late(group, state)?;
                state.buffer = Some(self.new_buffer(&state.first));
            }
        }
        self.drain()?;
        let groups = self.groups.try_borrow().map_err(reentrant)?;
        groups
            .get(group.get())
            .and_then(|state| state.buffer.clone())
            .ok_or_else(|| missing(group))
    }

    fn is_buffered(&self, group: GroupId) -> Result<bool> {
        let groups = self.groups.try_borrow().map_err(reentrant)?;
        let state = groups.get(group.get()).ok_or_else(|| missing(group))?;
        Ok(state.buffer.is_some())
    }
}

/// Lazily group `source`, yielding `result_of(grouping)` per key in
/// discovery order once the shared cursor is exhausted.
pub(crate) fn group_by<T, K, R, KF, RF, E>(
    source: Seq<T>,
    key_of: KF,
    result_of: RF,
    equivalence: E,
    context: FusionContext,
) -> Seq<R>
where
    T: Clone + 'static,
    K: Clone + 'static,
    R: 'static,
    KF: Fn(&T) -> K + 'static,
    RF: Fn(Grouping<K, T>) -> Result<R> + 'static,
    E: Equivalence<K> + 'static,
{
    Seq::from_elements(runtime::deferred(move || {
        let evaluation =
            Evaluation::new(source.into_elements(), key_of, result_of, equivalence, context);
        if let Err(e) = evaluation.drain() {
            evaluation.discard();
            return Err(e);
        }
        let results = evaluation.into_results()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(groups = results.len(), "fused group-by finished");
        metrics::emit_stats("group_by", &evaluation.context.metrics.snapshot());
        Ok(results)
    }))
}
