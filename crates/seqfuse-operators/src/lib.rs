#![forbid(unsafe_code)]
//! seqfuse-operators: lazy sequences whose operations can be specialised.
//!
//! Design intent:
//! - Every operation goes through `dispatch::perform`, which asks the
//!   sequence for a specialised implementation first, then forwards through
//!   delegating decorators, and only then falls back to the default runtime.
//! - Keep this crate pure and synchronous (no async, no threads).
//! - The group-by fusion engine (`group`) is just another specialisation: the
//!   `Fusion` decoration claims group-by and evaluates it in a single pass
//!   over a shared cursor.

pub mod aggregate;
pub mod concat;
pub mod decorator;
pub mod dispatch;
pub mod filter;
pub mod group;
pub mod map;
pub mod metrics;
pub mod runtime;
pub mod seq;
pub mod source;
pub mod traits;

pub use decorator::{Decorated, Decoration, Decorator, Traced};
pub use dispatch::{perform, Operation};
pub use group::{
    Accumulator, CountAccumulator, DefaultEquivalence, Equivalence, ExtremumAccumulator, Fusion,
    FusionContext, GroupBy, GroupOffer, Grouping, SumAccumulator,
};
pub use seq::Seq;
pub use traits::{Attempt, Comparator, Elements, IntoSeq, Predicate, Projection, Sequence};

pub use seqfuse_core::error::{Error, Result};
