//! seqfuse: lazy sequences with per-operation specialisation and single-pass
//! group-by fusion.
//!
//! ```
//! use seqfuse::{Fusion, Seq};
//!
//! let fusion = Fusion::default();
//! let sums = Seq::from_vec(vec!["ab", "c", "de", "fg", "h"])
//!     .decorate(fusion.clone())
//!     .group_by(|s| s.len(), |g| g.sum_by(|s| s.len() as i64))
//!     .to_vec()
//!     .unwrap();
//! assert_eq!(sums, vec![6, 2]);
//! assert_eq!(fusion.stats().buffered, 0);
//! ```

pub use seqfuse_core::{
    config, error, id, stats, Error, FusionConfig, FusionMetrics, FusionStats, GroupId,
    LateRegistration, Result,
};
pub use seqfuse_operators::{
    Accumulator, Attempt, CountAccumulator, Decorated, Decoration, Decorator, DefaultEquivalence,
    Equivalence, ExtremumAccumulator, Fusion, FusionContext, GroupOffer, Grouping, IntoSeq, Seq,
    Sequence, SumAccumulator, Traced,
};

pub mod prelude {
    pub use seqfuse_core::prelude::*;
    pub use seqfuse_operators::{
        Decoration, DefaultEquivalence, Equivalence, Fusion, Grouping, Seq, Sequence, Traced,
    };
}
