#![forbid(unsafe_code)]
//! seqfuse-core: shared vocabulary for the seqfuse workspace.
//!
//! This crate holds the pieces every other crate agrees on:
//! - the error type and `Result` alias,
//! - strongly-typed ids for groups discovered during a group-by evaluation,
//! - `FusionConfig` (serde + environment overrides),
//! - fusion counters and their serializable snapshot.
//!
//! No sequence logic lives here. The operators crate owns the `Sequence`
//! trait, the dispatch protocol and the group-by fusion engine.

pub mod config;
pub mod error;
pub mod id;
pub mod prelude;
pub mod stats;

pub use config::{FusionConfig, LateRegistration};
pub use error::{Error, Result};
pub use id::GroupId;
pub use stats::{FusionMetrics, FusionStats};
