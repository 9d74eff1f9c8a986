use thiserror::Error;

use crate::id::GroupId;

/// Canonical result for the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by sequences, aggregates and the group-by engine.
///
/// `Clone` so a failed group-by evaluation can keep reporting the original
/// failure to every grouping that later tries to drive it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("sequence contains no elements")]
    EmptySequence,

    #[error("integer overflow while summing a sequence")]
    Overflow,

    /// The shared cursor (or an accumulator) was re-entered while it was
    /// already being advanced.
    #[error("re-entrant advance of the shared cursor")]
    ReentrantAdvance,

    /// An accumulator was attached to a group after elements had already been
    /// streamed past it without a materialization buffer to replay from.
    #[error("accumulator attached to {group} after {routed} element(s) were streamed past it")]
    LateRegistration { group: GroupId, routed: usize },

    /// A group-by evaluation lost track of its own state.
    #[error("internal invariant failed: {0}")]
    Invariant(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// Failures raised by caller-supplied selectors.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Wrap a caller-side failure so it can travel through a sequence.
    pub fn custom(msg: impl Into<String>) -> Self {
        Error::Custom(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
