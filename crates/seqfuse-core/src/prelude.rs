//! Convenient re-exports for downstream crates.

pub use crate::config::{FusionConfig, LateRegistration};
pub use crate::error::{Error, Result};
pub use crate::id::GroupId;
pub use crate::stats::{FusionMetrics, FusionStats};
