//! The `Fusion` decoration: claims group-by for the fusion engine.

use std::rc::Rc;

use seqfuse_core::config::FusionConfig;
use seqfuse_core::stats::{FusionMetrics, FusionStats};

use crate::decorator::Decoration;

/// What a fused evaluation needs from the decoration that started it.
#[derive(Debug, Clone, Default)]
pub struct FusionContext {
    pub config: FusionConfig,
    pub metrics: Rc<FusionMetrics>,
}

impl FusionContext {
    pub fn new(config: FusionConfig) -> Self {
        Self {
            config,
            metrics: Rc::new(FusionMetrics::new()),
        }
    }
}

/// Decorate a sequence with this to evaluate any group-by reaching it in a
/// single pass. Every other operation is forwarded and the result is
/// re-decorated, so the fusion survives `filter`, `map`, `concat`, ...
///
/// Clones share counters: keep one around to inspect `stats()` afterwards.
#[derive(Debug, Clone, Default)]
pub struct Fusion {
    context: FusionContext,
}

impl Fusion {
    pub fn new(config: FusionConfig) -> Self {
        Self {
            context: FusionContext::new(config),
        }
    }

    /// Configuration from `SEQFUSE_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(FusionConfig::from_env())
    }

    pub fn config(&self) -> &FusionConfig {
        &self.context.config
    }

    pub fn metrics(&self) -> &Rc<FusionMetrics> {
        &self.context.metrics
    }

    /// Counters summed over every evaluation this decoration started.
    pub fn stats(&self) -> FusionStats {
        self.context.metrics.snapshot()
    }
}

impl Decoration for Fusion {
    fn name(&self) -> &'static str {
        "fusion"
    }

    fn group_by_fusion(&self) -> Option<FusionContext> {
        Some(self.context.clone())
    }
}
