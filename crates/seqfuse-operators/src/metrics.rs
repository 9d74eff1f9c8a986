//! Tracing hooks for fused evaluations.
//!
//! No telemetry stack is pulled in here; enable the `tracing` feature and
//! install a subscriber in the binary to see these.

use seqfuse_core::stats::FusionStats;

#[cfg(feature = "tracing")]
pub fn emit_stats(event: &str, stats: &FusionStats) {
    tracing::debug!(
        event,
        groups = stats.groups,
        elements = stats.elements,
        streamed = stats.streamed,
        buffered = stats.buffered,
        accumulators = stats.accumulators,
        late_registrations = stats.late_registrations,
        "fusion stats"
    );
}

#[cfg(not(feature = "tracing"))]
pub fn emit_stats(_event: &str, _stats: &FusionStats) { /* no-op */
}
