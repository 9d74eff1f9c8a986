//! Lightweight fusion counters.
//!
//! Keep this cheap: evaluations bump plain `Cell`s (group-by evaluation is
//! single-threaded). Callers read a `FusionStats` snapshot afterwards.

use std::cell::Cell;

use serde::{Deserialize, Serialize};

/// Snapshot of what one or more group-by evaluations did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FusionStats {
    /// Distinct keys discovered.
    pub groups: usize,
    /// Source elements pulled through shared cursors.
    pub elements: usize,
    /// Element deliveries to streaming (non-buffer) accumulators.
    pub streamed: usize,
    /// Elements copied into materialization buffers.
    pub buffered: usize,
    /// Accumulators attached, buffers included.
    pub accumulators: usize,
    /// Accumulators attached after elements had streamed past their group.
    pub late_registrations: usize,
}

#[derive(Debug, Default)]
pub struct FusionMetrics {
    groups: Cell<usize>,
    elements: Cell<usize>,
    streamed: Cell<usize>,
    buffered: Cell<usize>,
    accumulators: Cell<usize>,
    late_registrations: Cell<usize>,
}

fn bump(cell: &Cell<usize>, by: usize) {
    cell.set(cell.get().saturating_add(by));
}

impl FusionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_group(&self) {
        bump(&self.groups, 1);
    }

    pub fn record_element(&self) {
        bump(&self.elements, 1);
    }

    pub fn record_streamed(&self, deliveries: usize) {
        bump(&self.streamed, deliveries);
    }

    pub fn record_buffered(&self, items: usize) {
        bump(&self.buffered, items);
    }

    pub fn record_accumulator(&self) {
        bump(&self.accumulators, 1);
    }

    pub fn record_late_registration(&self) {
        bump(&self.late_registrations, 1);
        #[cfg(feature = "tracing")]
        tracing::warn!(
            total = self.late_registrations.get(),
            "accumulator attached after elements streamed past its group"
        );
    }

    pub fn snapshot(&self) -> FusionStats {
        FusionStats {
            groups: self.groups.get(),
            elements: self.elements.get(),
            streamed: self.streamed.get(),
            buffered: self.buffered.get(),
            accumulators: self.accumulators.get(),
            late_registrations: self.late_registrations.get(),
        }
    }

    /// Zero every counter.
    pub fn reset(&self) {
        for cell in [
            &self.groups,
            &self.elements,
            &self.streamed,
            &self.buffered,
            &self.accumulators,
            &self.late_registrations,
        ] {
            cell.set(0);
        }
    }
}
