//! # Throughput Monitor
//!
//! Compares the store's per-kind counts against the previous poll and
//! reports every kind that grew. Kinds that stayed flat or shrank (external
//! deletes) are not reported, but the baseline always moves to the latest
//! counts.

use std::sync::Arc;

use goban_store::{EntityKind, EntityStore, KindCounts};
use tracing::info;

/// One positive count change between two polls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonitorEvent {
    /// Kind whose collection grew.
    pub kind: EntityKind,
    /// Records added since the previous poll.
    pub delta: usize,
    /// Collection length at this poll.
    pub total: usize,
}

/// Polls an [`EntityStore`] for count deltas.
#[derive(Debug)]
pub struct Monitor {
    store: Arc<EntityStore>,
    baseline: KindCounts,
}

impl Monitor {
    /// Creates a monitor with a zero baseline.
    ///
    /// The first poll reports everything already in the store.
    #[must_use]
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self {
            store,
            baseline: KindCounts::default(),
        }
    }

    /// Creates a monitor whose baseline is the store's current counts.
    #[must_use]
    pub fn from_current(store: Arc<EntityStore>) -> Self {
        let baseline = store.counts();
        Self { store, baseline }
    }

    /// Returns the counts seen at the last poll.
    #[must_use]
    pub const fn baseline(&self) -> KindCounts {
        self.baseline
    }

    /// Reads all counts once, logs and returns every positive delta.
    pub fn poll(&mut self) -> Vec<MonitorEvent> {
        let current = self.store.counts();
        let events: Vec<MonitorEvent> = current
            .iter()
            .filter_map(|(kind, total)| {
                let delta = total.checked_sub(self.baseline.get(kind))?;
                (delta > 0).then_some(MonitorEvent { kind, delta, total })
            })
            .collect();

        for event in &events {
            info!(kind = %event.kind, delta = event.delta, total = event.total,
                "new {} added: {}", event.kind, event.delta);
        }

        self.baseline = current;
        events
    }
}
