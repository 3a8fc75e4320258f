//! Analyzer telemetry collector.
//!
//! The collector records classification, transition, gating and calibration
//! events into a bounded history plus a broadcast stream, so a relay or CLI
//! can observe an analyzer without touching its state.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tokio::sync::broadcast;

pub mod events;

pub use events::MetricEvent;

/// Snapshot of collector state for CLI reporting.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TelemetrySnapshot {
    pub recent: Vec<MetricEvent>,
    pub total_events: u64,
    pub dropped_events: u64,
    pub transitions: u64,
    pub gated_cycles: u64,
}

/// Broadcast-based collector retaining a bounded history of metrics.
pub struct TelemetryCollector {
    tx: broadcast::Sender<MetricEvent>,
    history: Mutex<VecDeque<MetricEvent>>,
    history_capacity: usize,
    total_events: AtomicU64,
    dropped_history: AtomicU64,
    transitions: AtomicU64,
    gated_cycles: AtomicU64,
}

impl TelemetryCollector {
    pub fn new(buffer: usize, history_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer.max(1));
        Self {
            tx,
            history: Mutex::new(VecDeque::with_capacity(history_capacity)),
            history_capacity,
            total_events: AtomicU64::new(0),
            dropped_history: AtomicU64::new(0),
            transitions: AtomicU64::new(0),
            gated_cycles: AtomicU64::new(0),
        }
    }

    pub fn publish(&self, event: MetricEvent) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
        match event {
            MetricEvent::Transition { .. } => {
                self.transitions.fetch_add(1, Ordering::Relaxed);
            }
            MetricEvent::Gated { .. } => {
                self.gated_cycles.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }

        if self.history_capacity > 0 {
            let mut history = self
                .history
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if history.len() == self.history_capacity {
                history.pop_front();
                self.dropped_history.fetch_add(1, Ordering::Relaxed);
            }
            history.push_back(event.clone());
        }

        // No subscribers is not an error
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MetricEvent> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        let history = self
            .history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        TelemetrySnapshot {
            recent: history.iter().cloned().collect(),
            total_events: self.total_events.load(Ordering::Relaxed),
            dropped_events: self.dropped_history.load(Ordering::Relaxed),
            transitions: self.transitions.load(Ordering::Relaxed),
            gated_cycles: self.gated_cycles.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new(256, 64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::state::StateLabel;

    fn classification(confidence: f64) -> MetricEvent {
        MetricEvent::Classification {
            state: StateLabel::Normal,
            confidence,
        }
    }

    #[test]
    fn test_history_is_bounded() {
        let collector = TelemetryCollector::new(8, 2);
        collector.publish(classification(0.1));
        collector.publish(classification(0.2));
        collector.publish(classification(0.3));

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.total_events, 3);
        assert_eq!(snapshot.dropped_events, 1);
        assert_eq!(snapshot.recent, vec![classification(0.2), classification(0.3)]);
    }

    #[test]
    fn test_subscribers_receive_events() {
        let collector = TelemetryCollector::default();
        let mut rx = collector.subscribe();

        collector.publish(MetricEvent::Gated { quality: 0.1 });

        assert_eq!(rx.try_recv().unwrap(), MetricEvent::Gated { quality: 0.1 });
        assert_eq!(collector.snapshot().gated_cycles, 1);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let collector = TelemetryCollector::default();
        collector.publish(classification(0.5));
        assert_eq!(collector.snapshot().total_events, 1);
    }
}
