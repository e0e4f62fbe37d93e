use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters accumulated by a layout session.
#[derive(Debug, Default, Clone)]
pub struct LayoutMetrics {
    passes: u64,
    items_positioned: u64,
    unchanged_passes: u64,
    resize_triggers: u64,
    size_change_triggers: u64,
    coalesced_triggers: u64,
}

impl LayoutMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_pass(&mut self, items: usize, unchanged: bool) {
        self.passes = self.passes.saturating_add(1);
        self.items_positioned = self.items_positioned.saturating_add(items as u64);
        if unchanged {
            self.unchanged_passes = self.unchanged_passes.saturating_add(1);
        }
    }

    pub fn record_resize_trigger(&mut self) {
        self.resize_triggers = self.resize_triggers.saturating_add(1);
    }

    pub fn record_size_change_trigger(&mut self) {
        self.size_change_triggers = self.size_change_triggers.saturating_add(1);
    }

    /// A trigger arrived while another was still waiting out its quiet period.
    pub fn record_coalesced(&mut self) {
        self.coalesced_triggers = self.coalesced_triggers.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            passes: self.passes,
            items_positioned: self.items_positioned,
            unchanged_passes: self.unchanged_passes,
            resize_triggers: self.resize_triggers,
            size_change_triggers: self.size_change_triggers,
            coalesced_triggers: self.coalesced_triggers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub passes: u64,
    pub items_positioned: u64,
    pub unchanged_passes: u64,
    pub resize_triggers: u64,
    pub size_change_triggers: u64,
    pub coalesced_triggers: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "layout_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("passes".to_string(), json!(self.passes));
        map.insert("items_positioned".to_string(), json!(self.items_positioned));
        map.insert("unchanged_passes".to_string(), json!(self.unchanged_passes));
        map.insert("resize_triggers".to_string(), json!(self.resize_triggers));
        map.insert(
            "size_change_triggers".to_string(),
            json!(self.size_change_triggers),
        );
        map.insert(
            "coalesced_triggers".to_string(),
            json!(self.coalesced_triggers),
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_counters() {
        let mut metrics = LayoutMetrics::new();
        metrics.record_pass(5, false);
        metrics.record_pass(5, true);
        metrics.record_resize_trigger();
        metrics.record_resize_trigger();
        metrics.record_coalesced();

        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snapshot.passes, 2);
        assert_eq!(snapshot.items_positioned, 10);
        assert_eq!(snapshot.unchanged_passes, 1);
        assert_eq!(snapshot.resize_triggers, 2);
        assert_eq!(snapshot.coalesced_triggers, 1);
        assert_eq!(snapshot.uptime_ms, 1500);
    }

    #[test]
    fn snapshot_converts_to_a_log_event() {
        let event = LayoutMetrics::new()
            .snapshot(Duration::ZERO)
            .to_log_event("masonry::metrics");
        assert_eq!(event.message, "layout_metrics");
        assert_eq!(event.fields["passes"], 0);
    }
}
