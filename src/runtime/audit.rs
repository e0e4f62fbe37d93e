//! Session lifecycle audit hooks.
//!
//! Records carry a stage plus structured details so callers can buffer or
//! visualise how a session moved through its states without touching the
//! layout path itself.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

/// Lifecycle checkpoints emitted by `MasonrySession`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAuditStage {
    /// Options validated and the surface accepted.
    Constructed,
    /// The first pass is waiting on images.
    GateArmed,
    /// Every watched image settled.
    GateReleased,
    /// A recompute was scheduled behind the debounce.
    TriggerScheduled,
    /// A layout pass committed its result to the surface.
    PassCommitted,
    /// Size observers were rebuilt for the current item set.
    ObserversAttached,
    /// Terminal state; timers and observers are gone.
    Disposed,
}

/// Structured audit entry.
#[derive(Debug, Clone)]
pub struct SessionAuditEvent {
    /// Session clock reading when the stage was reached.
    pub at: Duration,
    pub stage: SessionAuditStage,
    pub details: Vec<(String, Value)>,
}

impl SessionAuditEvent {
    fn new(stage: SessionAuditStage, at: Duration) -> Self {
        Self {
            at,
            stage,
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

/// Builder helper to append fields ergonomically.
pub struct SessionAuditEventBuilder {
    event: SessionAuditEvent,
}

impl SessionAuditEventBuilder {
    pub fn new(stage: SessionAuditStage, at: Duration) -> Self {
        Self {
            event: SessionAuditEvent::new(stage, at),
        }
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.event.details.push((key.into(), value.into()));
        self
    }

    pub fn finish(self) -> SessionAuditEvent {
        self.event
    }
}

/// Trait implemented by any audit sink.
pub trait SessionAudit: Send + Sync {
    fn record(&self, event: SessionAuditEvent);
}

/// Default no-op implementation used when auditing is disabled.
#[derive(Debug, Default)]
pub struct NullSessionAudit;

impl SessionAudit for NullSessionAudit {
    fn record(&self, _event: SessionAuditEvent) {}
}

/// Keeps every record in memory. Clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct BufferedSessionAudit {
    events: Arc<Mutex<Vec<SessionAuditEvent>>>,
}

impl BufferedSessionAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionAuditEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<SessionAuditStage> {
        self.events().into_iter().map(|event| event.stage).collect()
    }

    pub fn count(&self, stage: SessionAuditStage) -> usize {
        self.stages().into_iter().filter(|s| *s == stage).count()
    }
}

impl SessionAudit for BufferedSessionAudit {
    fn record(&self, event: SessionAuditEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}
