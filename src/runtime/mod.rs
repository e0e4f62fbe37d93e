//! Reactive controller and layout session.
//!
//! A [`MasonrySession`] owns one surface and decides when to lay it out:
//! immediately on construction, once the image gate releases, or after a
//! debounced quiet period following resize and size-change events. The host
//! forwards events through [`MasonrySession::notify`] and drives timers with
//! [`MasonrySession::poll`]; nothing here blocks or spawns threads.

pub mod audit;
pub mod debounce;
pub mod gate;
pub mod scheduler;
mod session;
pub mod tracking;

pub use audit::{
    BufferedSessionAudit, NullSessionAudit, SessionAudit, SessionAuditEvent,
    SessionAuditEventBuilder, SessionAuditStage,
};
pub use debounce::{Debouncer, Trigger};
pub use gate::{GateStatus, ImageGate};
pub use scheduler::{Clock, ManualClock, SystemClock, TimerHandle, TimerQueue};
pub use session::{HostEvent, MasonryBuilder, MasonrySession, SessionState};
pub use tracking::SizeTracker;
