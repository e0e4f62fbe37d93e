//! Absolute-position masonry grid layout.
//!
//! Items are packed row-major into equal-width columns separated by a fixed
//! gutter. Each item sits directly below the item in the same column of the
//! previous row, and the container grows to the lowest item bottom plus one
//! gutter.
//!
//! The crate splits into a pure layout core ([`layout`]) and a reactive
//! session ([`runtime`]) that decides when to run it against a rendering
//! [`surface`].
//!
//! ```
//! use masonry_layout::{MasonryOptions, MasonrySession, MemorySurface};
//!
//! let surface = MemorySurface::new(420.0).with_fixed_heights([100.0, 80.0, 120.0]);
//! let options = MasonryOptions::new().with_columns(2)?;
//! let session = MasonrySession::new(surface, options)?;
//!
//! let result = session.last_result().unwrap();
//! assert_eq!(result.row_count(), 2);
//! assert_eq!(result.container_height_px, 100.0 + 10.0 + 120.0 + 10.0);
//! # Ok::<(), masonry_layout::MasonryError>(())
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod runtime;
pub mod surface;

pub use config::MasonryOptions;
pub use error::{MasonryError, Result};
pub use geometry::{Gutter, Length, LengthUnit, PositionMode};
pub use layout::{BreakpointTable, ItemGeometry, LayoutResult, Row, compute, partition, resolve};
pub use logging::{FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult, MemorySink};
pub use metrics::{LayoutMetrics, MetricSnapshot};
pub use runtime::{
    BufferedSessionAudit, Clock, HostEvent, ManualClock, MasonryBuilder, MasonrySession,
    SessionAudit, SessionAuditStage, SessionState, SystemClock,
};
pub use surface::{
    ImageId, ImageInfo, ImageOutcome, ImageState, ItemIndex, ItemSizing, Measure, MemorySurface,
    Surface, SurfaceError,
};
