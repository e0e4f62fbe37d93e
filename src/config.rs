//! Layout options.
//!
//! Options are plain data and deserialize from the same camelCase JSON a
//! host page would pass. Callbacks and runtime services are attached through
//! [`crate::runtime::MasonryBuilder`] instead.

use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MasonryError, Result};
use crate::geometry::{Gutter, LengthUnit};
use crate::layout::BreakpointTable;

pub const DEFAULT_COLUMNS: usize = 4;
pub const DEFAULT_GUTTER: f64 = 10.0;
pub const DEFAULT_DEBOUNCE_MS: u64 = 25;
pub const DEFAULT_LOADING_CLASS: &str = "masonry--loading";
pub const DEFAULT_LOADED_CLASS: &str = "masonry--loaded";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MasonryOptions {
    /// Column count used when no breakpoint matches.
    pub columns: NonZeroUsize,
    pub column_breakpoints: BreakpointTable,
    pub gutter: f64,
    pub gutter_unit: LengthUnit,
    /// Hold the first layout pass until every image in the container settles.
    pub init_on_image_load: bool,
    pub loading_class: String,
    pub loaded_class: String,
    /// Recompute (debounced) when the viewport is resized.
    pub bind_on_scroll: bool,
    /// Resolve breakpoints against the container width instead of the viewport.
    pub use_container_width: bool,
    pub track_item_size_changes: bool,
    /// Quiet period for debounced recomputes, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for MasonryOptions {
    fn default() -> Self {
        Self {
            columns: NonZeroUsize::new(DEFAULT_COLUMNS).unwrap_or(NonZeroUsize::MIN),
            column_breakpoints: BreakpointTable::new(),
            gutter: DEFAULT_GUTTER,
            gutter_unit: LengthUnit::Px,
            init_on_image_load: false,
            loading_class: DEFAULT_LOADING_CLASS.to_string(),
            loaded_class: DEFAULT_LOADED_CLASS.to_string(),
            bind_on_scroll: true,
            use_container_width: false,
            track_item_size_changes: false,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl MasonryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.gutter.is_finite() || self.gutter < 0.0 {
            return Err(MasonryError::InvalidGutter(self.gutter));
        }
        Ok(())
    }

    pub fn gutter(&self) -> Gutter {
        Gutter::new(self.gutter, self.gutter_unit.clone())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn with_columns(mut self, columns: usize) -> Result<Self> {
        self.columns = NonZeroUsize::new(columns).ok_or(MasonryError::InvalidColumns(columns))?;
        Ok(self)
    }

    pub fn with_breakpoint(mut self, threshold: u32, columns: usize) -> Result<Self> {
        self.column_breakpoints.insert(threshold, columns)?;
        Ok(self)
    }

    pub fn with_gutter(mut self, value: f64, unit: impl Into<LengthUnit>) -> Result<Self> {
        self.gutter = value;
        self.gutter_unit = unit.into();
        self.validate()?;
        Ok(self)
    }

    pub fn with_debounce(mut self, quiet_period: Duration) -> Self {
        self.debounce_ms = quiet_period.as_millis() as u64;
        self
    }

    pub fn with_classes(mut self, loading: impl Into<String>, loaded: impl Into<String>) -> Self {
        self.loading_class = loading.into();
        self.loaded_class = loaded.into();
        self
    }

    pub fn init_on_image_load(mut self, enabled: bool) -> Self {
        self.init_on_image_load = enabled;
        self
    }

    pub fn bind_on_scroll(mut self, enabled: bool) -> Self {
        self.bind_on_scroll = enabled;
        self
    }

    pub fn use_container_width(mut self, enabled: bool) -> Self {
        self.use_container_width = enabled;
        self
    }

    pub fn track_item_size_changes(mut self, enabled: bool) -> Self {
        self.track_item_size_changes = enabled;
        self
    }
}
