//! Rendering surface contract.
//!
//! The engine never owns items. It reads measurements through [`Measure`],
//! writes geometry and presentation state through [`Surface`], and asks the
//! surface to start or stop delivering the events the session reacts to.
//! [`MemorySurface`] is an in-memory implementation used by tests, benches
//! and headless hosts.

mod memory;

use thiserror::Error;

use crate::geometry::{Gutter, Length, PositionMode};
use crate::layout::ItemGeometry;

pub use memory::{ItemSizing, MemoryItem, MemorySurface};

/// Position of an item in the container's child order.
pub type ItemIndex = usize;

/// Stable handle for an image-bearing descendant of the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageId(pub usize);

/// Load state of an image at observation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    Pending,
    Loaded,
    Errored,
}

impl ImageState {
    /// Loaded and errored images never change state again.
    pub fn is_settled(self) -> bool {
        !matches!(self, ImageState::Pending)
    }
}

/// How a pending image settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    Loaded,
    Errored,
}

impl From<ImageOutcome> for ImageState {
    fn from(outcome: ImageOutcome) -> Self {
        match outcome {
            ImageOutcome::Loaded => ImageState::Loaded,
            ImageOutcome::Errored => ImageState::Errored,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub id: ImageId,
    /// `None` when the image has no source to load.
    pub source: Option<String>,
    pub state: ImageState,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("{0} is not supported by this surface")]
    Unsupported(&'static str),
}

/// Read side of the surface used by the position calculator.
pub trait Measure {
    /// Height of `item` as rendered at its currently assigned width.
    fn rendered_height(&self, item: ItemIndex) -> f64;

    /// Width of `item` as rendered, after box sizing and rounding.
    fn rendered_width(&self, item: ItemIndex) -> f64;

    /// Pixel value of one gutter.
    fn resolve_gutter(&self, gutter: &Gutter) -> f64;
}

/// Full rendering surface bound to one container.
pub trait Surface: Measure {
    /// Whether the container exists and can be laid out.
    fn is_attached(&self) -> bool;

    fn item_count(&self) -> usize;

    fn viewport_width(&self) -> f64;

    fn container_width(&self) -> f64;

    /// Image-bearing descendants of the container.
    fn images(&self) -> Vec<ImageInfo>;

    /// Clear top/left of `item` and assign the column width so its height
    /// can be measured before positioning.
    fn reset_item(&mut self, item: ItemIndex, width: &Length);

    fn place_item(&mut self, item: ItemIndex, geometry: &ItemGeometry);

    fn set_container_position(&mut self, mode: PositionMode);

    /// `None` clears any previously committed height.
    fn set_container_height(&mut self, height: Option<&Length>);

    fn add_class(&mut self, class: &str);

    fn remove_class(&mut self, class: &str);

    fn bind_resize(&mut self);

    fn unbind_resize(&mut self);

    /// Start delivering size-change events for `item`.
    fn observe_item(&mut self, item: ItemIndex) -> Result<(), SurfaceError>;

    fn unobserve_item(&mut self, item: ItemIndex);

    /// Start delivering load/error events for `image`.
    fn watch_image(&mut self, image: ImageId);

    fn unwatch_image(&mut self, image: ImageId);
}
