use std::collections::BTreeSet;

use crate::geometry::{Gutter, Length, LengthUnit, PositionMode};
use crate::layout::ItemGeometry;

use super::{
    ImageId, ImageInfo, ImageOutcome, ImageState, ItemIndex, Measure, Surface, SurfaceError,
};

const ROOT_FONT_PX: f64 = 16.0;

/// How an in-memory item derives its rendered height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemSizing {
    /// Height independent of width.
    Fixed(f64),
    /// Height proportional to the rendered width (`height = width * ratio`).
    Aspect(f64),
}

/// Box state held by [`MemorySurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryItem {
    pub sizing: ItemSizing,
    pub position: PositionMode,
    pub top: Option<Length>,
    pub left: Option<Length>,
    pub width: Option<Length>,
}

impl MemoryItem {
    pub fn new(sizing: ItemSizing) -> Self {
        Self {
            sizing,
            position: PositionMode::Static,
            top: None,
            left: None,
            width: None,
        }
    }
}

/// Headless rendering surface.
///
/// Lengths are resolved the way a browser would for the supported units:
/// percentages against the container width, `em`/`rem` against a 16px root
/// font, `vw`/`vh` against the viewport. Unknown units resolve 1:1 to pixels.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    attached: bool,
    viewport: (f64, f64),
    container_width: f64,
    round_widths: bool,
    size_observation: bool,
    items: Vec<MemoryItem>,
    images: Vec<ImageInfo>,
    position: PositionMode,
    height: Option<Length>,
    classes: BTreeSet<String>,
    resize_bound: bool,
    observed: BTreeSet<ItemIndex>,
    watched: BTreeSet<ImageId>,
}

impl MemorySurface {
    /// Empty container of `container_width` pixels inside a viewport of the
    /// same width.
    pub fn new(container_width: f64) -> Self {
        Self {
            attached: true,
            viewport: (container_width, 800.0),
            container_width,
            round_widths: false,
            size_observation: true,
            items: Vec::new(),
            images: Vec::new(),
            position: PositionMode::Static,
            height: None,
            classes: BTreeSet::new(),
            resize_bound: false,
            observed: BTreeSet::new(),
            watched: BTreeSet::new(),
        }
    }

    /// Container that has been removed from its document.
    pub fn detached() -> Self {
        Self {
            attached: false,
            ..Self::new(0.0)
        }
    }

    pub fn with_items(mut self, sizings: impl IntoIterator<Item = ItemSizing>) -> Self {
        self.items.extend(sizings.into_iter().map(MemoryItem::new));
        self
    }

    pub fn with_fixed_heights(self, heights: impl IntoIterator<Item = f64>) -> Self {
        self.with_items(heights.into_iter().map(ItemSizing::Fixed))
    }

    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = (width, height);
        self
    }

    /// Truncate rendered widths to whole pixels.
    pub fn with_width_rounding(mut self, enabled: bool) -> Self {
        self.round_widths = enabled;
        self
    }

    /// Simulate a host without per-element size observation.
    pub fn without_size_observation(mut self) -> Self {
        self.size_observation = false;
        self
    }

    pub fn with_image(mut self, source: Option<&str>, state: ImageState) -> Self {
        let id = ImageId(self.images.len());
        self.images.push(ImageInfo {
            id,
            source: source.map(str::to_string),
            state,
        });
        self
    }

    pub fn push_item(&mut self, sizing: ItemSizing) -> ItemIndex {
        self.items.push(MemoryItem::new(sizing));
        self.items.len() - 1
    }

    pub fn remove_item(&mut self, item: ItemIndex) -> Option<MemoryItem> {
        if item < self.items.len() {
            self.observed.remove(&item);
            Some(self.items.remove(item))
        } else {
            None
        }
    }

    pub fn set_sizing(&mut self, item: ItemIndex, sizing: ItemSizing) {
        if let Some(entry) = self.items.get_mut(item) {
            entry.sizing = sizing;
        }
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport.0 = width;
    }

    pub fn set_container_width(&mut self, width: f64) {
        self.container_width = width;
    }

    pub fn settle_image(&mut self, image: ImageId, outcome: ImageOutcome) {
        if let Some(info) = self.images.iter_mut().find(|info| info.id == image) {
            info.state = outcome.into();
        }
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn item(&self, item: ItemIndex) -> Option<&MemoryItem> {
        self.items.get(item)
    }

    pub fn container_position(&self) -> PositionMode {
        self.position
    }

    pub fn container_height(&self) -> Option<&Length> {
        self.height.as_ref()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn is_resize_bound(&self) -> bool {
        self.resize_bound
    }

    pub fn observed_items(&self) -> Vec<ItemIndex> {
        self.observed.iter().copied().collect()
    }

    pub fn watched_images(&self) -> Vec<ImageId> {
        self.watched.iter().copied().collect()
    }

    /// Pixel value of a length expression written to this surface.
    pub fn resolve_length(&self, length: &Length) -> f64 {
        match length {
            Length::Zero => 0.0,
            Length::Px(px) => *px,
            Length::PxPlus { px, plus, unit } => px + self.resolve_unit(*plus, unit),
            Length::PercentMinus {
                percent,
                minus,
                unit,
            } => self.container_width * percent / 100.0 - self.resolve_unit(*minus, unit),
        }
    }

    fn resolve_unit(&self, value: f64, unit: &LengthUnit) -> f64 {
        match unit {
            LengthUnit::Px | LengthUnit::Other(_) => value,
            LengthUnit::Percent => self.container_width * value / 100.0,
            LengthUnit::Em | LengthUnit::Rem => value * ROOT_FONT_PX,
            LengthUnit::Vw => self.viewport.0 * value / 100.0,
            LengthUnit::Vh => self.viewport.1 * value / 100.0,
        }
    }
}

impl Measure for MemorySurface {
    fn rendered_height(&self, item: ItemIndex) -> f64 {
        match self.items.get(item).map(|entry| entry.sizing) {
            Some(ItemSizing::Fixed(height)) => height,
            Some(ItemSizing::Aspect(ratio)) => self.rendered_width(item) * ratio,
            None => 0.0,
        }
    }

    fn rendered_width(&self, item: ItemIndex) -> f64 {
        let width = self
            .items
            .get(item)
            .and_then(|entry| entry.width.as_ref())
            .map(|width| self.resolve_length(width).max(0.0))
            .unwrap_or(0.0);
        if self.round_widths { width.trunc() } else { width }
    }

    fn resolve_gutter(&self, gutter: &Gutter) -> f64 {
        self.resolve_unit(gutter.value, &gutter.unit)
    }
}

impl Surface for MemorySurface {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn viewport_width(&self) -> f64 {
        self.viewport.0
    }

    fn container_width(&self) -> f64 {
        self.container_width
    }

    fn images(&self) -> Vec<ImageInfo> {
        self.images.clone()
    }

    fn reset_item(&mut self, item: ItemIndex, width: &Length) {
        if let Some(entry) = self.items.get_mut(item) {
            entry.top = None;
            entry.left = None;
            if entry.width.as_ref() != Some(width) {
                entry.width = Some(width.clone());
            }
        }
    }

    fn place_item(&mut self, item: ItemIndex, geometry: &ItemGeometry) {
        if let Some(entry) = self.items.get_mut(item) {
            entry.position = PositionMode::Absolute;
            entry.top = Some(geometry.top.clone());
            entry.left = Some(geometry.left.clone());
            entry.width = Some(geometry.width.clone());
        }
    }

    fn set_container_position(&mut self, mode: PositionMode) {
        self.position = mode;
    }

    fn set_container_height(&mut self, height: Option<&Length>) {
        self.height = height.cloned();
    }

    fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    fn bind_resize(&mut self) {
        self.resize_bound = true;
    }

    fn unbind_resize(&mut self) {
        self.resize_bound = false;
    }

    fn observe_item(&mut self, item: ItemIndex) -> Result<(), SurfaceError> {
        if !self.size_observation {
            return Err(SurfaceError::Unsupported("element size observation"));
        }
        if item < self.items.len() {
            self.observed.insert(item);
        }
        Ok(())
    }

    fn unobserve_item(&mut self, item: ItemIndex) {
        self.observed.remove(&item);
    }

    fn watch_image(&mut self, image: ImageId) {
        self.watched.insert(image);
    }

    fn unwatch_image(&mut self, image: ImageId) {
        self.watched.remove(&image);
    }
}
