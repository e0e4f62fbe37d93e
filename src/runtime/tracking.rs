use crate::surface::{ItemIndex, Surface, SurfaceError};

/// Per-item size observation, rebuilt from scratch after every pass because
/// the item set itself may have changed.
#[derive(Debug)]
pub struct SizeTracker {
    enabled: bool,
    supported: bool,
    observed: Vec<ItemIndex>,
}

impl SizeTracker {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            supported: true,
            observed: Vec::new(),
        }
    }

    /// Enabled and not yet found unsupported by the surface.
    pub fn is_active(&self) -> bool {
        self.enabled && self.supported
    }

    pub fn is_observing(&self, item: ItemIndex) -> bool {
        self.observed.contains(&item)
    }

    pub fn observed(&self) -> &[ItemIndex] {
        &self.observed
    }

    /// Drop every observer and attach one per current item. Returns the
    /// number of observed items.
    ///
    /// The first `Unsupported` error is returned to the caller and turns the
    /// tracker off for good; later calls quietly observe nothing.
    pub fn reattach<S>(&mut self, surface: &mut S) -> Result<usize, SurfaceError>
    where
        S: Surface + ?Sized,
    {
        self.detach_all(surface);
        if !self.is_active() {
            return Ok(0);
        }

        for item in 0..surface.item_count() {
            if let Err(err) = surface.observe_item(item) {
                self.supported = false;
                self.detach_all(surface);
                return Err(err);
            }
            self.observed.push(item);
        }
        Ok(self.observed.len())
    }

    pub fn detach_all<S>(&mut self, surface: &mut S)
    where
        S: Surface + ?Sized,
    {
        for item in self.observed.drain(..) {
            surface.unobserve_item(item);
        }
    }
}
