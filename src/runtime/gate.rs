//! One-shot "all images settled" signal.
//!
//! An image settles when it finishes loading or fails to load. The gate is
//! armed from a snapshot of the container's images; anything already settled
//! at that point counts immediately, and so does an image with no source,
//! since it will never emit a load or error event. The gate releases exactly
//! once, when the last outstanding image settles.

use std::collections::BTreeSet;

use crate::surface::{ImageId, ImageInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    /// Images still outstanding.
    Pending(usize),
    /// This call released the gate.
    Released,
    /// The gate was released by an earlier call.
    AlreadyReleased,
}

#[derive(Debug, Clone)]
pub struct ImageGate {
    total: usize,
    watched: Vec<ImageId>,
    outstanding: BTreeSet<ImageId>,
    released: bool,
}

impl ImageGate {
    pub fn arm(images: &[ImageInfo]) -> Self {
        let outstanding: BTreeSet<ImageId> = images
            .iter()
            .filter(|image| image.source.is_some() && !image.state.is_settled())
            .map(|image| image.id)
            .collect();
        Self {
            total: images.len(),
            watched: outstanding.iter().copied().collect(),
            outstanding,
            released: false,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Images that were pending at arm time and need load/error listeners.
    pub fn watched(&self) -> &[ImageId] {
        &self.watched
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Release now if nothing is outstanding.
    pub fn release_if_ready(&mut self) -> GateStatus {
        if self.released {
            GateStatus::AlreadyReleased
        } else if self.outstanding.is_empty() {
            self.released = true;
            GateStatus::Released
        } else {
            GateStatus::Pending(self.outstanding.len())
        }
    }

    /// Record that `image` loaded or errored. Unknown or repeated images do
    /// not count twice.
    pub fn settle(&mut self, image: ImageId) -> GateStatus {
        self.outstanding.remove(&image);
        self.release_if_ready()
    }
}
