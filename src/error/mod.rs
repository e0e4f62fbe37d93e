//! Error module orchestrator.
//!
//! Public error types live in the private `types` module and are re-exported
//! here so call sites can write `masonry_layout::error::Result`.

mod types;

pub use types::{MasonryError, Result};
