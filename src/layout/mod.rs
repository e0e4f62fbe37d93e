//! Layout module orchestrator.
//!
//! The three leaf components of a layout pass live here: the breakpoint
//! resolver, the grid partitioner and the position calculator. None of them
//! touch the rendering surface directly; the session commits their output.

pub mod breakpoints;
mod core;
pub mod grid;

pub use breakpoints::{BreakpointTable, resolve};
pub use core::{ItemGeometry, LayoutResult, compute};
pub use grid::{Row, partition, row_count};
