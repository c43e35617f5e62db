//! Splits an image into a quadtree of roughly uniform blocks.
//!
//! A region stays a single block once the summed per-channel variance of
//! its pixels is at most the tolerance; otherwise it is cut into four
//! quadrants which are examined in turn. The finished tree can be drawn
//! as a static mosaic or replayed as an animated build-up.

pub mod config;
pub mod logger;
pub mod node;

pub use node::*;
pub use node::buffer::{Color, PixelBuffer, Stats, StatsMode};
pub use node::error::{BufferError, DecomposeError, LoadError, RenderError};
