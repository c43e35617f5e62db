//! Defaults shared by the library option types and the CLI.

use crate::node::buffer::Color;

/// Regions at least this large are split across threads by a parallel
/// build; smaller ones aren't worth the scheduling.
pub const PARALLEL_MIN_AREA: u64 = 64 * 64;

/// Display scale when none is given.
pub const DEFAULT_SCALE: u32 = 1;

/// Outline color for the optional block grid.
pub const GRID_COLOR: Color = image::Rgb([128, 128, 128]);

/// Pause between animation frames, in milliseconds.
pub const DEFAULT_FRAME_DELAY_MS: u32 = 100;

/// Nodes drawn per animation frame.
pub const DEFAULT_NODES_PER_FRAME: usize = 1;

/// The final animation frame is held this many times longer.
pub const FINAL_FRAME_HOLD: u32 = 25;

/// Suffix for output files derived from the input path.
pub const OUTPUT_SUFFIX: &str = "_qtree";

/// Environment variable read for the log level when `--verbose` is absent.
pub const LOG_ENV: &str = "QTREE_LOG";
