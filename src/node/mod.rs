pub mod animate;
pub mod buffer;
pub mod error;
pub mod load;
pub mod render;
pub mod walk;

use buffer::{Color, PixelBuffer, StatsMode};
use error::{BufferError, DecomposeError};

use crate::config::PARALLEL_MIN_AREA;

/// Axis-aligned rectangle in pixel coordinates.
///
/// Width and height may be zero; splitting a one-pixel-wide region
/// produces empty quadrants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
	pub x: u32,
	pub y: u32,
	pub width: u32,
	pub height: u32,
}

impl Rect {
	pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
		Self { x, y, width, height }
	}

	pub fn area(&self) -> u64 {
		self.width as u64 * self.height as u64
	}

	pub fn is_empty(&self) -> bool {
		self.width == 0 || self.height == 0
	}

	/// Splits into top-left, top-right, bottom-left and bottom-right, in
	/// that order.
	///
	/// The left column and top row get the floor of half the size; the
	/// right column and bottom row absorb any odd remainder, so the four
	/// parts tile `self` exactly.
	pub fn quadrants(&self) -> [Rect; 4] {
		let (top_width, top_height) = (self.width / 2, self.height / 2);
		let (low_width, low_height) = (self.width - top_width, self.height - top_height);
		let (mid_x, mid_y) = (self.x + top_width, self.y + top_height);
		[
			Rect::new(self.x, self.y, top_width, top_height),
			Rect::new(mid_x, self.y, low_width, top_height),
			Rect::new(self.x, mid_y, top_width, low_height),
			Rect::new(mid_x, mid_y, low_width, low_height),
		]
	}
}

/// Upper bound on a region's summed channel variance for it to stay a
/// single block. Always non-negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tolerance(u64);

impl Tolerance {
	pub const fn new(value: u64) -> Self {
		Self(value)
	}

	pub const fn get(self) -> u64 {
		self.0
	}
}

impl TryFrom<i64> for Tolerance {
	type Error = DecomposeError;

	fn try_from(value: i64) -> Result<Self, Self::Error> {
		u64::try_from(value)
			.map(Self)
			.map_err(|_| DecomposeError::NegativeTolerance(value))
	}
}

/// Node in a quadtree describing an image.
///
/// Every node carries the average color of its rectangle, so a renderer
/// can stop descending at any level and still draw something meaningful.
/// A branch always has exactly four children (see `Rect::quadrants` for
/// their order and geometry).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuadNode {
	Leaf {
		rect: Rect,
		color: Color,
	},
	Branch {
		rect: Rect,
		color: Color,
		children: Box<[QuadNode; 4]>,
	},
}

impl QuadNode {
	pub fn rect(&self) -> Rect {
		match self {
			QuadNode::Leaf { rect, .. } | QuadNode::Branch { rect, .. } => *rect,
		}
	}

	pub fn color(&self) -> Color {
		match self {
			QuadNode::Leaf { color, .. } | QuadNode::Branch { color, .. } => *color,
		}
	}

	pub fn children(&self) -> Option<&[QuadNode; 4]> {
		match self {
			QuadNode::Leaf { .. } => None,
			QuadNode::Branch { children, .. } => Some(children),
		}
	}

	pub fn is_leaf(&self) -> bool {
		matches!(self, QuadNode::Leaf { .. })
	}
}

/// A finished decomposition: the root node plus what it took to build it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuadTree {
	root: QuadNode,
	node_count: usize,
	tolerance: Tolerance,
	mode: StatsMode,
}

impl QuadTree {
	pub fn root(&self) -> &QuadNode {
		&self.root
	}

	/// Total number of nodes created during this build, branches included.
	pub fn node_count(&self) -> usize {
		self.node_count
	}

	pub fn tolerance(&self) -> Tolerance {
		self.tolerance
	}

	pub fn stats_mode(&self) -> StatsMode {
		self.mode
	}

	/// The rectangle the whole tree covers.
	pub fn bounds(&self) -> Rect {
		self.root.rect()
	}
}

/// Settings for turning a `PixelBuffer` into a `QuadTree`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decomposer {
	tolerance: Tolerance,
	mode: StatsMode,
	parallel: bool,
}

impl Decomposer {
	pub fn new(tolerance: Tolerance) -> Self {
		Self { tolerance, ..Default::default() }
	}

	/// Selects how region variance is computed. Defaults to
	/// `StatsMode::TwoPass`.
	pub fn stats_mode(mut self, mode: StatsMode) -> Self {
		self.mode = mode;
		self
	}

	/// Builds large sibling subtrees on the rayon thread pool. The
	/// resulting tree is identical to a sequential build.
	pub fn parallel(mut self, parallel: bool) -> Self {
		self.parallel = parallel;
		self
	}

	/// Decomposes the whole buffer.
	pub fn decompose(&self, buffer: &PixelBuffer) -> Result<QuadTree, DecomposeError> {
		self.decompose_region(buffer, buffer.bounds())
	}

	/// Decomposes `region` of the buffer.
	///
	/// A region that reaches outside the buffer is rejected before any
	/// node is created; past that point the build cannot fail.
	pub fn decompose_region(
		&self,
		buffer: &PixelBuffer,
		region: Rect
	) -> Result<QuadTree, DecomposeError> {
		buffer.check_region(region)?;
		let (root, node_count) = self.build(buffer, region)?;
		log::debug!(
			"built quadtree over {}x{} at ({}, {}): {} nodes, tolerance {}, {:?}{}",
			region.width,
			region.height,
			region.x,
			region.y,
			node_count,
			self.tolerance.get(),
			self.mode,
			if self.parallel { ", parallel" } else { "" }
		);
		Ok(QuadTree { root, node_count, tolerance: self.tolerance, mode: self.mode })
	}

	/// Builds the subtree for `rect` and returns it with its node count.
	fn build(&self, buffer: &PixelBuffer, rect: Rect) -> Result<(QuadNode, usize), BufferError> {
		let stats = buffer.stats(rect, self.mode)?;
		let color = stats.average;
		if stats.total_variance() <= self.tolerance.get() {
			return Ok((QuadNode::Leaf { rect, color }, 1));
		}

		let [tl, tr, bl, br] = rect.quadrants();
		let (tl, tr, bl, br) = if self.parallel && rect.area() >= PARALLEL_MIN_AREA {
			let ((tl, tr), (bl, br)) = rayon::join(
				|| rayon::join(|| self.build(buffer, tl), || self.build(buffer, tr)),
				|| rayon::join(|| self.build(buffer, bl), || self.build(buffer, br)),
			);
			(tl?, tr?, bl?, br?)
		} else {
			(
				self.build(buffer, tl)?,
				self.build(buffer, tr)?,
				self.build(buffer, bl)?,
				self.build(buffer, br)?,
			)
		};

		let node_count = 1 + tl.1 + tr.1 + bl.1 + br.1;
		let children = Box::new([tl.0, tr.0, bl.0, br.0]);
		Ok((QuadNode::Branch { rect, color, children }, node_count))
	}
}

/// Decomposes the `width` by `height` region at (`x`, `y`) with the
/// reference statistics.
///
/// Fails if `tolerance` is negative or the region isn't inside `buffer`.
pub fn decompose(
	buffer: &PixelBuffer,
	x: u32,
	y: u32,
	width: u32,
	height: u32,
	tolerance: i64
) -> Result<QuadTree, DecomposeError> {
	Decomposer::new(Tolerance::try_from(tolerance)?)
		.decompose_region(buffer, Rect::new(x, y, width, height))
}
