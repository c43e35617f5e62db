use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::ControlFlow;
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, RgbImage};

use super::error::RenderError;
use super::render::{blank_canvas, draw_block, RenderOptions};
use super::walk::BreadthFirst;
use super::{QuadTree, Rect};
use crate::config::{DEFAULT_FRAME_DELAY_MS, DEFAULT_NODES_PER_FRAME, FINAL_FRAME_HOLD};

/// Settings for an animated build-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationOptions {
	pub render: RenderOptions,
	pub frame_delay_ms: u32,
	/// How many nodes are drawn between two frames.
	pub nodes_per_frame: usize,
}

impl Default for AnimationOptions {
	fn default() -> Self {
		Self {
			render: RenderOptions::default(),
			frame_delay_ms: DEFAULT_FRAME_DELAY_MS,
			nodes_per_frame: DEFAULT_NODES_PER_FRAME,
		}
	}
}

/// How far an animation has got.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
	pub drawn: usize,
	pub total: usize,
}

impl Progress {
	/// Whole percent drawn, rounded down.
	pub fn percent(&self) -> u8 {
		if self.total == 0 {
			return 100;
		}
		(self.drawn.min(self.total) * 100 / self.total) as u8
	}

	pub fn is_done(&self) -> bool {
		self.drawn >= self.total
	}
}

/// Replays a tree in breadth-first order, drawing one node per step.
///
/// Branches are drawn too, in their average color, and get painted
/// over by their children later on; once every node is drawn the canvas
/// is identical to `render::render`.
pub struct BuildUp<'a> {
	nodes: BreadthFirst<'a>,
	canvas: RgbImage,
	origin: Rect,
	opts: RenderOptions,
	drawn: usize,
	total: usize,
}

impl<'a> BuildUp<'a> {
	pub fn new(tree: &'a QuadTree, opts: RenderOptions) -> Result<Self, RenderError> {
		let origin = tree.bounds();
		Ok(Self {
			nodes: tree.breadth_first(),
			canvas: blank_canvas(origin, &opts)?,
			origin,
			opts,
			drawn: 0,
			total: tree.node_count(),
		})
	}

	/// Draws the next node. Returns `None` once everything is drawn.
	pub fn step(&mut self) -> Option<Progress> {
		let node = self.nodes.next()?;
		draw_block(&mut self.canvas, self.origin, node.rect(), node.color(), &self.opts);
		self.drawn += 1;
		Some(self.progress())
	}

	/// Draws up to `count` nodes. Returns `None` if there was nothing
	/// left to draw.
	pub fn advance(&mut self, count: usize) -> Option<Progress> {
		let mut last = None;
		for _ in 0..count {
			match self.step() {
				Some(p) => last = Some(p),
				None => break,
			}
		}
		last
	}

	pub fn canvas(&self) -> &RgbImage {
		&self.canvas
	}

	pub fn progress(&self) -> Progress {
		Progress { drawn: self.drawn, total: self.total }
	}
}

fn to_frame(canvas: &RgbImage, delay: Delay) -> Frame {
	Frame::from_parts(DynamicImage::ImageRgb8(canvas.clone()).into_rgba8(), 0, 0, delay)
}

/// Encodes the build-up as a looping GIF, one frame per
/// `nodes_per_frame` nodes, and holds the last frame a while longer.
///
/// `on_frame` is called after each frame with the progress so far;
/// returning `ControlFlow::Break` stops the animation early. The returned
/// progress tells how far it got.
pub fn write_gif<W, F>(
	tree: &QuadTree,
	opts: &AnimationOptions,
	writer: W,
	mut on_frame: F
) -> Result<Progress, RenderError>
where
	W: Write,
	F: FnMut(Progress) -> ControlFlow<()>,
{
	if opts.nodes_per_frame == 0 {
		return Err(RenderError::ZeroStep);
	}
	let mut build = BuildUp::new(tree, opts.render)?;
	let mut encoder = GifEncoder::new(writer);
	encoder.set_repeat(Repeat::Infinite)?;
	let delay = Delay::from_numer_denom_ms(opts.frame_delay_ms, 1);

	let mut frames = 0usize;
	while let Some(progress) = build.advance(opts.nodes_per_frame) {
		encoder.encode_frame(to_frame(build.canvas(), delay))?;
		frames += 1;
		log::trace!("frame {}: {}/{} nodes", frames, progress.drawn, progress.total);
		if on_frame(progress).is_break() {
			log::info!("animation stopped at {}%", progress.percent());
			break;
		}
	}

	let hold = Delay::from_numer_denom_ms(opts.frame_delay_ms.saturating_mul(FINAL_FRAME_HOLD), 1);
	encoder.encode_frame(to_frame(build.canvas(), hold))?;
	drop(encoder);

	log::debug!("encoded {} frames", frames + 1);
	Ok(build.progress())
}

/// Writes the build-up GIF to `path`. See `write_gif`.
pub fn save_gif<P, F>(
	tree: &QuadTree,
	opts: &AnimationOptions,
	path: P,
	on_frame: F
) -> Result<Progress, RenderError>
where
	P: AsRef<Path>,
	F: FnMut(Progress) -> ControlFlow<()>,
{
	let mut file = BufWriter::new(File::create(path.as_ref())?);
	let progress = write_gif(tree, opts, &mut file, on_frame)?;
	file.flush()?;
	log::info!("wrote animation to {}", path.as_ref().display());
	Ok(progress)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::node::buffer::PixelBuffer;
	use crate::node::render::render;
	use crate::node::decompose;

	fn checker_tree() -> QuadTree {
		let buf = PixelBuffer::from_fn(4, 4, |x, y| {
			if (x + y) % 2 == 0 { image::Rgb([255, 255, 255]) } else { image::Rgb([0, 0, 0]) }
		}).unwrap();
		decompose(&buf, 0, 0, 4, 4, 0).unwrap()
	}

	#[test]
	fn percent_rounds_down() {
		assert_eq!(Progress { drawn: 1, total: 3 }.percent(), 33);
		assert_eq!(Progress { drawn: 3, total: 3 }.percent(), 100);
		assert_eq!(Progress { drawn: 0, total: 0 }.percent(), 100);
	}

	#[test]
	fn build_up_ends_on_the_mosaic() {
		let tree = checker_tree();
		for grid in [false, true] {
			let opts = RenderOptions::default().scale(3).show_grid(grid);
			let mut build = BuildUp::new(&tree, opts).unwrap();
			let first = build.step().unwrap();
			assert_eq!(first, Progress { drawn: 1, total: tree.node_count() });
			let mut last = first;
			while let Some(p) = build.step() {
				last = p;
			}
			assert!(last.is_done());
			assert_eq!(build.canvas(), &render(&tree, &opts).unwrap());
		}
	}

	#[test]
	fn advance_batches_nodes() {
		let tree = checker_tree();
		// Root, 4 quadrants, 16 pixels.
		assert_eq!(tree.node_count(), 21);
		let mut build = BuildUp::new(&tree, RenderOptions::default()).unwrap();
		assert_eq!(build.advance(10).unwrap().drawn, 10);
		assert_eq!(build.advance(100).unwrap().drawn, 21);
		assert_eq!(build.advance(1), None);
	}

	#[test]
	fn gif_can_be_stopped() {
		let tree = checker_tree();
		let mut out = Vec::new();
		let mut seen = 0;
		let progress = write_gif(&tree, &AnimationOptions::default(), &mut out, |_| {
			seen += 1;
			if seen == 2 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
		}).unwrap();
		assert_eq!(progress.drawn, 2);
		assert!(!progress.is_done());
		assert_eq!(&out[..3], b"GIF");
	}

	#[test]
	fn zero_nodes_per_frame_is_rejected() {
		let opts = AnimationOptions { nodes_per_frame: 0, ..Default::default() };
		let err = write_gif(&checker_tree(), &opts, Vec::new(), |_| ControlFlow::Continue(()));
		assert!(matches!(err, Err(RenderError::ZeroStep)));
	}
}
