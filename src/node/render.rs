use std::path::Path;

use image::RgbImage;

use super::buffer::Color;
use super::error::RenderError;
use super::{QuadTree, Rect};
use crate::config::{DEFAULT_SCALE, GRID_COLOR};

/// How blocks are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
	/// Every tree pixel becomes a `scale` by `scale` square.
	pub scale: u32,
	/// Color of a one-pixel outline around each block, if any.
	pub grid: Option<Color>,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self { scale: DEFAULT_SCALE, grid: None }
	}
}

impl RenderOptions {
	pub fn scale(mut self, scale: u32) -> Self {
		self.scale = scale;
		self
	}

	/// Turns the grey block outline on or off.
	pub fn show_grid(mut self, show: bool) -> Self {
		self.grid = if show { Some(GRID_COLOR) } else { None };
		self
	}
}

/// Allocates a black canvas covering `bounds` at the requested scale.
pub(crate) fn blank_canvas(bounds: Rect, opts: &RenderOptions) -> Result<RgbImage, RenderError> {
	if opts.scale == 0 {
		return Err(RenderError::ZeroScale);
	}
	let too_large = || RenderError::CanvasTooLarge {
		width: bounds.width,
		height: bounds.height,
		scale: opts.scale,
	};
	let width = bounds.width.checked_mul(opts.scale).ok_or_else(too_large)?;
	let height = bounds.height.checked_mul(opts.scale).ok_or_else(too_large)?;
	Ok(RgbImage::new(width, height))
}

/// Fills `rect` (in tree coordinates, relative to `origin`) with `color`
/// and outlines it if a grid is requested.
///
/// `rect` must lie inside the canvas created for `origin`.
pub(crate) fn draw_block(
	img: &mut RgbImage,
	origin: Rect,
	rect: Rect,
	color: Color,
	opts: &RenderOptions
) {
	if rect.is_empty() {
		return;
	}
	let scale = opts.scale;
	let (x0, y0) = ((rect.x - origin.x) * scale, (rect.y - origin.y) * scale);
	let (x1, y1) = (x0 + rect.width * scale, y0 + rect.height * scale);
	for y in y0..y1 {
		for x in x0..x1 {
			img.put_pixel(x, y, color);
		}
	}
	if let Some(grid) = opts.grid {
		for x in x0..x1 {
			img.put_pixel(x, y0, grid);
			img.put_pixel(x, y1 - 1, grid);
		}
		for y in y0..y1 {
			img.put_pixel(x0, y, grid);
			img.put_pixel(x1 - 1, y, grid);
		}
	}
}

/// Draws every leaf of the tree as a block of its average color.
pub fn render(tree: &QuadTree, opts: &RenderOptions) -> Result<RgbImage, RenderError> {
	let bounds = tree.bounds();
	let mut img = blank_canvas(bounds, opts)?;
	let mut drawn = 0usize;
	for leaf in tree.leaves() {
		draw_block(&mut img, bounds, leaf.rect(), leaf.color(), opts);
		drawn += 1;
	}
	log::debug!("rendered {} leaves onto a {}x{} canvas", drawn, img.width(), img.height());
	Ok(img)
}

/// Renders the tree and saves it; the format follows the file extension.
pub fn save<P: AsRef<Path>>(tree: &QuadTree, opts: &RenderOptions, path: P) -> Result<(), RenderError> {
	render(tree, opts)?.save(path.as_ref())?;
	log::info!("wrote mosaic to {}", path.as_ref().display());
	Ok(())
}
