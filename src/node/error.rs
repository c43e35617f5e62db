use thiserror::Error;

/// Reason why a `PixelBuffer` couldn't be built or queried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
	/// Width or height is zero.
	#[error("buffer dimensions must be positive, got {width}x{height}")]
	EmptyDimensions { width: u32, height: u32 },
	/// The pixel count doesn't match `width * height`.
	#[error("expected {expected} pixels for the given dimensions, got {actual}")]
	PixelCountMismatch { expected: u64, actual: u64 },
	/// A raw byte slice isn't a whole number of RGB triples.
	#[error("raw RGB data length {0} is not a multiple of 3")]
	RawLength(usize),
	/// A statistics rectangle reaches outside the buffer.
	#[error("region {x},{y} {width}x{height} lies outside a {buffer_width}x{buffer_height} buffer")]
	InvalidRegion {
		x: u32,
		y: u32,
		width: u32,
		height: u32,
		buffer_width: u32,
		buffer_height: u32,
	},
}

/// Reason why an image couldn't be decomposed into a quadtree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecomposeError {
	/// Tolerance below zero.
	#[error("tolerance must be non-negative, got {0}")]
	NegativeTolerance(i64),
	/// The statistics query failed; only possible for a root region
	/// outside the buffer.
	#[error(transparent)]
	Buffer(#[from] BufferError),
}

/// Reason why an image file couldn't be turned into a `PixelBuffer`.
#[derive(Debug, Error)]
pub enum LoadError {
	/// The file couldn't be opened or decoded.
	#[error("could not read image: {0}")]
	Image(#[from] image::ImageError),
	/// The decoded color type can't be normalized to RGB.
	#[error("unsupported image mode {0:?}")]
	UnsupportedMode(image::ColorType),
	/// Decoded data was rejected by the buffer.
	#[error(transparent)]
	Buffer(#[from] BufferError),
}

/// Reason why a quadtree couldn't be drawn or exported.
#[derive(Debug, Error)]
pub enum RenderError {
	/// Scale factor of zero.
	#[error("scale must be at least 1")]
	ZeroScale,
	/// Nodes per animation frame of zero.
	#[error("at least one node must be drawn per frame")]
	ZeroStep,
	/// The scaled canvas doesn't fit in `u32` pixel coordinates.
	#[error("a {width}x{height} region scaled by {scale} is too large to draw")]
	CanvasTooLarge { width: u32, height: u32, scale: u32 },
	/// Encoding or writing the output failed.
	#[error("could not write output: {0}")]
	Image(#[from] image::ImageError),
	/// Creating the output file failed.
	#[error("could not create output file: {0}")]
	Io(#[from] std::io::Error),
}
