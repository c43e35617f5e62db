use super::error::BufferError;
use super::Rect;

/// A single RGB pixel.
pub type Color = image::Rgb<u8>;

/// How the variance of a region is computed.
///
/// Both modes produce the same truncated average. Their variances can
/// differ by a small amount because `OnePass` subtracts the square of the
/// already-truncated average from the truncated mean of squares, so
/// `TwoPass` is the reference and `OnePass` is an opt-in estimate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StatsMode {
	/// Mean first, then the mean of squared deviations from it.
	#[default]
	TwoPass,
	/// Sum and sum of squares in a single traversal; `E[x²] - E[x]²`.
	OnePass,
}

/// Average color and per-channel population variance of a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stats {
	pub average: Color,
	pub variance: [u64; 3],
}

impl Stats {
	/// Sum of the three channel variances; this is what the tolerance
	/// is compared against.
	pub fn total_variance(&self) -> u64 {
		self.variance.iter().sum()
	}
}

/// Decoded, immutable RGB image data in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
	width: u32,
	height: u32,
	pixels: Vec<Color>,
}

impl PixelBuffer {
	/// Wraps a row-major list of pixels.
	///
	/// Fails if either dimension is zero or if `pixels` doesn't hold
	/// exactly `width * height` entries.
	pub fn new(pixels: Vec<Color>, width: u32, height: u32) -> Result<Self, BufferError> {
		if width == 0 || height == 0 {
			return Err(BufferError::EmptyDimensions { width, height });
		}
		let expected = width as u64 * height as u64;
		if pixels.len() as u64 != expected {
			return Err(BufferError::PixelCountMismatch {
				expected,
				actual: pixels.len() as u64,
			});
		}
		Ok(Self { width, height, pixels })
	}

	/// Builds a buffer from packed `RGBRGB...` bytes.
	pub fn from_raw(width: u32, height: u32, raw: &[u8]) -> Result<Self, BufferError> {
		if raw.len() % 3 != 0 {
			return Err(BufferError::RawLength(raw.len()));
		}
		let pixels = raw.chunks_exact(3)
			.map(|c| image::Rgb([c[0], c[1], c[2]]))
			.collect();
		Self::new(pixels, width, height)
	}

	/// Builds a buffer by evaluating `f(x, y)` for every pixel.
	pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self, BufferError>
	where
		F: FnMut(u32, u32) -> Color,
	{
		let pixels = (0..height)
			.flat_map(|y| (0..width).map(move |x| (x, y)))
			.map(|(x, y)| f(x, y))
			.collect();
		Self::new(pixels, width, height)
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	pub fn pixels(&self) -> &[Color] {
		&self.pixels
	}

	/// The rectangle covering the whole buffer.
	pub fn bounds(&self) -> Rect {
		Rect::new(0, 0, self.width, self.height)
	}

	pub fn get(&self, x: u32, y: u32) -> Option<Color> {
		if x >= self.width || y >= self.height {
			return None;
		}
		self.pixels.get(y as usize * self.width as usize + x as usize).copied()
	}

	/// Succeeds if `rect` lies entirely inside the buffer.
	///
	/// Zero-area rectangles are accepted as long as their origin is
	/// within (or on the far edge of) the buffer.
	pub fn check_region(&self, rect: Rect) -> Result<(), BufferError> {
		let fits = |start: u32, len: u32, limit: u32| start.checked_add(len)
			.map_or(false, |end| end <= limit);
		if fits(rect.x, rect.width, self.width) && fits(rect.y, rect.height, self.height) {
			Ok(())
		} else {
			Err(BufferError::InvalidRegion {
				x: rect.x,
				y: rect.y,
				width: rect.width,
				height: rect.height,
				buffer_width: self.width,
				buffer_height: self.height,
			})
		}
	}

	/// Average color and variance of the pixels inside `rect`.
	///
	/// All arithmetic is integer and truncating. An empty rectangle counts
	/// as one pixel, which makes both results zero.
	pub fn stats(&self, rect: Rect, mode: StatsMode) -> Result<Stats, BufferError> {
		self.check_region(rect)?;
		Ok(match mode {
			StatsMode::TwoPass => self.stats_two_pass(rect),
			StatsMode::OnePass => self.stats_one_pass(rect),
		})
	}

	fn stats_two_pass(&self, rect: Rect) -> Stats {
		let count = rect.area().max(1);
		let mut sums = [0u64; 3];
		for px in self.region_pixels(rect) {
			for (sum, &c) in sums.iter_mut().zip(px.0.iter()) {
				*sum += c as u64;
			}
		}
		let average = sums.map(|s| s / count);

		let mut squares = [0u64; 3];
		for px in self.region_pixels(rect) {
			for ch in 0..3 {
				let dev = px.0[ch] as i64 - average[ch] as i64;
				squares[ch] += (dev * dev) as u64;
			}
		}

		Stats {
			average: to_color(average),
			variance: squares.map(|s| s / count),
		}
	}

	fn stats_one_pass(&self, rect: Rect) -> Stats {
		let count = rect.area().max(1);
		let mut sums = [0u64; 3];
		let mut squares = [0u64; 3];
		for px in self.region_pixels(rect) {
			for ch in 0..3 {
				let c = px.0[ch] as u64;
				sums[ch] += c;
				squares[ch] += c * c;
			}
		}
		let average = sums.map(|s| s / count);
		let mut variance = [0u64; 3];
		for ch in 0..3 {
			// floor(Σx²/n) >= floor(Σx/n)², so this never underflows.
			variance[ch] = squares[ch] / count - average[ch] * average[ch];
		}

		Stats { average: to_color(average), variance }
	}

	/// Pixels of an already bounds-checked region, row by row.
	fn region_pixels(&self, rect: Rect) -> impl Iterator<Item = &Color> + '_ {
		let stride = self.width as usize;
		(rect.y..rect.y + rect.height).flat_map(move |row| {
			let start = row as usize * stride + rect.x as usize;
			self.pixels[start..start + rect.width as usize].iter()
		})
	}
}

impl TryFrom<&image::RgbImage> for PixelBuffer {
	type Error = BufferError;

	fn try_from(img: &image::RgbImage) -> Result<Self, Self::Error> {
		Self::new(img.pixels().copied().collect(), img.width(), img.height())
	}
}

fn to_color(average: [u64; 3]) -> Color {
	image::Rgb([average[0] as u8, average[1] as u8, average[2] as u8])
}
