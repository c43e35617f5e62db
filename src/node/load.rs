use std::path::Path;

use image::DynamicImage;

use super::buffer::PixelBuffer;
use super::error::LoadError;

/// Reads and decodes an image file into a `PixelBuffer`.
///
/// The format is guessed from the file contents and extension.
pub fn open<P: AsRef<Path>>(path: P) -> Result<PixelBuffer, LoadError> {
	let path = path.as_ref();
	let img = image::open(path)?;
	log::debug!("decoded {} as {}x{} {:?}", path.display(), img.width(), img.height(), img.color());
	from_dynamic(img)
}

/// Decodes an in-memory image file.
pub fn decode(data: &[u8]) -> Result<PixelBuffer, LoadError> {
	from_dynamic(image::load_from_memory(data)?)
}

/// Normalizes a decoded image to 8-bit RGB.
///
/// Monochrome images (luma, with or without alpha) are rejected. Alpha is
/// dropped and deeper channels are scaled down to 8 bits.
pub fn from_dynamic(img: DynamicImage) -> Result<PixelBuffer, LoadError> {
	let color = img.color();
	if !color.has_color() {
		return Err(LoadError::UnsupportedMode(color));
	}
	if color.has_alpha() {
		log::debug!("discarding alpha channel of {:?} image", color);
	}
	let rgb = match img {
		DynamicImage::ImageRgb8(rgb) => rgb,
		other => other.into_rgb8(),
	};
	Ok(PixelBuffer::try_from(&rgb)?)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rgba_loses_alpha() {
		let img = image::RgbaImage::from_fn(2, 1, |x, _| image::Rgba([x as u8 * 100, 7, 9, 3]));
		let buf = from_dynamic(DynamicImage::ImageRgba8(img)).unwrap();
		assert_eq!(buf.width(), 2);
		assert_eq!(buf.get(1, 0), Some(image::Rgb([100, 7, 9])));
	}

	#[test]
	fn monochrome_is_unsupported() {
		let img = image::GrayImage::new(3, 3);
		let err = from_dynamic(DynamicImage::ImageLuma8(img)).unwrap_err();
		assert!(matches!(err, LoadError::UnsupportedMode(image::ColorType::L8)));
	}

	#[test]
	fn garbage_fails_to_decode() {
		assert!(matches!(decode(b"not an image"), Err(LoadError::Image(_))));
	}

	#[test]
	fn missing_file_fails() {
		assert!(matches!(open("/nonexistent/quadtree.png"), Err(LoadError::Image(_))));
	}
}
