//! End-to-end runs from an image file on disk to a mosaic or animation

use std::ops::ControlFlow;

use quadtree_mosaic::animate::{self, AnimationOptions};
use quadtree_mosaic::render::{self, RenderOptions};
use quadtree_mosaic::{load, Decomposer, LoadError, Tolerance};

fn quadrant_image() -> image::RgbImage {
	image::RgbImage::from_fn(6, 6, |x, y| match (x < 3, y < 3) {
		(true, true) => image::Rgb([250, 10, 10]),
		(false, true) => image::Rgb([10, 250, 10]),
		(true, false) => image::Rgb([10, 10, 250]),
		(false, false) => image::Rgb([240, 240, 240]),
	})
}

#[test]
fn png_round_trip_through_mosaic() {
	let dir = tempfile::tempdir().unwrap();
	let input = dir.path().join("quadrants.png");
	quadrant_image().save(&input).unwrap();

	let buffer = load::open(&input).unwrap();
	assert_eq!((buffer.width(), buffer.height()), (6, 6));
	let tree = Decomposer::new(Tolerance::new(0)).decompose(&buffer).unwrap();
	assert_eq!(tree.node_count(), 5);

	let output = dir.path().join("quadrants_qtree.png");
	render::save(&tree, &RenderOptions::default().scale(2), &output).unwrap();
	let mosaic = image::open(&output).unwrap().into_rgb8();
	assert_eq!(mosaic.dimensions(), (12, 12));
	assert_eq!(*mosaic.get_pixel(0, 0), image::Rgb([250, 10, 10]));
	assert_eq!(*mosaic.get_pixel(11, 0), image::Rgb([10, 250, 10]));
	assert_eq!(*mosaic.get_pixel(0, 11), image::Rgb([10, 10, 250]));
	assert_eq!(*mosaic.get_pixel(11, 11), image::Rgb([240, 240, 240]));
}

#[test]
fn gif_has_a_frame_per_node() {
	use image::AnimationDecoder;

	let dir = tempfile::tempdir().unwrap();
	let buffer = quadtree_mosaic::PixelBuffer::try_from(&quadrant_image()).unwrap();
	let tree = Decomposer::new(Tolerance::new(0)).decompose(&buffer).unwrap();

	let output = dir.path().join("build.gif");
	let mut reported = Vec::new();
	let progress = animate::save_gif(&tree, &AnimationOptions::default(), &output, |p| {
		reported.push(p.percent());
		ControlFlow::Continue(())
	}).unwrap();
	assert!(progress.is_done());
	assert_eq!(reported, vec![20, 40, 60, 80, 100]);

	let file = std::io::BufReader::new(std::fs::File::open(&output).unwrap());
	let frames = image::codecs::gif::GifDecoder::new(file)
		.unwrap()
		.into_frames()
		.collect_frames()
		.unwrap();
	// One per node plus the held final frame.
	assert_eq!(frames.len(), tree.node_count() + 1);
	assert_eq!(frames[0].buffer().dimensions(), (6, 6));
}

#[test]
fn grayscale_file_is_rejected() {
	let dir = tempfile::tempdir().unwrap();
	let input = dir.path().join("gray.png");
	image::GrayImage::from_pixel(4, 4, image::Luma([128])).save(&input).unwrap();
	assert!(matches!(load::open(&input), Err(LoadError::UnsupportedMode(_))));
}
