use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use clap::Parser;
use image::error::ImageError;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;

use quadtree_mosaic::animate::{self, AnimationOptions, Progress};
use quadtree_mosaic::config::{
	DEFAULT_FRAME_DELAY_MS, DEFAULT_NODES_PER_FRAME, DEFAULT_SCALE, LOG_ENV, OUTPUT_SUFFIX,
};
use quadtree_mosaic::render::{self, RenderOptions};
use quadtree_mosaic::{load, logger};
use quadtree_mosaic::{Decomposer, LoadError, QuadTree, RenderError, StatsMode, Tolerance};

/// Helper function for `main`.
fn error_exit(msg: &str, code: i32) -> ! {
	eprintln!("{}", msg);
	std::process::exit(code)
}

/// Splits an image into uniform blocks and draws the result.
#[derive(Parser)]
#[command(name = "quadtree_mosaic", author, version)]
#[command(about = "Decomposes an image into a variance-driven quadtree and renders it as a mosaic or an animated GIF.")]
struct Cli {
	/// Path to the image to load
	#[arg(short = 'f', long = "file", value_name = "PATH")]
	file: PathBuf,

	/// Maximum summed color variance tolerated in a block; smaller values give a finer mosaic
	#[arg(short = 'v', long = "var", value_name = "N", allow_negative_numbers = true)]
	var: i64,

	/// Integer scale factor for the output
	#[arg(short, long, default_value_t = DEFAULT_SCALE)]
	scale: u32,

	/// Outline every block
	#[arg(short = 'g', long)]
	show_grid: bool,

	/// Write an animated GIF of the tree being built instead of the final mosaic
	#[arg(short, long)]
	animate: bool,

	/// Output path; defaults to INPUT with a `_qtree` suffix and a .png or .gif extension
	#[arg(short, long, value_name = "PATH")]
	output: Option<PathBuf>,

	/// Use the faster one-pass variance estimate
	#[arg(long)]
	estimate: bool,

	/// Build the tree on all cores
	#[arg(long)]
	parallel: bool,

	/// Delay between animation frames in milliseconds
	#[arg(long, value_name = "MS", default_value_t = DEFAULT_FRAME_DELAY_MS)]
	delay: u32,

	/// Nodes drawn per animation frame
	#[arg(long, value_name = "N", default_value_t = DEFAULT_NODES_PER_FRAME)]
	nodes_per_frame: usize,

	/// Stop the animation after this many frames
	#[arg(long, value_name = "N")]
	max_frames: Option<usize>,

	/// Hide the progress bar
	#[arg(short, long)]
	quiet: bool,

	/// Log more; repeat for more detail
	#[arg(long, action = clap::ArgAction::Count)]
	verbose: u8,
}

fn verbosity(count: u8) -> Option<LevelFilter> {
	match count {
		0 => None,
		1 => Some(LevelFilter::Info),
		2 => Some(LevelFilter::Debug),
		_ => Some(LevelFilter::Trace),
	}
}

fn default_output(input: &Path, animate: bool) -> PathBuf {
	let stem = input.file_stem()
		.map(|s| s.to_string_lossy().into_owned())
		.unwrap_or_else(|| "output".to_string());
	let ext = if animate { "gif" } else { "png" };
	input.with_file_name(format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext))
}

fn load_exit_code(e: &LoadError) -> i32 {
	match e {
		LoadError::Image(ImageError::IoError(_)) => 3,
		LoadError::Image(ImageError::Decoding(_))
		| LoadError::Image(ImageError::Unsupported(_))
		| LoadError::UnsupportedMode(_)
		| LoadError::Buffer(_) => 4,
		LoadError::Image(ImageError::Limits(_)) => 5,
		_ => 10,
	}
}

fn render_exit_code(e: &RenderError) -> i32 {
	match e {
		RenderError::ZeroScale | RenderError::ZeroStep => 2,
		RenderError::CanvasTooLarge { .. } | RenderError::Image(ImageError::Limits(_)) => 5,
		RenderError::Io(_) | RenderError::Image(ImageError::IoError(_)) => 3,
		RenderError::Image(_) => 10,
	}
}

fn write_animation(
	cli: &Cli,
	tree: &QuadTree,
	render_opts: RenderOptions,
	output: &Path
) -> Result<Progress, RenderError> {
	let opts = AnimationOptions {
		render: render_opts,
		frame_delay_ms: cli.delay,
		nodes_per_frame: cli.nodes_per_frame,
	};
	let bar = if cli.quiet {
		ProgressBar::hidden()
	} else {
		ProgressBar::new(tree.node_count() as u64)
	};
	bar.set_style(ProgressStyle::default_bar()
		.template("{msg} [{bar:40.cyan/blue}] {percent}%")
		.unwrap_or_else(|_| ProgressStyle::default_bar()));
	bar.set_message("Drawing");

	let mut frames = 0usize;
	let result = animate::save_gif(tree, &opts, output, |progress| {
		bar.set_position(progress.drawn as u64);
		frames += 1;
		match cli.max_frames {
			Some(max) if frames >= max => ControlFlow::Break(()),
			_ => ControlFlow::Continue(()),
		}
	});
	bar.finish_and_clear();
	result
}

/// `clap`-based CLI around the decomposition.
///
/// May exit process with status code if there are errors:
///
/// 2: invalid arguments (`clap` itself also exits with 2)
///
/// 3: file I/O issues
///
/// 4: invalid or unsupported image data
///
/// 5: computation limits exceeded
///
/// 10: other, potentially unknown error
fn main() {
	let cli = Cli::parse();
	logger::init(verbosity(cli.verbose), LOG_ENV);

	let tolerance = match Tolerance::try_from(cli.var) {
		Ok(t) => t,
		Err(e) => error_exit(&format!("Error: {}", e), 2),
	};
	let buffer = match load::open(&cli.file) {
		Ok(b) => b,
		Err(e) => error_exit(&format!("Error: {}", e), load_exit_code(&e)),
	};

	let mode = if cli.estimate { StatsMode::OnePass } else { StatsMode::TwoPass };
	let tree = match Decomposer::new(tolerance)
		.stats_mode(mode)
		.parallel(cli.parallel)
		.decompose(&buffer) {
		Ok(t) => t,
		Err(e) => error_exit(&format!("Error: {}", e), 10),
	};
	println!("Number of quadtrees generated: {}", tree.node_count());
	log::info!("{} leaves, depth {}", tree.leaf_count(), tree.depth());

	let render_opts = RenderOptions::default()
		.scale(cli.scale)
		.show_grid(cli.show_grid);
	let output = cli.output.clone()
		.unwrap_or_else(|| default_output(&cli.file, cli.animate));

	let result = if cli.animate {
		write_animation(&cli, &tree, render_opts, &output).map(|progress| {
			if !progress.is_done() {
				eprintln!("Animation stopped at {}%", progress.percent());
			}
		})
	} else {
		render::save(&tree, &render_opts, &output)
	};
	if let Err(e) = result {
		error_exit(&format!("Error: {}", e), render_exit_code(&e));
	}
}
