//! Decomposition cost for the two statistics modes, sequential and parallel

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use quadtree_mosaic::{Decomposer, PixelBuffer, StatsMode, Tolerance};

/// Smooth gradient with a sharp diagonal edge; enough structure for a
/// tree of mixed depth.
fn gradient(size: u32) -> PixelBuffer {
	PixelBuffer::from_fn(size, size, |x, y| {
		let edge = if x > y { 120 } else { 0 };
		image::Rgb([(x * 255 / size) as u8, (y * 255 / size) as u8, edge])
	}).expect("benchmark image")
}

fn bench_decompose(c: &mut Criterion) {
	let mut group = c.benchmark_group("decompose");
	let buffer = gradient(512);

	for (name, mode, parallel) in [
		("two_pass", StatsMode::TwoPass, false),
		("one_pass", StatsMode::OnePass, false),
		("two_pass_parallel", StatsMode::TwoPass, true),
	] {
		for tolerance in [0u64, 100, 1000] {
			let decomposer = Decomposer::new(Tolerance::new(tolerance))
				.stats_mode(mode)
				.parallel(parallel);
			group.bench_with_input(BenchmarkId::new(name, tolerance), &decomposer, |b, d| {
				b.iter(|| d.decompose(black_box(&buffer)));
			});
		}
	}
	group.finish();
}

criterion_group!(benches, bench_decompose);
criterion_main!(benches);
