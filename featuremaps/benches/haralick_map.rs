use std::hint::black_box;
use std::num::NonZeroUsize;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;

use featuremaps::{edge_map_extraction, haralick_map_extraction, EdgeDetector};
use featuremaps::{EdgeMapConfig, HaralickMapConfig};

fn textured_image(height: usize, width: usize) -> Array2<u16> {
    Array2::from_shape_fn((height, width), |(y, x)| ((y * 37 + x * 11 + x * y) % 64) as u16)
}

fn bench_haralick_map(c: &mut Criterion) {
    let image = textured_image(64, 64);
    let mut group = c.benchmark_group("haralick_map");
    group.sample_size(10);

    for workers in [1, 4] {
        let config = HaralickMapConfig {
            win_size: Some(vec![7, 7]),
            n_gray_levels: Some(16.0),
            workers: NonZeroUsize::new(workers),
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("workers", workers), &config, |b, config| {
            b.iter(|| black_box(haralick_map_extraction(&image, config)))
        });
    }
    group.finish();
}

fn bench_edge_maps(c: &mut Criterion) {
    let image = textured_image(128, 128);
    let mut group = c.benchmark_group("edge_map");
    group.sample_size(10);

    for detector in [EdgeDetector::Sobel1stDev, EdgeDetector::GaborBank, EdgeDetector::PhaseCong] {
        let config = EdgeMapConfig::new(detector);
        group.bench_function(detector.to_string(), |b| {
            b.iter(|| black_box(edge_map_extraction(&image, &config)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_haralick_map, bench_edge_maps);
criterion_main!(benches);
