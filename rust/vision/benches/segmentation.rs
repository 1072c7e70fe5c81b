// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Benchmark for color-clustering room segmentation and rectangle merging.
//!
//! Run with: cargo bench -p sketchplan-vision --bench segmentation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{Rgb, RgbImage};
use sketchplan_vision::{
    merge_rectangles, segment_regions, BoundingBox, MergeStrategy, RoomCandidate,
    SegmentationConfig,
};

/// Sketch with a grid of tinted rooms separated by dark walls
fn tinted_grid(width: u32, height: u32, cols: u32, rows: u32) -> RgbImage {
    let palette = [[240, 200, 200], [200, 240, 200], [200, 200, 240], [240, 240, 200]];
    let cell_w = width / cols;
    let cell_h = height / rows;

    RgbImage::from_fn(width, height, |x, y| {
        if x % cell_w < 4 || y % cell_h < 4 {
            return Rgb([20, 20, 20]);
        }
        let cell = ((x / cell_w) + (y / cell_h) * cols) as usize;
        Rgb(palette[cell % palette.len()])
    })
}

fn scattered_rectangles(count: u32) -> Vec<RoomCandidate> {
    (0..count)
        .map(|i| {
            let x = (i * 37) % 1900;
            let y = (i * 53) % 1400;
            RoomCandidate::new(BoundingBox::new(x, y, 40 + i % 60, 30 + i % 45))
        })
        .collect()
}

fn bench_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment_regions");
    group.sample_size(10);

    for &(width, height) in &[(400u32, 300u32), (800, 600), (1600, 1200)] {
        let image = tinted_grid(width, height, 4, 3);
        let label = format!("{}x{}", width, height);

        group.throughput(Throughput::Elements(width as u64 * height as u64));
        group.bench_with_input(BenchmarkId::new("kmeans_k4", &label), &image, |b, image| {
            b.iter(|| segment_regions(black_box(image), &SegmentationConfig::default()))
        });
    }

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_rectangles");

    for &count in &[50u32, 200, 800] {
        let rects = scattered_rectangles(count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("first_match", count), &rects, |b, rects| {
            b.iter(|| merge_rectangles(black_box(rects.clone()), MergeStrategy::FirstMatch))
        });
        group.bench_with_input(BenchmarkId::new("connected_components", count), &rects, |b, rects| {
            b.iter(|| merge_rectangles(black_box(rects.clone()), MergeStrategy::ConnectedComponents))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_segmentation, bench_merge);
criterion_main!(benches);
