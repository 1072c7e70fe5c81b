// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Walk a synthetic sketch through every recognition stage
//!
//! Run with: cargo run -p sketchplan-vision --example synthetic_sketch

use image::{Rgb, RgbImage};
use sketchplan_vision::{
    detect_openings, detect_plot_boundary, detect_wall_lines, normalize_layout, resolve_scale,
    segment_regions, CalibrationInput, PipelineConfig,
};

fn main() {
    println!("=== Sketch Recognition Pipeline ===\n");

    let image = create_synthetic_sketch();
    let config = PipelineConfig::default();
    println!("Image size: {}x{}\n", image.width(), image.height());

    println!("Stage 1: Plot boundary...");
    let plot = match detect_plot_boundary(&image, &config.boundary) {
        Ok(plot) => plot,
        Err(e) => {
            println!("  ✗ {} ({})", e, e.kind());
            return;
        }
    };
    println!(
        "  bbox: [{}, {}, {}, {}], {} vertices, area {} px²\n",
        plot.bbox.x,
        plot.bbox.y,
        plot.bbox.width,
        plot.bbox.height,
        plot.polygon.len(),
        plot.area_px
    );

    println!("Stage 2: Wall lines...");
    let lines = detect_wall_lines(&image, &config.lines);
    println!("  {} segments", lines.len());
    for line in lines.iter().take(8) {
        println!(
            "    ({}, {}) -> ({}, {})  length={:.1}px",
            line.x1,
            line.y1,
            line.x2,
            line.y2,
            line.length()
        );
    }
    println!();

    println!("Stage 3: Openings...");
    let openings = detect_openings(&image, &config.openings);
    println!("  {} openings", openings.len());
    for o in &openings {
        println!("    x={} y={} w={} h={}", o.x, o.y, o.w, o.h);
    }
    println!();

    println!("Stage 4: Candidate rooms (k = {})...", config.segmentation.clusters);
    let rooms = segment_regions(&image, &config.segmentation);
    for (i, room) in rooms.iter().enumerate() {
        println!(
            "    #{}: [{}, {}, {}, {}] area={} px²",
            i + 1,
            room.bbox.x,
            room.bbox.y,
            room.bbox.width,
            room.bbox.height,
            room.area_px
        );
    }
    println!();

    println!("Stage 5: Calibration and normalization...");
    let calibration = CalibrationInput {
        plot_width_m: Some(15.0),
        ..Default::default()
    };
    let Some(scale) = resolve_scale(&plot.bbox, &calibration) else {
        println!("  ✗ no usable calibration input");
        return;
    };
    println!("  {:.5} m/px from {:?}", scale.meters_per_px, scale.source);

    for room in normalize_layout(&rooms, &plot.bbox, &scale) {
        println!(
            "    {}: at ({:.2}, {:.2}) m, {:.2} x {:.2} m = {:.2} m²",
            room.name, room.x_m, room.y_m, room.w_m, room.h_m, room.area_m2
        );
    }

    println!("\n=== Pipeline Complete ===");
}

/// Two tinted rooms inside a thick outline, with a doorway in the divider
fn create_synthetic_sketch() -> RgbImage {
    let width = 600;
    let height = 400;
    let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    let margin = 40;
    let wall = 6;

    // Room fills
    fill(&mut img, margin, margin, 300, height - margin, [250, 228, 196]);
    fill(&mut img, 300, margin, width - margin, height - margin, [205, 226, 250]);

    // Outer walls
    fill(&mut img, margin, margin, width - margin, margin + wall, [0, 0, 0]);
    fill(&mut img, margin, height - margin - wall, width - margin, height - margin, [0, 0, 0]);
    fill(&mut img, margin, margin, margin + wall, height - margin, [0, 0, 0]);
    fill(&mut img, width - margin - wall, margin, width - margin, height - margin, [0, 0, 0]);

    // Divider with a doorway
    fill(&mut img, 298, margin, 302, height - margin, [0, 0, 0]);
    fill(&mut img, 290, 180, 310, 220, [255, 255, 255]);

    img
}

fn fill(img: &mut RgbImage, x1: u32, y1: u32, x2: u32, y2: u32, color: [u8; 3]) {
    for y in y1..y2.min(img.height()) {
        for x in x1..x2.min(img.width()) {
            img.put_pixel(x, y, Rgb(color));
        }
    }
}
