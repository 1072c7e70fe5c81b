// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor plan sketch recognition and layout normalization
//!
//! This crate turns a raster sketch of a plot into scaled geometry:
//! 1. Outer plot boundary (adaptive threshold + largest external contour)
//! 2. Wall line segments (median-derived Canny + Hough)
//! 3. Door/window openings (near-white rectangular gaps)
//! 4. Candidate rooms (seeded k-means over colors + rectangle merge)
//! 5. Meters-per-pixel calibration and plot-relative room coordinates
//!
//! # Usage
//!
//! ```rust,ignore
//! use sketchplan_vision::{process_sketch_bytes, CalibrationInput, PipelineConfig};
//!
//! let calibration = CalibrationInput {
//!     plot_width_m: Some(12.0),
//!     ..Default::default()
//! };
//! let sketch = process_sketch_bytes(&png_bytes, &calibration, &PipelineConfig::default())?;
//! for room in &sketch.layout {
//!     println!("{}: {:.2} m²", room.name, room.area_m2);
//! }
//! ```

pub mod boundary_detector;
pub mod calibration;
pub mod config;
pub mod contours;
pub mod error;
pub mod image_ops;
pub mod kmeans;
pub mod line_ops;
pub mod normalize;
pub mod opening_detector;
pub mod room_detector;
pub mod types;
pub mod wall_detector;

// Re-export commonly used types and functions
pub use boundary_detector::detect_plot_boundary;
pub use calibration::resolve_scale;
pub use config::{
    BoundaryConfig, LineConfig, MergeStrategy, OpeningConfig, PipelineConfig, SegmentationConfig,
};
pub use error::{Result, VisionError};
pub use image_ops::{decode_image, rgba_to_rgb};
pub use normalize::normalize_layout;
pub use opening_detector::detect_openings;
pub use room_detector::{merge_rectangles, segment_regions};
pub use types::{
    BoundingBox, CalibrationInput, LineSegment, NormalizedRoom, OpeningCandidate, PixelDetections,
    PixelPoint, PlotBoundary, Polygon, ProcessedSketch, RoomCandidate, ScaleFactor, ScaleSource,
};
pub use wall_detector::detect_wall_lines;

use image::RgbImage;
use tracing::info;

/// Run every pixel-space detector over the image
///
/// Fails when the image is empty or no plot boundary exists; the other
/// detectors cannot fail and may return empty lists.
pub fn detect_pixel_features(image: &RgbImage, config: &PipelineConfig) -> Result<PixelDetections> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(VisionError::InvalidImage { width, height });
    }

    let plot = detect_plot_boundary(image, &config.boundary)?;
    let wall_lines = detect_wall_lines(image, &config.lines);
    let openings = detect_openings(image, &config.openings);
    let candidate_rooms = segment_regions(image, &config.segmentation);

    Ok(PixelDetections {
        image_width: width,
        image_height: height,
        plot_bbox_px: plot.bbox,
        plot_polygon_px: plot.polygon,
        plot_area_px: plot.area_px,
        wall_lines_px: wall_lines,
        openings_px: openings,
        candidate_rooms_px: candidate_rooms,
    })
}

/// High-level function to process a decoded sketch into a scaled layout
///
/// When no calibration source is usable the error carries the pixel-space
/// detections, see [`VisionError::detections`].
pub fn process_sketch(
    image: &RgbImage,
    calibration: &CalibrationInput,
    config: &PipelineConfig,
) -> Result<ProcessedSketch> {
    let detections = detect_pixel_features(image, config)?;

    let Some(scale) = resolve_scale(&detections.plot_bbox_px, calibration) else {
        return Err(VisionError::CalibrationUnresolved(Box::new(detections)));
    };

    let layout = normalize_layout(&detections.candidate_rooms_px, &detections.plot_bbox_px, &scale);

    info!(
        width = detections.image_width,
        height = detections.image_height,
        walls = detections.wall_lines_px.len(),
        openings = detections.openings_px.len(),
        rooms = layout.len(),
        meters_per_px = scale.meters_per_px,
        "sketch processed"
    );

    Ok(ProcessedSketch::new(detections, scale, layout))
}

/// Decode PNG/JPEG bytes and process them
pub fn process_sketch_bytes(
    bytes: &[u8],
    calibration: &CalibrationInput,
    config: &PipelineConfig,
) -> Result<ProcessedSketch> {
    let image = decode_image(bytes)?;
    process_sketch(&image, calibration, config)
}

/// Process raw RGBA pixel data (4 bytes per pixel)
pub fn process_sketch_from_rgba(
    rgba_data: &[u8],
    width: u32,
    height: u32,
    calibration: &CalibrationInput,
    config: &PipelineConfig,
) -> Result<ProcessedSketch> {
    let image = rgba_to_rgb(rgba_data, width, height)?;
    process_sketch(&image, calibration, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn create_simple_sketch() -> RgbImage {
        let mut img = RgbImage::from_pixel(240, 200, Rgb([255, 255, 255]));

        // Outer walls
        for x in 20..220 {
            for y in (20..25).chain(175..180) {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
        for y in 20..180 {
            for x in (20..25).chain(215..220) {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }

        img
    }

    #[test]
    fn test_full_pipeline() {
        let img = create_simple_sketch();
        let calibration = CalibrationInput {
            plot_width_m: Some(10.0),
            ..Default::default()
        };

        let sketch = process_sketch(&img, &calibration, &PipelineConfig::default()).unwrap();

        assert_eq!(sketch.image_width, 240);
        assert_eq!(sketch.scale_source, ScaleSource::PlotWidth);
        assert!(sketch.meters_per_px > 0.0);
        assert!(!sketch.layout.is_empty());
        for room in &sketch.layout {
            assert!(room.x_m >= 0.0 && room.y_m >= 0.0);
            assert!(room.w_m > 0.0 && room.h_m > 0.0);
        }
        assert!(!sketch.wall_lines.is_empty(), "Should detect walls");
    }

    #[test]
    fn test_missing_calibration_keeps_detections() {
        let img = create_simple_sketch();

        let err = process_sketch(&img, &CalibrationInput::default(), &PipelineConfig::default())
            .unwrap_err();

        assert_eq!(err.kind(), "no_scale_provided");
        let detections = err.detections().unwrap();
        assert!(detections.plot_bbox_px.width > 0);
        assert!(!detections.candidate_rooms_px.is_empty());
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let err = process_sketch_from_rgba(&[], 0, 0, &CalibrationInput::default(), &PipelineConfig::default())
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_image");
    }

    #[test]
    fn test_short_rgba_buffer_is_invalid_image() {
        let calibration = CalibrationInput {
            plot_width_m: Some(10.0),
            ..Default::default()
        };

        let err = process_sketch_from_rgba(&[255; 400], 100, 100, &calibration, &PipelineConfig::default())
            .unwrap_err();

        assert_eq!(err.kind(), "invalid_image");
    }

    #[test]
    fn test_undecodable_bytes() {
        let err = process_sketch_bytes(b"not an image", &CalibrationInput::default(), &PipelineConfig::default())
            .unwrap_err();
        assert_eq!(err.kind(), "could_not_read_image");
    }
}
