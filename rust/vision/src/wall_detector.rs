// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall line extraction

use crate::config::LineConfig;
use crate::image_ops::{auto_canny, morphological_close, to_grayscale};
use crate::line_ops::{detect_segments, HoughParams};
use crate::types::LineSegment;
use image::RgbImage;
use tracing::debug;

/// Extract candidate wall segments from a sketch
///
/// Median-derived Canny edges are closed with a small square kernel to
/// bridge pen gaps, then fed to the probabilistic Hough detector. An image
/// without edges yields an empty list.
pub fn detect_wall_lines(image: &RgbImage, config: &LineConfig) -> Vec<LineSegment> {
    let gray = to_grayscale(image);
    let edges = auto_canny(&gray, config.canny_sigma);
    let closed = morphological_close(&edges, config.close_radius);

    let lines = detect_segments(
        &closed,
        &HoughParams {
            threshold: config.hough_threshold,
            min_line_length: config.min_line_length,
            max_line_gap: config.max_line_gap,
            max_peaks: config.max_peaks,
        },
    );

    debug!(segments = lines.len(), "wall lines");
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_blank_sketch_has_no_walls() {
        let img = RgbImage::from_pixel(200, 150, Rgb([250, 250, 250]));
        assert!(detect_wall_lines(&img, &LineConfig::default()).is_empty());
    }

    #[test]
    fn test_long_stroke_yields_segments() {
        let mut img = RgbImage::from_pixel(300, 200, Rgb([255, 255, 255]));
        for x in 20..280 {
            for y in 98..103 {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }

        let lines = detect_wall_lines(&img, &LineConfig::default());

        assert!(!lines.is_empty(), "expected the stroke to produce segments");
        assert!(lines.iter().all(|l| l.length() >= 30.0));
        assert!(lines
            .iter()
            .any(|l| (l.y1 - l.y2).abs() <= 4 && (l.x1 - l.x2).abs() > 150));
    }
}
