// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door/window gap detection

use crate::config::OpeningConfig;
use crate::contours::external_bounding_boxes;
use crate::image_ops::{gaussian_blur, threshold, to_grayscale};
use crate::types::{BoundingBox, OpeningCandidate};
use image::RgbImage;
use tracing::debug;

/// Find near-white rectangular regions that look like openings
///
/// Two area bars apply: boxes under `min_contour_area` are discarded before
/// the ratio test, and accepted boxes must also exceed `min_opening_area`.
pub fn detect_openings(image: &RgbImage, config: &OpeningConfig) -> Vec<OpeningCandidate> {
    let gray = to_grayscale(image);
    let blurred = gaussian_blur(&gray, config.blur_sigma);
    let binary = threshold(&blurred, config.white_level);

    let boxes = external_bounding_boxes(&binary);
    let openings: Vec<OpeningCandidate> = boxes
        .iter()
        .filter(|bbox| is_opening(bbox, config))
        .map(|bbox| OpeningCandidate::from(*bbox))
        .collect();

    debug!(regions = boxes.len(), openings = openings.len(), "openings");
    openings
}

fn is_opening(bbox: &BoundingBox, config: &OpeningConfig) -> bool {
    let area = bbox.area();
    if area < config.min_contour_area {
        return false;
    }
    let ratio = bbox.aspect_ratio();
    ratio > config.min_aspect_ratio && ratio < config.max_aspect_ratio && area > config.min_opening_area
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn fill(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: [u8; 3]) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                img.put_pixel(x, y, Rgb(color));
            }
        }
    }

    #[test]
    fn test_area_and_ratio_filters() {
        let config = OpeningConfig::default();

        // Below the hard floor
        assert!(!is_opening(&BoundingBox::new(0, 0, 10, 10), &config));
        // Above the floor but not above the acceptance bar
        assert!(!is_opening(&BoundingBox::new(0, 0, 20, 20), &config));
        // Accepted
        assert!(is_opening(&BoundingBox::new(0, 0, 30, 30), &config));
        // Too elongated either way
        assert!(!is_opening(&BoundingBox::new(0, 0, 100, 10), &config));
        assert!(!is_opening(&BoundingBox::new(0, 0, 10, 100), &config));
    }

    #[test]
    fn test_white_gaps_on_dark_sketch() {
        let mut img = RgbImage::from_pixel(300, 200, Rgb([40, 40, 40]));
        // Square gap: accepted
        fill(&mut img, 30, 30, 40, 40, [255, 255, 255]);
        // Long thin gap: rejected by ratio
        fill(&mut img, 120, 40, 150, 12, [255, 255, 255]);
        // Tiny gap: rejected by area
        fill(&mut img, 40, 150, 10, 10, [255, 255, 255]);

        let openings = detect_openings(&img, &OpeningConfig::default());

        assert_eq!(openings.len(), 1);
        let o = openings[0];
        assert!((o.x as i64 - 30).abs() <= 2);
        assert!((o.y as i64 - 30).abs() <= 2);
        assert!((o.w as i64 - 40).abs() <= 4);
        assert!((o.h as i64 - 40).abs() <= 4);
    }

    #[test]
    fn test_dark_image_has_no_openings() {
        let img = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        assert!(detect_openings(&img, &OpeningConfig::default()).is_empty());
    }
}
