// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outer plot boundary detection

use crate::config::BoundaryConfig;
use crate::contours::{approximate_closed_polygon, arc_length, external_contours, polygon_area};
use crate::error::{Result, VisionError};
use crate::image_ops::{adaptive_threshold, gaussian_blur, invert, mean_intensity, to_grayscale};
use crate::types::{BoundingBox, PixelPoint, PlotBoundary};
use image::RgbImage;
use tracing::debug;

/// Find the plot's outer boundary as the largest external contour
///
/// The binary mask is inverted when it is mostly white, so the sketched
/// strokes end up as foreground. Fails only when no contour exists at all.
pub fn detect_plot_boundary(image: &RgbImage, config: &BoundaryConfig) -> Result<PlotBoundary> {
    let gray = to_grayscale(image);
    let blurred = gaussian_blur(&gray, config.blur_sigma);
    let mut binary = adaptive_threshold(&blurred, config.threshold_block_radius, config.threshold_c);

    let mean = mean_intensity(&binary);
    if mean > config.polarity_mean_cutoff {
        binary = invert(&binary);
    }

    let contours = external_contours(&binary);
    debug!(contours = contours.len(), mask_mean = mean, "boundary candidates");

    let (contour, area) = largest_contour(&contours).ok_or(VisionError::BoundaryNotFound)?;

    let epsilon = config.simplify_epsilon_ratio * arc_length(contour, true);
    let polygon = approximate_closed_polygon(contour, epsilon);
    let bbox = BoundingBox::from_points(&polygon).ok_or(VisionError::BoundaryNotFound)?;

    debug!(
        vertices = polygon.len(),
        x = bbox.x,
        y = bbox.y,
        width = bbox.width,
        height = bbox.height,
        "plot boundary"
    );

    Ok(PlotBoundary {
        polygon,
        bbox,
        area_px: area as u64,
    })
}

/// Largest contour by enclosed area; the earliest wins on ties
fn largest_contour(contours: &[Vec<PixelPoint>]) -> Option<(&Vec<PixelPoint>, f64)> {
    let mut best: Option<(&Vec<PixelPoint>, f64)> = None;
    for contour in contours {
        let area = polygon_area(contour);
        match best {
            Some((_, best_area)) if area <= best_area => {}
            _ => best = Some((contour, area)),
        }
    }
    best
}
