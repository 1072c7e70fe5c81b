// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Contour extraction and polygon helpers

use crate::types::{BoundingBox, PixelPoint};
use image::{imageops, GrayImage};
use imageproc::contours::{find_contours, BorderType};

/// Outer borders of top-level foreground components (non-zero pixels)
///
/// Holes and anything nested inside a hole are skipped, so a filled region
/// yields exactly one contour. The mask is traced inside a one pixel zero
/// frame so components touching the image edge still get an outer border.
pub fn external_contours(binary: &GrayImage) -> Vec<Vec<PixelPoint>> {
    let mut framed = GrayImage::new(binary.width() + 2, binary.height() + 2);
    imageops::replace(&mut framed, binary, 1, 1);

    find_contours::<i32>(&framed)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            c.points
                .into_iter()
                .map(|p| PixelPoint::new(p.x - 1, p.y - 1))
                .collect()
        })
        .collect()
}

/// Bounding boxes of all external contours, in discovery order
pub fn external_bounding_boxes(binary: &GrayImage) -> Vec<BoundingBox> {
    external_contours(binary)
        .iter()
        .filter_map(|contour| BoundingBox::from_points(contour))
        .collect()
}

/// Polygon area using the shoelace formula
pub fn polygon_area(points: &[PixelPoint]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x as f64 * points[j].y as f64;
        area -= points[j].x as f64 * points[i].y as f64;
    }

    (area / 2.0).abs()
}

/// Perimeter of a polyline, including the closing edge when `closed`
pub fn arc_length(points: &[PixelPoint], closed: bool) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    let mut length: f64 = points.windows(2).map(|w| w[0].distance_to(&w[1])).sum();
    if closed {
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            length += last.distance_to(first);
        }
    }
    length
}

/// Simplify a closed contour with Douglas-Peucker
///
/// The ring is split at the point farthest from the first vertex and each
/// half is simplified independently.
pub fn approximate_closed_polygon(points: &[PixelPoint], epsilon: f64) -> Vec<PixelPoint> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let first = points[0];
    let (far_idx, _) = points
        .iter()
        .enumerate()
        .fold((0usize, 0.0f64), |best, (i, p)| {
            let d = p.distance_to(&first);
            if d > best.1 {
                (i, d)
            } else {
                best
            }
        });

    if far_idx == 0 {
        return vec![first];
    }

    let mut second_half: Vec<PixelPoint> = points[far_idx..].to_vec();
    second_half.push(first);

    let mut result = douglas_peucker(&points[..=far_idx], epsilon);
    let tail = douglas_peucker(&second_half, epsilon);

    // Both halves share the split point, and the tail ends on the first vertex again
    result.extend_from_slice(&tail[1..tail.len() - 1]);
    result
}

/// Douglas-Peucker line simplification algorithm
pub fn douglas_peucker(points: &[PixelPoint], epsilon: f64) -> Vec<PixelPoint> {
    if points.len() < 3 {
        return points.to_vec();
    }

    // Find the point with maximum distance from line between first and last
    let first = &points[0];
    let last = &points[points.len() - 1];

    let mut max_dist = 0.0;
    let mut max_idx = 0;

    for (i, point) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dist = perpendicular_distance(point, first, last);
        if dist > max_dist {
            max_dist = dist;
            max_idx = i;
        }
    }

    if max_dist > epsilon {
        let left = douglas_peucker(&points[..=max_idx], epsilon);
        let right = douglas_peucker(&points[max_idx..], epsilon);

        // Combine results (excluding duplicate point at max_idx)
        let mut result = left;
        result.extend_from_slice(&right[1..]);
        result
    } else {
        vec![*first, *last]
    }
}

/// Perpendicular distance from point to the infinite line through two points
fn perpendicular_distance(point: &PixelPoint, line_start: &PixelPoint, line_end: &PixelPoint) -> f64 {
    let dx = (line_end.x - line_start.x) as f64;
    let dy = (line_end.y - line_start.y) as f64;
    let length_sq = dx * dx + dy * dy;

    if length_sq < 1e-10 {
        return point.distance_to(line_start);
    }

    let px = (point.x - line_start.x) as f64;
    let py = (point.y - line_start.y) as f64;
    (px * dy - py * dx).abs() / length_sq.sqrt()
}
