// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line segment detection on edge images

use crate::types::{LineSegment, PixelPoint};
use image::GrayImage;
use std::f64::consts::PI;

/// Hough voting parameters for segment extraction
#[derive(Debug, Clone, Copy)]
pub struct HoughParams {
    /// Minimum accumulator votes for a line hypothesis
    pub threshold: u32,
    /// Segments shorter than this are dropped
    pub min_line_length: f64,
    /// Larger gaps between consecutive edge points split a segment
    pub max_line_gap: f64,
    /// Strongest accumulator peaks examined
    pub max_peaks: usize,
}

/// Detect line segments using a probabilistic Hough transform
///
/// Votes every edge pixel into a (theta, rho) accumulator at 1 degree and
/// 1 pixel resolution, then walks the strongest peaks and splits the edge
/// points lying on each line into gap-separated segments. An edge point
/// belongs to at most one emitted segment.
pub fn detect_segments(edges: &GrayImage, params: &HoughParams) -> Vec<LineSegment> {
    let width = edges.width() as i32;
    let height = edges.height() as i32;

    let rho_resolution = 1.0;
    let theta_resolution = PI / 180.0;
    let num_thetas = (PI / theta_resolution).round() as usize;

    let mut cos_table = Vec::with_capacity(num_thetas);
    let mut sin_table = Vec::with_capacity(num_thetas);
    for i in 0..num_thetas {
        let theta = i as f64 * theta_resolution;
        cos_table.push(theta.cos());
        sin_table.push(theta.sin());
    }

    let max_rho = ((width * width + height * height) as f64).sqrt();
    let num_rhos = (2.0 * max_rho / rho_resolution) as usize + 1;
    let rho_offset = max_rho;

    let mut edge_points: Vec<(i32, i32)> = Vec::new();
    for y in 0..height {
        for x in 0..width {
            if edges.get_pixel(x as u32, y as u32).0[0] > 128 {
                edge_points.push((x, y));
            }
        }
    }

    if edge_points.is_empty() {
        return Vec::new();
    }

    let mut accumulator = vec![0u32; num_thetas * num_rhos];
    for &(x, y) in &edge_points {
        for theta_idx in 0..num_thetas {
            let rho = x as f64 * cos_table[theta_idx] + y as f64 * sin_table[theta_idx];
            let rho_idx = ((rho + rho_offset) / rho_resolution) as usize;
            if rho_idx < num_rhos {
                accumulator[theta_idx * num_rhos + rho_idx] += 1;
            }
        }
    }

    let mut peaks: Vec<(usize, usize, u32)> = Vec::new();
    for theta_idx in 0..num_thetas {
        for rho_idx in 0..num_rhos {
            let votes = accumulator[theta_idx * num_rhos + rho_idx];
            if votes >= params.threshold {
                peaks.push((theta_idx, rho_idx, votes));
            }
        }
    }

    // Strongest first; stable sort keeps (theta, rho) order among equal votes
    peaks.sort_by(|a, b| b.2.cmp(&a.2));

    let mut lines = Vec::new();
    let mut used_points = vec![false; edge_points.len()];

    for &(theta_idx, rho_idx, _votes) in peaks.iter().take(params.max_peaks) {
        let rho = rho_idx as f64 * rho_resolution - rho_offset;
        let cos_t = cos_table[theta_idx];
        let sin_t = sin_table[theta_idx];

        let mut line_points: Vec<(i32, i32, usize)> = edge_points
            .iter()
            .enumerate()
            .filter(|(i, _)| !used_points[*i])
            .filter(|(_, point)| {
                let (x, y) = **point;
                let point_rho = x as f64 * cos_t + y as f64 * sin_t;
                (point_rho - rho).abs() < 2.0
            })
            .map(|(i, &(x, y))| (x, y, i))
            .collect();

        if line_points.len() < 2 {
            continue;
        }

        // Order points along the line direction
        line_points.sort_by(|a, b| {
            let proj_a = a.0 as f64 * (-sin_t) + a.1 as f64 * cos_t;
            let proj_b = b.0 as f64 * (-sin_t) + b.1 as f64 * cos_t;
            proj_a.total_cmp(&proj_b)
        });

        let mut segment_start = 0;
        for i in 1..=line_points.len() {
            let split = i == line_points.len() || {
                let dx = (line_points[i].0 - line_points[i - 1].0) as f64;
                let dy = (line_points[i].1 - line_points[i - 1].1) as f64;
                (dx * dx + dy * dy).sqrt() > params.max_line_gap
            };

            if !split {
                continue;
            }

            if i - segment_start >= 2 {
                let (sx, sy, _) = line_points[segment_start];
                let (ex, ey, _) = line_points[i - 1];
                let segment = LineSegment::new(PixelPoint::new(sx, sy), PixelPoint::new(ex, ey));

                if segment.length() >= params.min_line_length {
                    lines.push(segment);
                    for point in &line_points[segment_start..i] {
                        used_points[point.2] = true;
                    }
                }
            }
            segment_start = i;
        }
    }

    lines
}
