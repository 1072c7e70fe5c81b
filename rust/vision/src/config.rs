// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Detection parameters for each pipeline stage
//!
//! Every struct deserializes with `#[serde(default)]`, so a JSON file only
//! needs to name the values it overrides.

use crate::error::{Result, VisionError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Outer plot boundary detection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoundaryConfig {
    /// Gaussian sigma (a 5x5 kernel in the source sketches)
    pub blur_sigma: f32,
    /// Adaptive threshold neighborhood radius (block size = 2r + 1)
    pub threshold_block_radius: u32,
    /// Constant subtracted from the local mean
    pub threshold_c: f64,
    /// Invert the binary mask when its mean exceeds this value
    pub polarity_mean_cutoff: f64,
    /// Polygon simplification tolerance as a fraction of the perimeter
    pub simplify_epsilon_ratio: f64,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.1,
            threshold_block_radius: 5,
            threshold_c: 2.0,
            polarity_mean_cutoff: 127.0,
            simplify_epsilon_ratio: 0.01,
        }
    }
}

/// Wall line extraction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LineConfig {
    /// Canny thresholds are median * (1 -/+ sigma)
    pub canny_sigma: f64,
    /// Closing radius (square kernel, 5x5 at radius 2)
    pub close_radius: u8,
    /// Hough accumulator vote threshold
    pub hough_threshold: u32,
    /// Minimum segment length in pixels
    pub min_line_length: f64,
    /// Maximum gap bridged inside one segment
    pub max_line_gap: f64,
    /// Accumulator peaks examined, strongest first
    pub max_peaks: usize,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            canny_sigma: 0.33,
            close_radius: 2,
            hough_threshold: 80,
            min_line_length: 30.0,
            max_line_gap: 10.0,
            max_peaks: 500,
        }
    }
}

/// Door/window gap detection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OpeningConfig {
    pub blur_sigma: f32,
    /// Pixels brighter than this are treated as open space
    pub white_level: u8,
    /// Contours with a smaller box area are discarded outright
    pub min_contour_area: u64,
    /// Acceptance bar for an opening's box area (exclusive)
    pub min_opening_area: u64,
    /// Width/height ratio bounds (both exclusive)
    pub min_aspect_ratio: f64,
    pub max_aspect_ratio: f64,
}

impl Default for OpeningConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.1,
            white_level: 200,
            min_contour_area: 200,
            min_opening_area: 400,
            min_aspect_ratio: 0.3,
            max_aspect_ratio: 3.0,
        }
    }
}

/// How overlapping per-cluster rectangles are combined
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Union each rectangle into the first overlapping merged rectangle.
    /// Not transitive: a chain A-B-C where A and C are disjoint may stay split.
    #[default]
    FirstMatch,
    /// Union whole connected components of the overlap graph until no two
    /// results overlap. Can yield fewer rooms than `FirstMatch`.
    ConnectedComponents,
}

/// Color clustering and rectangle extraction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Number of color clusters (k), clamped to 1..=255
    pub clusters: usize,
    /// RNG seed for k-means++ initialisation
    pub seed: u64,
    /// Working resolution the image is resampled to before clustering
    pub working_width: u32,
    pub working_height: u32,
    /// Lloyd iteration cap per restart
    pub max_iterations: usize,
    /// Stop once the summed squared centroid shift falls below this
    pub tolerance: f32,
    /// Independent k-means++ restarts; the lowest inertia wins
    pub restarts: usize,
    /// Per-cluster rectangles smaller than this are dropped (square pixels)
    pub min_rect_area: u64,
    pub merge_strategy: MergeStrategy,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            clusters: 4,
            seed: 0,
            working_width: 200,
            working_height: 200,
            max_iterations: 300,
            tolerance: 1e-4,
            restarts: 3,
            min_rect_area: 1000,
            merge_strategy: MergeStrategy::FirstMatch,
        }
    }
}

/// Parameters for the whole pixel-space pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub boundary: BoundaryConfig,
    pub lines: LineConfig,
    pub openings: OpeningConfig,
    pub segmentation: SegmentationConfig,
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| VisionError::Config(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| VisionError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }
}
