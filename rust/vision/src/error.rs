// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::types::PixelDetections;
use thiserror::Error;

/// Result type for sketch processing
pub type Result<T> = std::result::Result<T, VisionError>;

/// Errors that can occur while processing a sketch
#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Cannot decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Image has no usable pixels ({width}x{height})")]
    InvalidImage { width: u32, height: u32 },

    #[error("No plot boundary contour found")]
    BoundaryNotFound,

    /// Pixel-space detections are kept so the caller can ask for calibration input
    #[error("Provide plot_width_m/plot_height_m or scale_bar_px+scale_bar_m")]
    CalibrationUnresolved(Box<PixelDetections>),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl VisionError {
    /// Stable machine-readable error code
    pub fn kind(&self) -> &'static str {
        match self {
            VisionError::ImageDecode(_) => "could_not_read_image",
            VisionError::InvalidImage { .. } => "invalid_image",
            VisionError::BoundaryNotFound => "could_not_detect_plot_outer_boundary",
            VisionError::CalibrationUnresolved(_) => "no_scale_provided",
            VisionError::Config(_) => "invalid_config",
        }
    }

    /// Detections that survived a calibration failure
    pub fn detections(&self) -> Option<&PixelDetections> {
        match self {
            VisionError::CalibrationUnresolved(d) => Some(d),
            _ => None,
        }
    }
}
