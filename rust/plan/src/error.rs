// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for plan synthesis
pub type Result<T> = std::result::Result<T, PlanError>;

/// Errors that can occur while synthesizing a plan
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Plot dimensions must be positive and finite, got {width_m} x {height_m} m")]
    InvalidPlotDimensions { width_m: f64, height_m: f64 },
}

impl PlanError {
    /// Stable machine-readable error code
    pub fn kind(&self) -> &'static str {
        match self {
            PlanError::InvalidPlotDimensions { .. } => "invalid_plot_dimensions",
        }
    }
}

/// Errors that can occur while exporting a plan
#[derive(Error, Debug)]
pub enum ExportError {
    /// Recoverable: the rest of the plan is still valid output
    #[error("CAD backend unavailable: {0}")]
    CadUnavailable(String),

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ExportError {
    /// Stable machine-readable error code
    pub fn kind(&self) -> &'static str {
        match self {
            ExportError::CadUnavailable(_) => "cad_unavailable",
            ExportError::UnsupportedFormat(_) => "unsupported_format",
            ExportError::Serialization(_) => "serialization_failed",
        }
    }

    /// True when the request itself was at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, ExportError::UnsupportedFormat(_))
    }
}
