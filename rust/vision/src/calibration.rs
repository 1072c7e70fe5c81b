// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pixel to meter calibration

use crate::types::{BoundingBox, CalibrationInput, ScaleFactor, ScaleSource};
use tracing::{debug, warn};

/// Resolve meters-per-pixel from the first usable calibration source
///
/// Priority is scale bar, then plot width, then plot height. Values that are
/// missing, non-positive or non-finite count as not supplied, and a plot
/// source is skipped when the matching bounding box extent is zero.
pub fn resolve_scale(plot: &BoundingBox, input: &CalibrationInput) -> Option<ScaleFactor> {
    let bar_px = usable(input.scale_bar_px);
    let bar_m = usable(input.scale_bar_m);

    let resolved = match (bar_px, bar_m) {
        (Some(px), Some(m)) => Some(ScaleFactor {
            meters_per_px: m / px,
            source: ScaleSource::ScaleBar,
        }),
        (px, m) => {
            if px.is_some() || m.is_some() {
                warn!("scale bar needs both scale_bar_px and scale_bar_m; ignoring it");
            }
            from_extent(input.plot_width_m, plot.width, ScaleSource::PlotWidth)
                .or_else(|| from_extent(input.plot_height_m, plot.height, ScaleSource::PlotHeight))
        }
    };

    match &resolved {
        Some(scale) => debug!(meters_per_px = scale.meters_per_px, source = ?scale.source, "scale resolved"),
        None => debug!("no usable calibration input"),
    }
    resolved
}

fn from_extent(meters: Option<f64>, pixels: u32, source: ScaleSource) -> Option<ScaleFactor> {
    let meters = usable(meters)?;
    if pixels == 0 {
        warn!(source = ?source, "plot extent is zero pixels; trying next source");
        return None;
    }
    Some(ScaleFactor {
        meters_per_px: meters / pixels as f64,
        source,
    })
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}
