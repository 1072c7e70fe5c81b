// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mapping candidate rooms into plot-relative meters

use crate::types::{BoundingBox, NormalizedRoom, RoomCandidate, ScaleFactor};
use tracing::debug;

/// Decimal places kept for every metric value
const PRECISION: f64 = 1e4;

pub fn round4(value: f64) -> f64 {
    (value * PRECISION).round() / PRECISION
}

/// Convert candidate rooms to meters relative to the plot's top-left corner
///
/// Metric values come from the candidate clipped to the plot box, so they are
/// never negative; candidates lying wholly outside the plot are skipped.
/// `bbox_px` keeps the unclipped candidate box. Rooms are
/// named `Room_<n>` (1-based) in the order they are emitted. `area_m2` is
/// computed from the unrounded extents.
pub fn normalize_layout(
    candidates: &[RoomCandidate],
    plot: &BoundingBox,
    scale: &ScaleFactor,
) -> Vec<NormalizedRoom> {
    let mut rooms = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let Some(clipped) = candidate.bbox.intersection(plot) else {
            continue;
        };

        let x_m = scale.to_meters((clipped.x - plot.x) as f64);
        let y_m = scale.to_meters((clipped.y - plot.y) as f64);
        let w_m = scale.to_meters(clipped.width as f64);
        let h_m = scale.to_meters(clipped.height as f64);

        rooms.push(NormalizedRoom {
            name: format!("Room_{}", rooms.len() + 1),
            bbox_px: candidate.bbox,
            x_m: round4(x_m),
            y_m: round4(y_m),
            w_m: round4(w_m),
            h_m: round4(h_m),
            area_m2: round4(w_m * h_m),
        });
    }

    debug!(
        candidates = candidates.len(),
        rooms = rooms.len(),
        "layout normalized"
    );
    rooms
}
