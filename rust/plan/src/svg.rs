// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vector diagram of a normalized layout
//!
//! The view box is in plot meters (y grows downward) and the canvas is a
//! fixed 800 units wide with the plot's aspect ratio.

use crate::synthesizer::PlotDimensions;
use sketchplan_vision::NormalizedRoom;

pub const CANVAS_WIDTH: u32 = 800;

/// Room fill colors, cycled by room index
pub const PALETTE: [&str; 8] = [
    "#e3f2fd", "#f3e5f5", "#e8f5e8", "#fff3e0", "#fce4ec", "#e0f2f1", "#f1f8e9", "#fff8e1",
];

/// Canvas height preserving the plot aspect ratio (truncated)
pub fn canvas_height(plot: &PlotDimensions) -> u32 {
    (CANVAS_WIDTH as f64 * (plot.height_m / plot.width_m)) as u32
}

/// Render the plot outline and every room with a two-line label
pub fn render_svg(rooms: &[NormalizedRoom], plot: &PlotDimensions) -> String {
    let pw = plot.width_m;
    let ph = plot.height_m;

    let mut svg = String::new();
    svg.push_str(&format!(
        r##"<svg width="{}" height="{}" viewBox="0 0 {pw} {ph}" xmlns="http://www.w3.org/2000/svg">
<rect x="0" y="0" width="{pw}" height="{ph}" fill="#f8f9fa" stroke="#333" stroke-width="0.05"/>
"##,
        CANVAS_WIDTH,
        canvas_height(plot),
    ));

    for (i, room) in rooms.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let (x, y, w, h) = (room.x_m, room.y_m, room.w_m, room.h_m);
        let tx = x + w / 2.0;
        let ty = y + h / 2.0;

        svg.push_str(&format!(
            r##"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{color}" stroke="#666" stroke-width="0.02"/>
<text x="{tx}" y="{ty}" text-anchor="middle" dominant-baseline="middle" font-size="0.3" font-family="Arial, sans-serif" fill="#333">{}<tspan x="{tx}" dy="0.4">{:.1}×{:.1}m</tspan></text>
"##,
            escape_xml(&room.name),
            w,
            h,
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Escape text content and attribute values
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
