// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CAD drawing backends
//!
//! A CAD writer is an optional capability. Callers probe for it once and
//! treat an unavailable backend as a reported condition: the JSON layout and
//! vector diagram remain valid output.

use crate::error::ExportError;
use crate::synthesizer::PlotDimensions;
use sketchplan_vision::NormalizedRoom;

/// Drawing units per meter (millimeter drawings)
pub const DRAWING_UNITS_PER_METER: f64 = 1000.0;

/// Label text height in drawing units
pub const LABEL_HEIGHT: f64 = 100.0;

/// Label offset from the room's corner in drawing units
pub const LABEL_OFFSET: f64 = 10.0;

/// Something that can turn a layout into a CAD file
pub trait CadBackend {
    /// Short backend identifier for logs and error details
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool;

    /// Plot outline as a closed polyline from (0,0) to (width,height), then
    /// each room as a closed polyline with a text label near its corner
    fn render(&self, rooms: &[NormalizedRoom], plot: &PlotDimensions) -> Result<Vec<u8>, ExportError>;
}

/// Stand-in used when no CAD writer is compiled in
#[derive(Debug, Clone)]
pub struct UnavailableCad {
    pub reason: String,
}

impl UnavailableCad {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl CadBackend for UnavailableCad {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn render(&self, _rooms: &[NormalizedRoom], _plot: &PlotDimensions) -> Result<Vec<u8>, ExportError> {
        Err(ExportError::CadUnavailable(self.reason.clone()))
    }
}

/// Best CAD backend available in this build
#[cfg(feature = "dxf")]
pub fn probe_cad_backend() -> Box<dyn CadBackend> {
    Box::new(dxf::DxfWriter)
}

/// Best CAD backend available in this build
#[cfg(not(feature = "dxf"))]
pub fn probe_cad_backend() -> Box<dyn CadBackend> {
    Box::new(UnavailableCad::new("built without the `dxf` feature"))
}

/// Room label as written into drawings: name plus size to two decimals
pub fn room_label(room: &NormalizedRoom) -> String {
    format!("{} {:.2}x{:.2}m", room.name, room.w_m, room.h_m)
}

#[cfg(feature = "dxf")]
pub mod dxf {
    //! Minimal ASCII DXF (AutoCAD R12) writer

    use super::*;

    const PLOT_LAYER: &str = "PLOT";
    const ROOM_LAYER: &str = "ROOMS";
    const LABEL_LAYER: &str = "LABELS";

    /// Writes POLYLINE/VERTEX/SEQEND rectangles and TEXT labels
    #[derive(Debug, Clone, Default)]
    pub struct DxfWriter;

    impl CadBackend for DxfWriter {
        fn name(&self) -> &'static str {
            "dxf-r12"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn render(&self, rooms: &[NormalizedRoom], plot: &PlotDimensions) -> Result<Vec<u8>, ExportError> {
            let s = DRAWING_UNITS_PER_METER;
            let mut out = String::new();

            out.push_str(&pair(0, "SECTION"));
            out.push_str(&pair(2, "HEADER"));
            out.push_str(&pair(9, "$ACADVER"));
            out.push_str(&pair(1, "AC1009"));
            // Millimeters
            out.push_str(&pair(9, "$INSUNITS"));
            out.push_str(&pair(70, "4"));
            out.push_str(&pair(0, "ENDSEC"));

            out.push_str(&pair(0, "SECTION"));
            out.push_str(&pair(2, "ENTITIES"));

            closed_rectangle(&mut out, PLOT_LAYER, 0.0, 0.0, plot.width_m * s, plot.height_m * s);

            for room in rooms {
                let (x, y) = (room.x_m * s, room.y_m * s);
                closed_rectangle(&mut out, ROOM_LAYER, x, y, room.w_m * s, room.h_m * s);
                text(&mut out, LABEL_LAYER, x + LABEL_OFFSET, y + LABEL_OFFSET, &room_label(room));
            }

            out.push_str(&pair(0, "ENDSEC"));
            out.push_str(&pair(0, "EOF"));

            Ok(out.into_bytes())
        }
    }

    fn pair(code: u16, value: &str) -> String {
        format!("{:>3}\n{}\n", code, value)
    }

    fn coord(code: u16, value: f64) -> String {
        pair(code, &format!("{:.4}", value))
    }

    fn closed_rectangle(out: &mut String, layer: &str, x: f64, y: f64, w: f64, h: f64) {
        out.push_str(&pair(0, "POLYLINE"));
        out.push_str(&pair(8, layer));
        out.push_str(&pair(66, "1"));
        // Closed flag
        out.push_str(&pair(70, "1"));
        out.push_str(&coord(10, 0.0));
        out.push_str(&coord(20, 0.0));
        out.push_str(&coord(30, 0.0));

        for (vx, vy) in [(x, y), (x + w, y), (x + w, y + h), (x, y + h), (x, y)] {
            out.push_str(&pair(0, "VERTEX"));
            out.push_str(&pair(8, layer));
            out.push_str(&coord(10, vx));
            out.push_str(&coord(20, vy));
            out.push_str(&coord(30, 0.0));
        }

        out.push_str(&pair(0, "SEQEND"));
        out.push_str(&pair(8, layer));
    }

    fn text(out: &mut String, layer: &str, x: f64, y: f64, value: &str) {
        // Group values are single lines
        let value: String = value.chars().map(|c| if c.is_control() { ' ' } else { c }).collect();

        out.push_str(&pair(0, "TEXT"));
        out.push_str(&pair(8, layer));
        out.push_str(&coord(10, x));
        out.push_str(&coord(20, y));
        out.push_str(&coord(30, 0.0));
        out.push_str(&coord(40, LABEL_HEIGHT));
        out.push_str(&pair(1, &value));
    }

}
