// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan export in the supported download formats

use crate::cad::CadBackend;
use crate::error::ExportError;
use crate::synthesizer::{PlanResult, PlotDimensions};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Svg,
    Dxf,
}

impl ExportFormat {
    pub fn filename(&self) -> &'static str {
        match self {
            ExportFormat::Json => "floorplan.json",
            ExportFormat::Svg => "floorplan.svg",
            ExportFormat::Dxf => "floorplan.dxf",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Dxf => "application/dxf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "svg" => Ok(ExportFormat::Svg),
            "dxf" => Ok(ExportFormat::Dxf),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Json => "json",
            ExportFormat::Svg => "svg",
            ExportFormat::Dxf => "dxf",
        };
        f.write_str(name)
    }
}

/// A rendered export; writing it out is the caller's job
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub filename: &'static str,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Export a plan in a format named by the client
pub fn export_plan(plan: &PlanResult, format: &str, cad: &dyn CadBackend) -> Result<ExportArtifact, ExportError> {
    let format: ExportFormat = format.parse()?;
    export(plan, format, cad)
}

/// Export a plan
///
/// The DXF drawing's plot extent is the furthest room edge on each axis; a
/// plan without rooms draws a zero-sized outline.
pub fn export(plan: &PlanResult, format: ExportFormat, cad: &dyn CadBackend) -> Result<ExportArtifact, ExportError> {
    let bytes = match format {
        ExportFormat::Json => serde_json::to_vec_pretty(plan)?,
        ExportFormat::Svg => plan.vector_diagram.clone().into_bytes(),
        ExportFormat::Dxf => {
            if !cad.is_available() {
                warn!(backend = cad.name(), "CAD export requested but no backend is available");
            }
            let extent = PlotDimensions::from_rooms_extent(&plan.rooms).unwrap_or(PlotDimensions {
                width_m: 0.0,
                height_m: 0.0,
            });
            cad.render(&plan.rooms, &extent)?
        }
    };

    debug!(%format, bytes = bytes.len(), "plan exported");

    Ok(ExportArtifact {
        format,
        filename: format.filename(),
        media_type: format.media_type(),
        bytes,
    })
}
