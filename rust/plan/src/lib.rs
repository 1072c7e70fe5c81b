// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan synthesis and export for normalized sketch layouts
//!
//! Takes the plot-relative rooms produced by `sketchplan-vision` and:
//! 1. Labels them positionally from a [`RequirementsSpec`]
//! 2. Scores directional placement ([`ComplianceRules`]) and adds suggestions
//! 3. Renders an SVG vector diagram
//! 4. Exports JSON, SVG or a CAD drawing through a [`CadBackend`]
//!
//! # Usage
//!
//! ```rust,ignore
//! use sketchplan_plan::{export_plan, probe_cad_backend, synthesize_plan, PlotDimensions};
//!
//! let plot = PlotDimensions::from_processed(&sketch)?;
//! let plan = synthesize_plan(&sketch.layout, &plot, &requirements);
//!
//! let cad = probe_cad_backend();
//! match export_plan(&plan, "dxf", cad.as_ref()) {
//!     Ok(artifact) => std::fs::write(artifact.filename, artifact.bytes)?,
//!     Err(e) => eprintln!("{}: {}", e.kind(), e),
//! }
//! ```

pub mod cad;
pub mod error;
pub mod export;
pub mod requirements;
pub mod svg;
pub mod synthesizer;

pub use cad::{probe_cad_backend, CadBackend, UnavailableCad};
#[cfg(feature = "dxf")]
pub use cad::dxf::DxfWriter;
pub use error::{ExportError, PlanError, Result};
pub use export::{export, export_plan, ExportArtifact, ExportFormat};
pub use requirements::{Direction, RequirementsSpec, VastuPreferences};
pub use svg::render_svg;
pub use synthesizer::{
    assign_labels, suggestions, synthesize_plan, ComplianceRules, PlanResult, PlanSynthesizer,
    PlotDimensions,
};
