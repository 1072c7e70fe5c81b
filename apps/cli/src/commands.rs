// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command implementations
//!
//! Each command returns the JSON document printed on stdout. Library
//! failures become [`Failure`]s carrying a `{error, details, ...}` report;
//! I/O problems stay `anyhow` errors.

use crate::args::{ExportArgs, PlanArgs, ProcessArgs};
use crate::config::Config;
use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use sketchplan_plan::{
    probe_cad_backend, synthesize_plan, ExportError, PlanError, PlanResult,
    PlotDimensions, RequirementsSpec, VastuPreferences,
};
use sketchplan_vision::{process_sketch_bytes, PipelineConfig, ProcessedSketch, VisionError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A classified failure, reported as JSON
#[derive(Debug)]
pub struct Failure {
    pub report: Value,
    /// Bad input from the caller rather than a fault in the tool
    pub client_error: bool,
}

impl Failure {
    fn new(kind: &str, details: impl ToString, client_error: bool) -> Self {
        Self {
            report: json!({ "error": kind, "details": details.to_string() }),
            client_error,
        }
    }

    fn with(mut self, key: &str, value: Value) -> Self {
        if let Value::Object(map) = &mut self.report {
            map.insert(key.to_string(), value);
        }
        self
    }
}

impl From<VisionError> for Failure {
    fn from(err: VisionError) -> Self {
        let client_error = !matches!(err, VisionError::Config(_));
        let mut failure = Failure::new(err.kind(), &err, client_error);
        if let Some(d) = err.detections() {
            failure = failure
                .with("plot_bbox_px", json!(d.plot_bbox_px))
                .with("candidate_rooms_px", json!(d.candidate_rooms_px))
                .with("wall_lines_px", json!(d.wall_lines_px))
                .with("openings_px", json!(d.openings_px));
        }
        failure
    }
}

impl From<PlanError> for Failure {
    fn from(err: PlanError) -> Self {
        Failure::new(err.kind(), &err, true)
    }
}

impl From<ExportError> for Failure {
    fn from(err: ExportError) -> Self {
        let client_error = err.is_client_error();
        Failure::new(err.kind(), &err, client_error)
    }
}

/// Outcome of a command: `Ok(Err(_))` is a reported failure
pub type Outcome = Result<std::result::Result<Value, Failure>>;

/// Decode, detect, calibrate and normalize a sketch; write the layout and a
/// CAD drawing of it
pub fn process(args: &ProcessArgs, config: &Config) -> Outcome {
    let pipeline = match pipeline_config(args, config) {
        Ok(pipeline) => pipeline,
        Err(e) => return Ok(Err(e.into())),
    };

    let calibration = args.calibration();
    let bytes = fs::read(&args.image).with_context(|| format!("reading {}", args.image.display()))?;
    let sketch = match process_sketch_bytes(&bytes, &calibration, &pipeline) {
        Ok(sketch) => sketch,
        Err(e) => return Ok(Err(e.into())),
    };

    let out_dir = output_dir(args.output_dir.as_deref(), config)?;
    let mut report = to_object(&sketch)?;

    let cad = probe_cad_backend();
    let drawing = PlotDimensions::for_drawing(&sketch, &calibration)
        .map_err(Failure::from)
        .and_then(|plot| cad.render(&sketch.layout, &plot).map_err(Failure::from));
    match drawing {
        Ok(dxf) => {
            let path = write(&out_dir, "layout.dxf", &dxf)?;
            report.insert("dxf_path".into(), json!(path.display().to_string()));
        }
        Err(failure) => {
            warn!(backend = cad.name(), "layout drawing was not written");
            report.insert("cad_export".into(), failure.report);
        }
    }

    let report = Value::Object(report);
    write(&out_dir, "layout.json", &serde_json::to_vec_pretty(&report)?)?;
    info!(rooms = sketch.layout.len(), out_dir = %out_dir.display(), "layout written");

    Ok(Ok(report))
}

/// Label and score a processed layout
pub fn plan(args: &PlanArgs, config: &Config) -> Outcome {
    let sketch: ProcessedSketch = read_json(&args.sketch)?;
    let requirements = match &args.requirements {
        Some(path) => read_json(path)?,
        None => RequirementsSpec {
            bedrooms: args.bedrooms,
            bathrooms: args.bathrooms,
            kitchen_orientation: None,
            vastu_preferences: VastuPreferences {
                puja: args.puja,
                ..Default::default()
            },
            additional_rooms: args.rooms.clone(),
        },
    };

    let plot = match PlotDimensions::from_processed(&sketch) {
        Ok(plot) => plot,
        Err(e) => return Ok(Err(e.into())),
    };
    let plan = synthesize_plan(&sketch.layout, &plot, &requirements);

    let out_dir = output_dir(args.output_dir.as_deref(), config)?;
    write(&out_dir, "plan.json", &serde_json::to_vec_pretty(&plan)?)?;

    Ok(Ok(serde_json::to_value(&plan)?))
}

/// Write a plan in one of the download formats
pub fn export(args: &ExportArgs, config: &Config) -> Outcome {
    let plan: PlanResult = read_json(&args.plan)?;
    let cad = probe_cad_backend();

    let artifact = match sketchplan_plan::export(&plan, args.format.into(), cad.as_ref()) {
        Ok(artifact) => artifact,
        Err(e) => return Ok(Err(e.into())),
    };

    let out_dir = output_dir(args.output_dir.as_deref(), config)?;
    let path = write(&out_dir, artifact.filename, &artifact.bytes)?;

    Ok(Ok(json!({
        "format": artifact.format.to_string(),
        "media_type": artifact.media_type,
        "path": path.display().to_string(),
        "bytes": artifact.bytes.len(),
    })))
}

/// Pipeline settings: flag file, then environment file, then defaults, with
/// command-line overrides applied last
fn pipeline_config(args: &ProcessArgs, config: &Config) -> std::result::Result<PipelineConfig, VisionError> {
    let mut pipeline = match args.config.as_ref().or(config.pipeline_config.as_ref()) {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(seed) = args.seed.or(config.seed) {
        pipeline.segmentation.seed = seed;
    }
    if let Some(clusters) = args.clusters {
        pipeline.segmentation.clusters = usize::from(clusters);
    }
    if let Some(merge) = args.merge {
        pipeline.segmentation.merge_strategy = merge.into();
    }
    Ok(pipeline)
}

fn output_dir(flag: Option<&Path>, config: &Config) -> Result<PathBuf> {
    let dir = flag.map(Path::to_path_buf).unwrap_or_else(|| config.output_dir.clone());
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    Ok(dir)
}

fn write(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn to_object(sketch: &ProcessedSketch) -> Result<Map<String, Value>> {
    match serde_json::to_value(sketch)? {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("processed sketch serialized as {}", other),
    }
}
