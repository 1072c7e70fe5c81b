// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room labeling, compliance scoring and suggestions

use crate::error::{PlanError, Result};
use crate::requirements::RequirementsSpec;
use crate::svg::render_svg;
use serde::{Deserialize, Serialize};
use sketchplan_vision::{CalibrationInput, NormalizedRoom, ProcessedSketch};
use tracing::{debug, info};

/// Rooms smaller than this (3 m x 3 m) are flagged for combining
pub const SMALL_ROOM_AREA_M2: f64 = 9.0;

pub const KITCHEN_SUGGESTION: &str =
    "Consider repositioning the kitchen to the southeast corner for better Vastu compliance";
pub const MASTER_SUGGESTION: &str = "Master bedroom placement could be optimized for southwest direction";
pub const AFFIRMATION: &str = "Your floor plan has excellent Vastu compliance!";

/// Plot extent in meters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlotDimensions {
    pub width_m: f64,
    pub height_m: f64,
}

impl PlotDimensions {
    pub fn new(width_m: f64, height_m: f64) -> Result<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width_m) || !valid(height_m) {
            return Err(PlanError::InvalidPlotDimensions { width_m, height_m });
        }
        Ok(Self { width_m, height_m })
    }

    /// Plot box times meters-per-pixel
    pub fn from_processed(sketch: &ProcessedSketch) -> Result<Self> {
        let (w, h) = sketch.plot_size_m();
        Self::new(w, h)
    }

    /// Size for the CAD drawing of a freshly processed sketch: explicit plot
    /// measurements win over the scaled plot box
    pub fn for_drawing(sketch: &ProcessedSketch, calibration: &CalibrationInput) -> Result<Self> {
        let (w, h) = sketch.plot_size_m();
        let given = |v: Option<f64>| v.filter(|v| v.is_finite() && *v > 0.0);
        Self::new(
            given(calibration.plot_width_m).unwrap_or(w),
            given(calibration.plot_height_m).unwrap_or(h),
        )
    }

    /// Furthest room edge on each axis; `None` without rooms
    pub fn from_rooms_extent(rooms: &[NormalizedRoom]) -> Option<Self> {
        if rooms.is_empty() {
            return None;
        }
        let width_m = rooms.iter().map(|r| r.x_m + r.w_m).fold(f64::MIN, f64::max);
        let height_m = rooms.iter().map(|r| r.y_m + r.h_m).fold(f64::MIN, f64::max);
        Some(Self { width_m, height_m })
    }

    fn center(&self) -> (f64, f64) {
        (self.width_m / 2.0, self.height_m / 2.0)
    }
}

/// Score weights; the final score is always clamped to 0..=100
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ComplianceRules {
    pub base: i32,
    /// Kitchen in the southeast quadrant
    pub kitchen_bonus: i32,
    /// Master bedroom in the southwest quadrant
    pub master_bonus: i32,
    /// Puja room present and requested
    pub puja_bonus: i32,
}

impl Default for ComplianceRules {
    fn default() -> Self {
        Self {
            base: 70,
            kitchen_bonus: 10,
            master_bonus: 10,
            puja_bonus: 5,
        }
    }
}

impl ComplianceRules {
    /// Quadrant tests against the plot center. Only the first room whose name
    /// contains the category keyword is considered.
    pub fn score(&self, rooms: &[NormalizedRoom], plot: &PlotDimensions, puja_requested: bool) -> u8 {
        let (cx, cy) = plot.center();
        let first = |keyword: &str| rooms.iter().find(|r| r.name.contains(keyword));

        let mut score = self.base;
        if first("Kitchen").is_some_and(|k| k.x_m > cx && k.y_m > cy) {
            score = score.saturating_add(self.kitchen_bonus);
        }
        if first("Master").is_some_and(|m| m.x_m < cx && m.y_m > cy) {
            score = score.saturating_add(self.master_bonus);
        }
        if puja_requested && first("Puja").is_some() {
            score = score.saturating_add(self.puja_bonus);
        }

        score.clamp(0, 100) as u8
    }
}

/// Labeled plan with score, suggestions and a vector diagram
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanResult {
    pub rooms: Vec<NormalizedRoom>,
    pub total_area_m2: f64,
    pub compliance_score: u8,
    pub suggestions: Vec<String>,
    pub vector_diagram: String,
}

/// Label rooms by position in the desired-name list
///
/// Assignment is purely positional. Rooms past the end of the list are
/// named `Room_<n>` after their 1-based position.
pub fn assign_labels(rooms: &[NormalizedRoom], requirements: &RequirementsSpec) -> Vec<NormalizedRoom> {
    let names = requirements.desired_room_names();
    rooms
        .iter()
        .enumerate()
        .map(|(i, room)| NormalizedRoom {
            name: names.get(i).cloned().unwrap_or_else(|| format!("Room_{}", i + 1)),
            ..room.clone()
        })
        .collect()
}

/// Improvement hints, in a fixed order
pub fn suggestions(rooms: &[NormalizedRoom], score: u8) -> Vec<String> {
    let mut out = Vec::new();

    if score < 80 {
        out.push(KITCHEN_SUGGESTION.to_string());
    }
    if score < 70 {
        out.push(MASTER_SUGGESTION.to_string());
    }

    let small: Vec<&str> = rooms
        .iter()
        .filter(|r| r.area_m2 < SMALL_ROOM_AREA_M2)
        .take(2)
        .map(|r| r.name.as_str())
        .collect();
    if !small.is_empty() {
        out.push(format!("Consider combining small rooms: {}", small.join(", ")));
    }

    if out.is_empty() {
        out.push(AFFIRMATION.to_string());
    }
    out
}

/// Plan synthesis with adjustable scoring rules
#[derive(Debug, Clone, Default)]
pub struct PlanSynthesizer {
    pub rules: ComplianceRules,
}

impl PlanSynthesizer {
    pub fn new(rules: ComplianceRules) -> Self {
        Self { rules }
    }

    pub fn synthesize(
        &self,
        rooms: &[NormalizedRoom],
        plot: &PlotDimensions,
        requirements: &RequirementsSpec,
    ) -> PlanResult {
        let rooms = assign_labels(rooms, requirements);
        debug!(
            rooms = rooms.len(),
            desired = requirements.desired_room_names().len(),
            "labels assigned"
        );

        let compliance_score = self.rules.score(&rooms, plot, requirements.vastu_preferences.puja);
        let suggestions = suggestions(&rooms, compliance_score);
        let total_area_m2: f64 = rooms.iter().map(|r| r.area_m2).sum();
        let vector_diagram = render_svg(&rooms, plot);

        info!(
            rooms = rooms.len(),
            total_area_m2,
            compliance_score,
            "plan synthesized"
        );

        PlanResult {
            rooms,
            total_area_m2,
            compliance_score,
            suggestions,
            vector_diagram,
        }
    }
}

/// Synthesize a plan with the default scoring rules
pub fn synthesize_plan(
    rooms: &[NormalizedRoom],
    plot: &PlotDimensions,
    requirements: &RequirementsSpec,
) -> PlanResult {
    PlanSynthesizer::default().synthesize(rooms, plot, requirements)
}
