// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan synthesis and export through the public API

use approx::assert_abs_diff_eq;
use sketchplan_plan::{
    export_plan, synthesize_plan, CadBackend, PlanResult, PlotDimensions, RequirementsSpec,
    UnavailableCad, VastuPreferences,
};
use sketchplan_vision::{normalize_layout, BoundingBox, RoomCandidate, ScaleFactor, ScaleSource};

fn requirements() -> RequirementsSpec {
    RequirementsSpec {
        bedrooms: 2,
        bathrooms: 1,
        kitchen_orientation: None,
        vastu_preferences: VastuPreferences {
            puja: true,
            ..Default::default()
        },
        additional_rooms: vec!["Study".to_string()],
    }
}

fn sample_plan() -> PlanResult {
    let plot = BoundingBox::new(10, 10, 780, 580);
    let scale = ScaleFactor {
        meters_per_px: 0.01,
        source: ScaleSource::PlotWidth,
    };
    let candidates = vec![
        RoomCandidate::new(BoundingBox::new(10, 10, 300, 280)),
        RoomCandidate::new(BoundingBox::new(320, 10, 400, 280)),
    ];
    let layout = normalize_layout(&candidates, &plot, &scale);
    let dims = PlotDimensions::new(7.8, 5.8).unwrap();

    synthesize_plan(&layout, &dims, &requirements())
}

#[test]
fn missing_cad_backend_does_not_affect_json_export() {
    let plan = sample_plan();
    let cad = UnavailableCad::new("no CAD writer installed");

    let json_before = export_plan(&plan, "json", &cad).unwrap();

    let err = export_plan(&plan, "dxf", &cad).unwrap_err();
    assert_eq!(err.kind(), "cad_unavailable");
    assert!(!err.is_client_error());

    let json_after = export_plan(&plan, "json", &cad).unwrap();
    assert_eq!(json_before, json_after);

    let back: PlanResult = serde_json::from_slice(&json_after.bytes).unwrap();
    assert_eq!(back, plan);
}

#[test]
fn plan_from_normalized_layout() {
    let plan = sample_plan();

    assert_eq!(plan.rooms.len(), 2);
    assert_eq!(plan.rooms[0].name, "Living Room");
    assert_eq!(plan.rooms[1].name, "Master Bedroom");
    assert_abs_diff_eq!(plan.total_area_m2, 8.4 + 11.2, epsilon = 1e-9);

    // Neither scored room is present in a bonus quadrant
    assert_eq!(plan.compliance_score, 70);
    assert_eq!(plan.suggestions.len(), 2);
    assert!(plan.suggestions[1].ends_with("Living Room"));
    assert!(plan.vector_diagram.contains(">Master Bedroom<tspan"));

    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["compliance_score"], 70);
    assert_eq!(json["rooms"][0]["bbox_px"], serde_json::json!([10, 10, 300, 280]));
}

#[test]
fn unsupported_format_is_a_client_error() {
    let err = export_plan(&sample_plan(), "pdf", &UnavailableCad::new("none")).unwrap_err();
    assert_eq!(err.kind(), "unsupported_format");
    assert!(err.is_client_error());
}

#[cfg(feature = "dxf")]
#[test]
fn dxf_export_uses_room_extent() {
    let plan = sample_plan();
    let cad = sketchplan_plan::probe_cad_backend();
    assert!(cad.is_available());

    let artifact = export_plan(&plan, "dxf", cad.as_ref()).unwrap();
    assert_eq!(artifact.filename, "floorplan.dxf");
    assert_eq!(artifact.media_type, "application/dxf");

    let dxf = String::from_utf8(artifact.bytes).unwrap();
    // Rooms reach 7.1 m east and 2.8 m south
    assert!(dxf.contains(" 10\n7100.0000\n 20\n2800.0000\n"));
    assert!(dxf.contains("Master Bedroom 4.00x2.80m"));
}
