// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for sketch recognition and layout normalization

use serde::{Deserialize, Serialize};

/// A 2D integer pixel coordinate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &PixelPoint) -> f64 {
        let dx = (other.x - self.x) as f64;
        let dy = (other.y - self.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Closed polygon in pixel space; the last point connects back to the first
pub type Polygon = Vec<PixelPoint>;

/// Axis-aligned pixel rectangle, serialized as `[x, y, width, height]`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "[u32; 4]", into = "[u32; 4]")]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest box covering every point, pixel-inclusive (`max - min + 1`)
    pub fn from_points(points: &[PixelPoint]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let min_x = min_x.max(0);
        let min_y = min_y.max(0);
        if max_x < min_x || max_y < min_y {
            return None;
        }
        Some(Self {
            x: min_x as u32,
            y: min_y as u32,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        })
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Width over height, guarded against zero height
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / (self.height as f64 + 1e-6)
    }

    /// Axis-aligned overlap test. Boxes that merely touch count as overlapping.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        !(self.x > other.right()
            || self.right() < other.x
            || self.y > other.bottom()
            || self.bottom() < other.y)
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        BoundingBox {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Overlapping region with positive extent, if any
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return None;
        }
        Some(BoundingBox {
            x,
            y,
            width: right - x,
            height: bottom - y,
        })
    }

    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }

    /// Multiply position and extents by an integer factor
    pub fn scaled(&self, factor: u32) -> BoundingBox {
        BoundingBox {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

impl From<[u32; 4]> for BoundingBox {
    fn from(v: [u32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [u32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x, b.y, b.width, b.height]
    }
}

/// Candidate wall segment, undirected
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl LineSegment {
    pub fn new(start: PixelPoint, end: PixelPoint) -> Self {
        Self {
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
        }
    }

    pub fn length(&self) -> f64 {
        PixelPoint::new(self.x1, self.y1).distance_to(&PixelPoint::new(self.x2, self.y2))
    }

    pub fn is_horizontal(&self) -> bool {
        self.y1 == self.y2
    }

    pub fn is_vertical(&self) -> bool {
        self.x1 == self.x2
    }
}

/// Probable door/window gap
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpeningCandidate {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl OpeningCandidate {
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.w, self.h)
    }
}

impl From<BoundingBox> for OpeningCandidate {
    fn from(b: BoundingBox) -> Self {
        Self {
            x: b.x,
            y: b.y,
            w: b.width,
            h: b.height,
        }
    }
}

/// Unlabeled rectangular region proposed by segmentation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomCandidate {
    pub bbox: BoundingBox,
    /// Area of `bbox` in square pixels
    pub area_px: u64,
}

impl RoomCandidate {
    pub fn new(bbox: BoundingBox) -> Self {
        Self {
            bbox,
            area_px: bbox.area(),
        }
    }

    /// Grow this candidate to the union of both bounding boxes
    pub fn absorb(&mut self, other: &RoomCandidate) {
        self.bbox = self.bbox.union(&other.bbox);
        self.area_px = self.bbox.area();
    }
}

/// Outer plot boundary found by the boundary detector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlotBoundary {
    /// Simplified boundary polygon
    pub polygon: Polygon,
    /// Bounding box of the simplified polygon
    pub bbox: BoundingBox,
    /// Area enclosed by the raw (unsimplified) contour
    pub area_px: u64,
}

/// Which calibration input produced the scale factor
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScaleSource {
    ScaleBar,
    PlotWidth,
    PlotHeight,
}

/// Meters per pixel, plus the input it was derived from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScaleFactor {
    pub meters_per_px: f64,
    pub source: ScaleSource,
}

impl ScaleFactor {
    pub fn to_meters(&self, pixels: f64) -> f64 {
        pixels * self.meters_per_px
    }
}

/// Physical measurements supplied alongside the sketch
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalibrationInput {
    pub plot_width_m: Option<f64>,
    pub plot_height_m: Option<f64>,
    pub scale_bar_px: Option<f64>,
    pub scale_bar_m: Option<f64>,
}

/// Candidate room mapped into plot-relative meters (y grows downward)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedRoom {
    pub name: String,
    pub bbox_px: BoundingBox,
    pub x_m: f64,
    pub y_m: f64,
    pub w_m: f64,
    pub h_m: f64,
    pub area_m2: f64,
}

/// Everything detected in pixel space, before calibration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PixelDetections {
    pub image_width: u32,
    pub image_height: u32,
    pub plot_bbox_px: BoundingBox,
    pub plot_polygon_px: Polygon,
    pub plot_area_px: u64,
    pub wall_lines_px: Vec<LineSegment>,
    pub openings_px: Vec<OpeningCandidate>,
    pub candidate_rooms_px: Vec<RoomCandidate>,
}

/// Scaled result of a full processing run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessedSketch {
    pub image_width: u32,
    pub image_height: u32,
    pub plot_bbox_px: BoundingBox,
    pub plot_polygon_px: Polygon,
    pub plot_area_px: u64,
    pub meters_per_px: f64,
    pub scale_source: ScaleSource,
    pub layout: Vec<NormalizedRoom>,
    pub wall_lines: Vec<LineSegment>,
    pub openings: Vec<OpeningCandidate>,
    pub candidate_rooms_px: Vec<RoomCandidate>,
}

impl ProcessedSketch {
    pub fn new(detections: PixelDetections, scale: ScaleFactor, layout: Vec<NormalizedRoom>) -> Self {
        Self {
            image_width: detections.image_width,
            image_height: detections.image_height,
            plot_bbox_px: detections.plot_bbox_px,
            plot_polygon_px: detections.plot_polygon_px,
            plot_area_px: detections.plot_area_px,
            meters_per_px: scale.meters_per_px,
            scale_source: scale.source,
            layout,
            wall_lines: detections.wall_lines_px,
            openings: detections.openings_px,
            candidate_rooms_px: detections.candidate_rooms_px,
        }
    }

    /// Plot width and height in meters, from the bounding box and scale
    pub fn plot_size_m(&self) -> (f64, f64) {
        (
            self.plot_bbox_px.width as f64 * self.meters_per_px,
            self.plot_bbox_px.height as f64 * self.meters_per_px,
        )
    }
}
