// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Candidate room segmentation via color clustering
//!
//! The sketch is resampled to a small working grid, its colors are clustered
//! with seeded k-means, and the label map is scaled back up with
//! nearest-neighbour lookup. Each cluster's external contours become
//! rectangles, which are then merged where they overlap.

use crate::config::{MergeStrategy, SegmentationConfig};
use crate::contours::external_bounding_boxes;
use crate::kmeans::{Color, KMeans};
use crate::types::RoomCandidate;
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbImage};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Propose candidate room rectangles for a sketch
///
/// A uniform image yields a single rectangle covering the whole image.
pub fn segment_regions(image: &RgbImage, config: &SegmentationConfig) -> Vec<RoomCandidate> {
    let labels = cluster_labels(image, config);

    let mut rectangles = Vec::new();
    for label in labels.distinct_labels() {
        let mask = labels.mask(label);
        rectangles.extend(
            external_bounding_boxes(&mask)
                .into_iter()
                .filter(|bbox| bbox.area() >= config.min_rect_area)
                .map(RoomCandidate::new),
        );
    }

    let found = rectangles.len();
    let merged = merge_rectangles(rectangles, config.merge_strategy);
    debug!(
        rectangles = found,
        merged = merged.len(),
        strategy = ?config.merge_strategy,
        "region segmentation"
    );
    merged
}

/// Per-pixel cluster labels at full image resolution
#[derive(Debug, Clone)]
pub struct LabelMap {
    width: u32,
    height: u32,
    labels: Vec<u8>,
}

impl LabelMap {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.labels[(y * self.width + x) as usize]
    }

    /// Labels present in the map, ascending
    pub fn distinct_labels(&self) -> Vec<u8> {
        let mut seen = [false; 256];
        for &label in &self.labels {
            seen[label as usize] = true;
        }
        (0..=255u8).filter(|&l| seen[l as usize]).collect()
    }

    /// Binary mask with 255 where the label matches
    pub fn mask(&self, label: u8) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            if self.get(x, y) == label {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }
}

/// Cluster the image's colors on the working grid and upsample the labels
pub fn cluster_labels(image: &RgbImage, config: &SegmentationConfig) -> LabelMap {
    let (width, height) = image.dimensions();
    let work_w = config.working_width.max(1);
    let work_h = config.working_height.max(1);

    let small = imageops::resize(image, work_w, work_h, FilterType::Triangle);
    let samples: Vec<Color> = small
        .pixels()
        .map(|p| Color::new(p[0] as f32, p[1] as f32, p[2] as f32))
        .collect();

    let kmeans = KMeans {
        clusters: config.clusters.clamp(1, 255),
        seed: config.seed,
        max_iterations: config.max_iterations,
        tolerance: config.tolerance,
        restarts: config.restarts,
    };
    let clustering = kmeans.fit(&samples);
    debug!(
        clusters = kmeans.clusters,
        iterations = clustering.iterations,
        inertia = clustering.inertia,
        "k-means"
    );

    // Nearest-neighbour upsampling; labels are never blended
    let mut labels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        let sy = ((y as u64 * work_h as u64) / height as u64).min(work_h as u64 - 1) as u32;
        for x in 0..width {
            let sx = ((x as u64 * work_w as u64) / width as u64).min(work_w as u64 - 1) as u32;
            let idx = (sy * work_w + sx) as usize;
            labels.push(clustering.labels.get(idx).copied().unwrap_or(0) as u8);
        }
    }

    LabelMap {
        width,
        height,
        labels,
    }
}

/// Combine overlapping rectangles, preserving discovery order
pub fn merge_rectangles(rectangles: Vec<RoomCandidate>, strategy: MergeStrategy) -> Vec<RoomCandidate> {
    match strategy {
        MergeStrategy::FirstMatch => merge_first_match(rectangles),
        MergeStrategy::ConnectedComponents => merge_connected(rectangles),
    }
}

/// Each rectangle is unioned into the first merged rectangle it overlaps,
/// otherwise appended. Merged results are not re-checked against each other.
fn merge_first_match(rectangles: Vec<RoomCandidate>) -> Vec<RoomCandidate> {
    let mut merged: Vec<RoomCandidate> = Vec::new();
    for rect in rectangles {
        match merged.iter_mut().find(|m| m.bbox.overlaps(&rect.bbox)) {
            Some(target) => target.absorb(&rect),
            None => merged.push(rect),
        }
    }
    merged
}

/// Union connected components of the overlap graph, repeating until no two
/// results overlap (a union box can reach rectangles its members did not)
fn merge_connected(mut rectangles: Vec<RoomCandidate>) -> Vec<RoomCandidate> {
    loop {
        let n = rectangles.len();
        let mut sets = DisjointSet::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                if rectangles[i].bbox.overlaps(&rectangles[j].bbox) {
                    sets.union(i, j);
                }
            }
        }

        let mut slot_of_root: FxHashMap<usize, usize> = FxHashMap::default();
        let mut merged: Vec<RoomCandidate> = Vec::new();
        for (i, rect) in rectangles.iter().enumerate() {
            let root = sets.find(i);
            match slot_of_root.get(&root) {
                Some(&slot) => merged[slot].absorb(rect),
                None => {
                    slot_of_root.insert(root, merged.len());
                    merged.push(*rect);
                }
            }
        }

        if merged.len() == n {
            return merged;
        }
        rectangles = merged;
    }
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    /// Attach the later root under the earlier one
    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            let (low, high) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[high] = low;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;
    use image::Rgb;

    fn rect(x: u32, y: u32, w: u32, h: u32) -> RoomCandidate {
        RoomCandidate::new(BoundingBox::new(x, y, w, h))
    }

    #[test]
    fn test_disjoint_rectangles_stay_separate() {
        let input = vec![rect(0, 0, 100, 100), rect(200, 0, 100, 100)];
        let merged = merge_rectangles(input.clone(), MergeStrategy::FirstMatch);
        assert_eq!(merged, input);
    }

    #[test]
    fn test_merged_area_never_shrinks() {
        let input = vec![
            rect(0, 0, 50, 50),
            rect(40, 40, 200, 120),
            rect(300, 300, 60, 60),
            rect(350, 280, 10, 10),
            rect(500, 0, 30, 400),
        ];
        for strategy in [MergeStrategy::FirstMatch, MergeStrategy::ConnectedComponents] {
            let merged = merge_rectangles(input.clone(), strategy);
            for input_rect in &input {
                let host = merged
                    .iter()
                    .find(|m| m.bbox.union(&input_rect.bbox) == m.bbox)
                    .expect("every input is covered by a merged rectangle");
                assert!(host.area_px >= input_rect.area_px);
            }
        }
    }

    #[test]
    fn test_first_match_leaves_chain_split() {
        // a and b are disjoint; c bridges them but only joins a
        let input = vec![rect(0, 0, 100, 100), rect(200, 0, 100, 100), rect(90, 0, 120, 50)];

        let first_match = merge_rectangles(input.clone(), MergeStrategy::FirstMatch);
        assert_eq!(first_match.len(), 2);
        assert_eq!(first_match[0].bbox, BoundingBox::new(0, 0, 210, 100));
        assert_eq!(first_match[0].area_px, 21_000);
        assert_eq!(first_match[1].bbox, BoundingBox::new(200, 0, 100, 100));

        let connected = merge_rectangles(input, MergeStrategy::ConnectedComponents);
        assert_eq!(connected.len(), 1);
        assert_eq!(connected[0].bbox, BoundingBox::new(0, 0, 300, 100));
    }

    #[test]
    fn test_connected_components_repeats_until_stable() {
        // The union of a and b grows into c even though neither touches it alone
        let input = vec![rect(0, 0, 100, 20), rect(90, 0, 20, 200), rect(50, 150, 20, 20)];
        let merged = merge_rectangles(input, MergeStrategy::ConnectedComponents);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].bbox, BoundingBox::new(0, 0, 110, 200));
    }

    #[test]
    fn test_uniform_image_is_one_region() {
        let img = RgbImage::from_pixel(160, 120, Rgb([230, 230, 230]));
        let rooms = segment_regions(&img, &SegmentationConfig::default());

        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].bbox, BoundingBox::new(0, 0, 160, 120));
        assert_eq!(rooms[0].area_px, 160 * 120);
    }

    #[test]
    fn test_touching_halves_merge() {
        let img = RgbImage::from_fn(200, 120, |x, _| {
            if x < 100 {
                Rgb([220, 40, 40])
            } else {
                Rgb([40, 40, 220])
            }
        });

        // Two clusters, so any resampled seam column joins one side
        let config = SegmentationConfig {
            clusters: 2,
            ..SegmentationConfig::default()
        };
        let labels = cluster_labels(&img, &config);
        assert_eq!(labels.distinct_labels().len(), 2);
        assert_ne!(labels.get(10, 10), labels.get(190, 10));

        let rooms = segment_regions(&img, &config);
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].bbox, BoundingBox::new(0, 0, 200, 120));
    }

    #[test]
    fn test_small_regions_are_dropped() {
        let mut img = RgbImage::from_pixel(200, 200, Rgb([255, 255, 255]));
        for y in 10..30 {
            for x in 10..30 {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }

        let config = SegmentationConfig {
            clusters: 2,
            ..SegmentationConfig::default()
        };
        let labels = cluster_labels(&img, &config);
        let dark = labels.get(15, 15);
        let boxes = external_bounding_boxes(&labels.mask(dark));

        // The 20x20 patch is about 400 px², below the rectangle floor
        assert_eq!(boxes.len(), 1);
        assert!(boxes[0].area() < 1000);
        let rooms = segment_regions(&img, &config);
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].bbox, BoundingBox::new(0, 0, 200, 200));
    }
}
