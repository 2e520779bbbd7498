//! Triangulated rule: two opposing diagonal families sharing one footprint.
use super::assess::{weighted_stats, MetricScale, EDGE_SUPPORT_REF};
use super::RawDetection;
use crate::angle::deviation_deg;
use crate::segments::LineSegment;
use std::collections::BTreeMap;

#[derive(Default)]
struct Family {
    count: usize,
    bbox: Option<[f32; 4]>,
    angles: Vec<(f32, f32)>,
    weighted_mag: f32,
    total_len: f32,
}

impl Family {
    fn push(&mut self, s: &LineSegment) {
        let (xs, ys) = s.span();
        let b = [xs[0], ys[0], xs[1], ys[1]];
        self.bbox = Some(match self.bbox {
            Some(a) => union(a, b),
            None => b,
        });
        self.count += 1;
        self.angles.push((s.orientation_deg, s.length));
        self.weighted_mag += s.avg_mag * s.length;
        self.total_len += s.length;
    }
}

fn union(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    [a[0].min(b[0]), a[1].min(b[1]), a[2].max(b[2]), a[3].max(b[3])]
}

fn area(b: [f32; 4]) -> f32 {
    (b[2] - b[0]).max(0.0) * (b[3] - b[1]).max(0.0)
}

/// Intersection over union of two boxes.
fn overlap(a: [f32; 4], b: [f32; 4]) -> f32 {
    let inter = [a[0].max(b[0]), a[1].max(b[1]), a[2].min(b[2]), a[3].min(b[3])];
    let u = area(union(a, b));
    if u <= 0.0 {
        0.0
    } else {
        area(inter) / u
    }
}

pub(super) fn detect_triangulated(
    segments: &[LineSegment],
    size: (usize, usize),
    min_length_frac: f32,
    min_per_direction: usize,
    tolerance_deg: f32,
    scale: &MetricScale,
) -> Option<RawDetection> {
    let min_len = min_length_frac * size.0.max(size.1) as f32;
    let mut rising = Family::default();
    let mut falling = Family::default();
    for s in segments.iter().filter(|s| s.length >= min_len) {
        let diagonal = deviation_deg(s.orientation_deg, 0.0) > tolerance_deg
            && deviation_deg(s.orientation_deg, 90.0) > tolerance_deg;
        if !diagonal {
            continue;
        }
        // y grows downwards, so orientations above 90 rise to the right.
        if s.orientation_deg > 90.0 {
            rising.push(s);
        } else {
            falling.push(s);
        }
    }
    let need = min_per_direction.max(1);
    if rising.count < need || falling.count < need {
        return None;
    }
    let (a, b) = (rising.bbox?, falling.bbox?);
    let shared = overlap(a, b);
    if shared <= 0.0 {
        return None;
    }

    let balance = rising.count.min(falling.count) as f32 / rising.count.max(falling.count) as f32;
    let total_len = rising.total_len + falling.total_len;
    let edge = ((rising.weighted_mag + falling.weighted_mag) / total_len / EDGE_SUPPORT_REF).min(1.0);
    let spread = 0.5 * (weighted_stats(&rising.angles).1 + weighted_stats(&falling.angles).1);
    let base = 0.4 * balance + 0.3 * edge + 0.3 * shared;
    let irregularity = 0.5 * (spread / 10.0).min(1.0) + 0.5 * (1.0 - balance);

    let support = union(a, b);
    let mut dimensions = BTreeMap::new();
    dimensions.insert("span".to_string(), scale.metres(support[2] - support[0]));
    dimensions.insert("depth".to_string(), scale.metres(support[3] - support[1]));

    Some(RawDetection {
        dimensions,
        support,
        base_confidence: base,
        irregularity,
        features: vec!["triangulated pattern".to_string()],
    })
}
