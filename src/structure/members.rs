//! Parallel member rule: long axis-aligned segments grouped across their
//! thickness into beams (horizontal) or columns (vertical).
use super::assess::{weighted_stats, MetricScale, EDGE_SUPPORT_REF};
use super::cluster1d::{cluster_1d, Obs};
use super::params::DetectorParams;
use super::RawDetection;
use crate::angle::deviation_deg;
use crate::knowledge::Axis;
use crate::segments::LineSegment;
use std::collections::BTreeMap;

/// Pieces shorter than this fraction of the frame are ignored.
const MIN_PIECE_FRAC: f32 = 0.05;
/// Mean deviation (degrees) under which a member counts as aligned.
const ALIGNED_DEG: f32 = 3.0;
const DISCONTINUOUS_FRAGMENTATION: f32 = 0.3;

pub(super) struct MemberRule {
    pub axis: Axis,
    pub min_length_frac: f32,
    pub max_thickness_frac: f32,
    pub min_members: usize,
}

struct Member {
    start: f32,
    end: f32,
    union: f32,
    perp_min: f32,
    perp_max: f32,
    signed_dev: Vec<(f32, f32)>,
    weighted_mag: f32,
    total_len: f32,
}

impl Member {
    fn extent(&self) -> f32 {
        self.end - self.start
    }

    fn centre(&self) -> f32 {
        0.5 * (self.perp_min + self.perp_max)
    }
}

struct Frame {
    axis: Axis,
    along_dim: f32,
    perp_dim: f32,
}

impl Frame {
    fn along(&self, p: [f32; 2]) -> f32 {
        match self.axis {
            Axis::Horizontal => p[0],
            Axis::Vertical => p[1],
        }
    }

    fn perp(&self, p: [f32; 2]) -> f32 {
        match self.axis {
            Axis::Horizontal => p[1],
            Axis::Vertical => p[0],
        }
    }

    fn reference_deg(&self) -> f32 {
        match self.axis {
            Axis::Horizontal => 0.0,
            Axis::Vertical => 90.0,
        }
    }

    /// Signed deviation from the axis in degrees, in (-90, 90].
    fn signed_deviation(&self, orientation_deg: f32) -> f32 {
        match self.axis {
            Axis::Horizontal if orientation_deg > 90.0 => orientation_deg - 180.0,
            Axis::Horizontal => orientation_deg,
            Axis::Vertical => orientation_deg - 90.0,
        }
    }
}

pub(super) fn detect_members(
    segments: &[LineSegment],
    size: (usize, usize),
    rule: &MemberRule,
    params: &DetectorParams,
    scale: &MetricScale,
) -> Vec<RawDetection> {
    let (w, h) = (size.0 as f32, size.1 as f32);
    let frame = match rule.axis {
        Axis::Horizontal => Frame {
            axis: rule.axis,
            along_dim: w,
            perp_dim: h,
        },
        Axis::Vertical => Frame {
            axis: rule.axis,
            along_dim: h,
            perp_dim: w,
        },
    };

    let min_piece = MIN_PIECE_FRAC * frame.along_dim;
    let obs: Vec<Obs> = segments
        .iter()
        .enumerate()
        .filter(|(_, s)| {
            s.length >= min_piece
                && deviation_deg(s.orientation_deg, frame.reference_deg())
                    <= params.orientation_tolerance_deg
        })
        .map(|(index, s)| Obs {
            index,
            param: frame.perp(s.midpoint()),
            strength: s.length,
        })
        .collect();

    let eps = rule.max_thickness_frac * frame.perp_dim;
    let min_extent = rule.min_length_frac * frame.along_dim;
    let mut members: Vec<Member> = cluster_1d(obs, eps, 0.0)
        .iter()
        .map(|group| build_member(group, segments, &frame))
        .filter(|m| m.extent() >= min_extent)
        .collect();
    if members.len() < rule.min_members.max(1) {
        return Vec::new();
    }
    members.sort_by(|a, b| a.centre().total_cmp(&b.centre()));
    let regular = spacing_is_regular(&members, params);

    members
        .iter()
        .map(|m| to_detection(m, &frame, regular, scale))
        .collect()
}

fn build_member(group: &[Obs], segments: &[LineSegment], frame: &Frame) -> Member {
    let mut intervals: Vec<(f32, f32)> = Vec::with_capacity(group.len());
    let mut perp_min = f32::INFINITY;
    let mut perp_max = f32::NEG_INFINITY;
    let mut signed_dev = Vec::with_capacity(group.len());
    let mut weighted_mag = 0.0;
    let mut total_len = 0.0;
    for o in group {
        let s = &segments[o.index];
        let (a, b) = (frame.along(s.p0), frame.along(s.p1));
        intervals.push((a.min(b), a.max(b)));
        perp_min = perp_min.min(o.param);
        perp_max = perp_max.max(o.param);
        signed_dev.push((frame.signed_deviation(s.orientation_deg), s.length));
        weighted_mag += s.avg_mag * s.length;
        total_len += s.length;
    }
    intervals.sort_by(|a, b| a.0.total_cmp(&b.0));
    let start = intervals.first().map_or(0.0, |i| i.0);
    let end = intervals.iter().map(|i| i.1).fold(start, f32::max);
    Member {
        start,
        end,
        union: union_length(&intervals),
        perp_min,
        perp_max,
        signed_dev,
        weighted_mag,
        total_len,
    }
}

/// Total length covered by sorted intervals.
fn union_length(sorted: &[(f32, f32)]) -> f32 {
    let mut total = 0.0;
    let mut current: Option<(f32, f32)> = None;
    for &(a, b) in sorted {
        current = match current {
            Some((ca, cb)) if a <= cb => Some((ca, cb.max(b))),
            Some((ca, cb)) => {
                total += cb - ca;
                Some((a, b))
            }
            None => Some((a, b)),
        };
    }
    if let Some((ca, cb)) = current {
        total += cb - ca;
    }
    total
}

fn spacing_is_regular(members: &[Member], params: &DetectorParams) -> bool {
    if members.len() < params.min_spaced_members.max(3) {
        return false;
    }
    let gaps: Vec<f32> = members
        .windows(2)
        .map(|w| w[1].centre() - w[0].centre())
        .collect();
    let mean = gaps.iter().sum::<f32>() / gaps.len() as f32;
    if mean <= 0.0 {
        return false;
    }
    let var = gaps.iter().map(|g| (g - mean) * (g - mean)).sum::<f32>() / gaps.len() as f32;
    var.sqrt() / mean <= params.spacing_cv_max
}

fn to_detection(m: &Member, frame: &Frame, regular: bool, scale: &MetricScale) -> RawDetection {
    let extent = m.extent().max(1.0);
    let continuity = (m.union / extent).clamp(0.0, 1.0);
    let fragmentation = 1.0 - continuity;
    let thickness = m.perp_max - m.perp_min;
    let paired = thickness >= 2.0;
    let (mean_dev, std_dev) = weighted_stats(&m.signed_dev);
    let edge = if m.total_len > 0.0 {
        (m.weighted_mag / m.total_len / EDGE_SUPPORT_REF).min(1.0)
    } else {
        0.0
    };
    let span = (extent / (0.6 * frame.along_dim)).min(1.0);
    let base = 0.3 * span + 0.25 * continuity + 0.25 * edge + if paired { 0.2 } else { 0.1 };
    let irregularity = 0.5 * (std_dev / 10.0).min(1.0) + 0.5 * fragmentation;

    let (long_name, thin_name, alignment) = match frame.axis {
        Axis::Horizontal => ("length", "depth", "horizontal alignment"),
        Axis::Vertical => ("height", "width", "vertical alignment"),
    };
    let mut dimensions = BTreeMap::new();
    dimensions.insert(long_name.to_string(), scale.metres(extent));
    dimensions.insert(thin_name.to_string(), scale.metres(thickness.max(1.0)));

    let (p_lo, p_hi) = (m.perp_min - 1.0, m.perp_max + 1.0);
    let support = match frame.axis {
        Axis::Horizontal => [m.start, p_lo, m.end, p_hi],
        Axis::Vertical => [p_lo, m.start, p_hi, m.end],
    };

    let mut features = Vec::new();
    if regular {
        features.push("regular spacing".to_string());
    }
    if mean_dev.abs() <= ALIGNED_DEG {
        features.push(alignment.to_string());
    }
    if fragmentation > DISCONTINUOUS_FRAGMENTATION {
        features.push("discontinuous edges".to_string());
    }

    RawDetection {
        dimensions,
        support,
        base_confidence: base,
        irregularity,
        features,
    }
}
