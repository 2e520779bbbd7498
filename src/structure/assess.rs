//! Shared scoring helpers: metric scale, plausibility, condition.
use super::params::DetectorParams;
use crate::knowledge::ComponentSpec;
use crate::types::Condition;
use std::collections::BTreeMap;

/// Gradient magnitude treated as full edge support.
pub(super) const EDGE_SUPPORT_REF: f32 = 0.5;

/// Metres per working pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MetricScale {
    pub metres_per_px: f32,
    pub calibrated: bool,
}

impl MetricScale {
    /// `working_scale` is working size over original size.
    pub(crate) fn new(params: &DetectorParams, working_width: usize, working_scale: f32) -> Self {
        match params.pixels_per_meter {
            Some(ppm) if params.is_calibrated() && working_scale > 0.0 => Self {
                metres_per_px: 1.0 / (ppm * working_scale),
                calibrated: true,
            },
            _ => Self {
                metres_per_px: params.assumed_scene_width_m / working_width.max(1) as f32,
                calibrated: false,
            },
        }
    }

    /// Metres rounded to centimetres.
    pub(crate) fn metres(&self, px: f32) -> f32 {
        (px * self.metres_per_px * 100.0).round() / 100.0
    }
}

/// Fraction of estimated dimensions inside the knowledge-base ranges
/// (1 when the component lists none).
pub(super) fn plausibility(spec: &ComponentSpec, dims: &BTreeMap<String, f32>) -> f32 {
    let checked: Vec<bool> = dims
        .iter()
        .filter_map(|(name, v)| spec.typical_dimensions.get(name).map(|r| r.contains(*v)))
        .collect();
    if checked.is_empty() {
        1.0
    } else {
        checked.iter().filter(|ok| **ok).count() as f32 / checked.len() as f32
    }
}

pub(super) fn condition_for(irregularity: f32, thresholds: &[f32; 3]) -> Condition {
    if irregularity < thresholds[0] {
        Condition::Excellent
    } else if irregularity < thresholds[1] {
        Condition::Good
    } else if irregularity < thresholds[2] {
        Condition::Fair
    } else {
        Condition::Poor
    }
}

/// Length-weighted mean and standard deviation.
pub(super) fn weighted_stats(values: &[(f32, f32)]) -> (f32, f32) {
    let total: f32 = values.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return (0.0, 0.0);
    }
    let mean = values.iter().map(|(v, w)| v * w).sum::<f32>() / total;
    let var = values
        .iter()
        .map(|(v, w)| w * (v - mean) * (v - mean))
        .sum::<f32>()
        / total;
    (mean, var.max(0.0).sqrt())
}
