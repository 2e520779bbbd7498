use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Candidates scoring below this are not reported.
    pub acceptance_threshold: f32,
    /// Maximum deviation (degrees) for a segment to count as horizontal/vertical.
    pub orientation_tolerance_deg: f32,
    pub max_per_type: usize,
    /// Spacing coefficient of variation at or below which members are "regular".
    pub spacing_cv_max: f32,
    pub min_spaced_members: usize,
    /// Irregularity upper bounds for excellent, good and fair.
    pub condition_thresholds: [f32; 3],
    /// Calibration in original-image pixels per metre.
    pub pixels_per_meter: Option<f32>,
    /// Scene width assumed when no calibration is supplied.
    pub assumed_scene_width_m: f32,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            acceptance_threshold: 0.3,
            orientation_tolerance_deg: 15.0,
            max_per_type: 6,
            spacing_cv_max: 0.15,
            min_spaced_members: 3,
            condition_thresholds: [0.15, 0.30, 0.50],
            pixels_per_meter: None,
            assumed_scene_width_m: 20.0,
        }
    }
}

impl DetectorParams {
    /// A usable pixels-per-metre calibration was supplied.
    pub fn is_calibrated(&self) -> bool {
        self.pixels_per_meter.is_some_and(|p| p.is_finite() && p > 0.0)
    }
}
