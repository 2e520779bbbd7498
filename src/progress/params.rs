use serde::Deserialize;

/// Thresholds for the challenge rules; phases and weights come from the
/// knowledge base.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ProgressParams {
    /// Axis-aligned length fraction below which geometry counts as complex.
    pub complex_regularity_max: f32,
    /// Minimum segment count before regularity is trusted.
    pub complex_min_segments: usize,
    /// Mean texture gradient above which surfaces need preparation.
    pub rough_surface_gradient: f32,
}

impl Default for ProgressParams {
    fn default() -> Self {
        Self {
            complex_regularity_max: 0.4,
            complex_min_segments: 5,
            rough_surface_gradient: 0.3,
        }
    }
}
