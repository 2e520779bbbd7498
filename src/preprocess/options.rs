use serde::Deserialize;

/// Canonicalisation applied before any descriptor is computed.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    /// Longest working side in pixels; larger frames are downscaled.
    pub max_dimension: usize,
    /// Number of 5-tap Gaussian passes applied to every plane.
    pub denoise_passes: usize,
    pub stretch_low_pct: f32,
    pub stretch_high_pct: f32,
    /// Upper bound on the luminance contrast gain.
    pub max_gain: f32,
    /// A frame is uniform when every channel's percentile range is below this.
    pub uniform_range: f32,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            max_dimension: 480,
            denoise_passes: 1,
            stretch_low_pct: 1.0,
            stretch_high_pct: 99.0,
            max_gain: 4.0,
            uniform_range: 0.02,
        }
    }
}
