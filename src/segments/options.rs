use serde::Deserialize;

/// Options controlling region growth in the LSD-like extractor.
///
/// Thresholds are expressed in working-resolution pixels and in the gain of
/// the normalised Sobel operator.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct LsdOptions {
    /// Minimum gradient magnitude for seed and grown pixels.
    pub magnitude_threshold: f32,
    /// Orientation tolerance around the seed normal in degrees.
    pub angle_tolerance_deg: f32,
    /// Minimum accepted segment length in pixels.
    pub min_length_px: f32,
    /// Regions with fewer pixels are discarded before fitting.
    pub min_region_px: usize,
    pub min_aligned_fraction: f32,
}

impl Default for LsdOptions {
    fn default() -> Self {
        Self {
            magnitude_threshold: 0.15,
            angle_tolerance_deg: 22.5,
            min_length_px: 8.0,
            min_region_px: 12,
            min_aligned_fraction: 0.6,
        }
    }
}
