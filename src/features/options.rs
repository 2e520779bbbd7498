use crate::edges::GradientKernel;
use crate::preprocess::PreprocessOptions;
use crate::segments::LsdOptions;
use serde::Deserialize;

/// Tunables for the feature extraction stage.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExtractorParams {
    pub preprocess: PreprocessOptions,
    pub color: ColorClusterOptions,
    pub texture: TextureOptions,
    pub geometry: GeometryOptions,
}

/// Seeded k-means in CIE Lab.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ColorClusterOptions {
    pub k: usize,
    pub seed: u64,
    pub max_iterations: usize,
    /// Lloyd iterations stop once no centroid moves more than this (ΔE).
    pub convergence_delta_e: f32,
    /// Upper bound on the stride sample used to fit centroids.
    pub max_samples: usize,
    pub bbox_low_pct: f32,
    pub bbox_high_pct: f32,
}

impl Default for ColorClusterOptions {
    fn default() -> Self {
        Self {
            k: 6,
            seed: 42,
            max_iterations: 25,
            convergence_delta_e: 0.5,
            max_samples: 8192,
            bbox_low_pct: 5.0,
            bbox_high_pct: 95.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TextureOptions {
    pub grid_cols: usize,
    pub grid_rows: usize,
    pub kernel: GradientKernel,
    /// NMS magnitude threshold for the edge map.
    pub edge_threshold: f32,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            grid_cols: 4,
            grid_rows: 4,
            kernel: GradientKernel::Sobel,
            edge_threshold: 0.2,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GeometryOptions {
    pub lsd: LsdOptions,
    /// Segments within this many degrees of horizontal/vertical count as aligned.
    pub alignment_tolerance_deg: f32,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            lsd: LsdOptions::default(),
            alignment_tolerance_deg: 10.0,
        }
    }
}
