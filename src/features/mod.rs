//! Feature extraction: one frame in, one `FeatureSet` out.
//!
//! Stage order:
//! 1. validate the view and canonicalise it (`preprocess`),
//! 2. gradients and NMS edge map on the stretched luminance,
//! 3. texture grid statistics and LSD geometry (skipped on uniform frames),
//! 4. seeded Lab k-means on the denoised colour planes, with per-cluster
//!    spatial and texture summaries.
mod color;
mod geometry;
mod options;
mod texture;
mod types;
pub mod zones;

pub use options::{ColorClusterOptions, ExtractorParams, GeometryOptions, TextureOptions};
pub use types::{
    ColorCluster, FeatureSet, GeometryDescriptor, TextureDescriptor, TextureRegion,
    TextureSignature,
};
pub use zones::zone_label;

use crate::edges::{detect_edges_nms, image_gradients};
use crate::error::AnalysisError;
use crate::image::ImageRgb8;
use crate::preprocess::preprocess;
use color::{cluster_colors, lab_pixels, summarize_clusters, ClusterInputs};
use log::debug;

/// Deterministic descriptor extraction for one frame.
#[derive(Clone, Debug, Default)]
pub struct FeatureExtractor {
    params: ExtractorParams,
}

impl FeatureExtractor {
    pub fn new(params: ExtractorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ExtractorParams {
        &self.params
    }

    /// Fails only when the view cannot describe any pixel.
    pub fn extract(&self, image: &ImageRgb8<'_>) -> Result<FeatureSet, AnalysisError> {
        image
            .validate()
            .map_err(AnalysisError::FeatureExtractionFailed)?;

        let p = &self.params;
        let pre = preprocess(image, &p.preprocess);
        let (w, h) = (pre.width(), pre.height());

        let (texture, geometry, gradient, edge_mask) = if pre.uniform {
            Default::default()
        } else {
            let grad = image_gradients(&pre.luminance, p.texture.kernel);
            let edges = detect_edges_nms(&grad, p.texture.edge_threshold);
            let texture = texture::describe_texture(&grad, &p.texture);
            let geometry = geometry::describe_geometry(&grad, &p.geometry);
            (texture, geometry, grad.mag.data, edges.mask)
        };

        let lab = lab_pixels(&pre.color);
        let clustering = cluster_colors(&lab, &p.color);
        let inputs = ClusterInputs {
            color: &pre.color,
            gradient: (!gradient.is_empty()).then_some(gradient.as_slice()),
            edge_mask: (!edge_mask.is_empty()).then_some(edge_mask.as_slice()),
        };
        let (colors, labels) = summarize_clusters(clustering, &inputs, &p.color);

        debug!(
            "features: {}x{} clusters={} segments={} mean_grad={:.3} uniform={}",
            w,
            h,
            colors.len(),
            geometry.segments.len(),
            texture.mean_gradient,
            pre.uniform
        );

        Ok(FeatureSet {
            width: w,
            height: h,
            scale: pre.scale,
            original_size: pre.original_size,
            uniform: pre.uniform,
            colors,
            texture,
            geometry,
            labels,
        })
    }
}
