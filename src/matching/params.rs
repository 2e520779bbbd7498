use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MatcherParams {
    pub color_weight: f32,
    pub texture_weight: f32,
    /// Materials scoring below this are not reported.
    pub acceptance_threshold: f32,
    /// ΔE at which the colour score reaches zero.
    pub delta_e_norm: f32,
    /// Clusters covering less of the frame are not considered.
    pub min_cluster_share: f32,
    /// Per-dimension scale of the texture signature distance.
    pub texture_scale: f32,
}

impl Default for MatcherParams {
    fn default() -> Self {
        Self {
            color_weight: 0.6,
            texture_weight: 0.4,
            acceptance_threshold: 0.3,
            delta_e_norm: 40.0,
            min_cluster_share: 0.05,
            texture_scale: 0.1,
        }
    }
}
