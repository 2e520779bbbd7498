//! Material identification from colour clusters and texture signatures.
//!
//! Every significant colour cluster is scored against each knowledge-base
//! material and goes to the best one. The colour score measures how far the
//! cluster centroid sits from the material's RGB boxes in ΔE; the texture
//! score compares the cluster's own gradient signature with the material's
//! reference textures. A material reports the combined share of its clusters
//! and takes confidence, location and colour from its strongest one.
mod params;

pub use params::MatcherParams;

use crate::colorspace::delta_e_to_box;
use crate::features::{zone_label, ColorCluster, FeatureSet};
use crate::knowledge::{KnowledgeBase, MaterialSpec};
use crate::types::{report_order, Material};
use log::debug;
use std::collections::BTreeMap;

/// A reported material together with the clusters assigned to it.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialMatch {
    pub material: Material,
    /// Indices into `FeatureSet::colors`, strongest first.
    pub clusters: Vec<usize>,
}

/// Combined score of one material against one cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterScore {
    pub color: f32,
    pub texture: f32,
    pub texture_label: String,
    pub confidence: f32,
}

pub struct MaterialMatcher<'a> {
    kb: &'a KnowledgeBase,
    params: &'a MatcherParams,
}

impl<'a> MaterialMatcher<'a> {
    pub fn new(kb: &'a KnowledgeBase, params: &'a MatcherParams) -> Self {
        Self { kb, params }
    }

    /// Reported materials, strongest first.
    pub fn match_materials(&self, features: &FeatureSet) -> Vec<Material> {
        self.match_clusters(features)
            .into_iter()
            .map(|m| m.material)
            .collect()
    }

    /// Like `match_materials` but keeps the assigned cluster indices.
    pub fn match_clusters(&self, features: &FeatureSet) -> Vec<MaterialMatch> {
        if features.texture.is_empty() {
            debug!("matcher: no texture descriptor, colour alone is not accepted");
            return Vec::new();
        }
        // Material name -> (spec, cluster, score) per assigned cluster.
        let mut assigned: BTreeMap<&str, Vec<(&MaterialSpec, usize, ClusterScore)>> = BTreeMap::new();
        for (idx, cluster) in features.colors.iter().enumerate() {
            if cluster.share < self.params.min_cluster_share {
                continue;
            }
            if let Some((spec, score)) = self.best_for_cluster(cluster) {
                assigned
                    .entry(spec.name.as_str())
                    .or_default()
                    .push((spec, idx, score));
            }
        }
        let mut matches: Vec<MaterialMatch> = assigned
            .into_values()
            .filter_map(|group| self.merge(group, &features.colors))
            .collect();
        matches.sort_by(|a, b| {
            report_order(
                (a.material.confidence, a.material.matched_share, &a.material.name),
                (b.material.confidence, b.material.matched_share, &b.material.name),
            )
        });
        debug!(
            "matcher: {} of {} materials accepted",
            matches.len(),
            self.kb.materials.len()
        );
        matches
    }

    fn merge(
        &self,
        mut group: Vec<(&MaterialSpec, usize, ClusterScore)>,
        clusters: &[ColorCluster],
    ) -> Option<MaterialMatch> {
        group.sort_by(|a, b| {
            b.2.confidence
                .total_cmp(&a.2.confidence)
                .then_with(|| clusters[b.1].share.total_cmp(&clusters[a.1].share))
                .then_with(|| a.1.cmp(&b.1))
        });
        let (spec, lead, score) = group.first()?;
        let cluster = &clusters[*lead];
        let share: f32 = group.iter().map(|(_, i, _)| clusters[*i].share).sum();
        let [r, g, b] = cluster.rgb;
        Some(MaterialMatch {
            material: Material {
                name: spec.name.clone(),
                confidence: score.confidence,
                quantity: format!("{:.1}% of visible area", share * 100.0),
                location: zone_label(cluster.centroid).to_string(),
                properties: spec.properties.clone(),
                color_info: Some(format!("RGB: [{r}, {g}, {b}]")),
                texture: Some(score.texture_label.clone()),
                matched_share: share,
            },
            clusters: group.iter().map(|(_, i, _)| *i).collect(),
        })
    }

    /// Score `spec` against a single cluster.
    pub fn score(&self, spec: &MaterialSpec, cluster: &ColorCluster) -> ClusterScore {
        self.finish_score(spec, cluster, self.color_score(spec, cluster.rgb))
    }

    /// Best knowledge-base material for a cluster, if it clears the threshold.
    pub fn best_for_cluster(&self, cluster: &ColorCluster) -> Option<(&'a MaterialSpec, ClusterScore)> {
        self.kb
            .materials
            .iter()
            .map(|spec| (spec, self.score(spec, cluster)))
            .filter(|(_, s)| s.confidence >= self.params.acceptance_threshold)
            .max_by(|a, b| {
                a.1.confidence
                    .total_cmp(&b.1.confidence)
                    .then_with(|| b.0.name.cmp(&a.0.name))
            })
    }

    fn color_score(&self, spec: &MaterialSpec, rgb: [u8; 3]) -> f32 {
        let norm = self.params.delta_e_norm.max(1e-3);
        spec.color_ranges
            .iter()
            .map(|r| 1.0 - (delta_e_to_box(rgb, r.lo, r.hi) / norm).min(1.0))
            .fold(0.0, f32::max)
    }

    fn finish_score(&self, spec: &MaterialSpec, cluster: &ColorCluster, color: f32) -> ClusterScore {
        let scale = self.params.texture_scale.max(1e-6);
        let (texture, label) = spec
            .textures
            .iter()
            .map(|t| {
                let dm = (cluster.texture.mean_gradient - t.mean_gradient) / scale;
                let de = (cluster.texture.edge_fraction - t.edge_fraction) / scale;
                (1.0 - (dm * dm + de * de).sqrt().min(1.0), t.label.as_str())
            })
            .fold((0.0f32, ""), |best, cur| if cur.0 > best.0 { cur } else { best });
        let (cw, tw) = (self.params.color_weight, self.params.texture_weight);
        let total = (cw + tw).max(1e-6);
        let confidence = ((cw * color + tw * texture) / total).clamp(0.0, 1.0);
        let label = if label.is_empty() {
            spec.textures.first().map(|t| t.label.as_str()).unwrap_or("unknown")
        } else {
            label
        };
        ClusterScore {
            color,
            texture,
            texture_label: label.to_string(),
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{TextureDescriptor, TextureRegion, TextureSignature};

    fn cluster(rgb: [u8; 3], share: f32, texture: TextureSignature) -> ColorCluster {
        ColorCluster {
            rgb,
            lab: crate::colorspace::rgb8_to_lab(rgb),
            share,
            centroid: [0.5, 0.5],
            bbox: [0.0, 0.0, 1.0, 1.0],
            texture,
        }
    }

    fn features(colors: Vec<ColorCluster>) -> FeatureSet {
        FeatureSet {
            width: 100,
            height: 100,
            scale: 1.0,
            original_size: (100, 100),
            colors,
            texture: TextureDescriptor {
                cols: 1,
                rows: 1,
                regions: vec![TextureRegion::default()],
                ..TextureDescriptor::default()
            },
            ..FeatureSet::default()
        }
    }

    const SMOOTH: TextureSignature = TextureSignature {
        mean_gradient: 0.03,
        edge_fraction: 0.02,
    };

    #[test]
    fn smooth_gray_matches_concrete() {
        let kb = KnowledgeBase::builtin().expect("kb");
        let params = MatcherParams::default();
        let matcher = MaterialMatcher::new(&kb, &params);
        let found = matcher.match_materials(&features(vec![cluster([140, 140, 140], 0.9, SMOOTH)]));
        let concrete = found.iter().find(|m| m.name == "concrete").expect("concrete");
        assert!((concrete.confidence - 1.0).abs() < 1e-5);
        assert_eq!(concrete.texture.as_deref(), Some("smooth"));
        assert_eq!(concrete.quantity, "90.0% of visible area");
        assert_eq!(concrete.color_info.as_deref(), Some("RGB: [140, 140, 140]"));
        assert_eq!(concrete.location, "primary structural areas");
        assert_eq!(found[0].name, "concrete");
        assert!(found.windows(2).all(|w| w[0].confidence >= w[1].confidence));
    }

    #[test]
    fn each_cluster_reports_a_single_material() {
        let kb = KnowledgeBase::builtin().expect("kb");
        let params = MatcherParams::default();
        let matcher = MaterialMatcher::new(&kb, &params);
        // Inside both the concrete and the steel colour box.
        let found = matcher.match_materials(&features(vec![cluster([160, 160, 160], 0.8, SMOOTH)]));
        let names: Vec<_> = found.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["concrete"]);
    }

    #[test]
    fn clusters_of_one_material_pool_their_share() {
        let kb = KnowledgeBase::builtin().expect("kb");
        let params = MatcherParams::default();
        let matcher = MaterialMatcher::new(&kb, &params);
        let fs = features(vec![
            cluster([140, 140, 140], 0.5, SMOOTH),
            cluster([120, 120, 120], 0.3, SMOOTH),
        ]);
        let matches = matcher.match_clusters(&fs);
        assert_eq!(matches.len(), 1);
        let concrete = &matches[0];
        assert_eq!(concrete.material.name, "concrete");
        assert_eq!(concrete.clusters, [0, 1]);
        assert_eq!(concrete.material.quantity, "80.0% of visible area");
        assert_eq!(concrete.material.color_info.as_deref(), Some("RGB: [140, 140, 140]"));
        let total: f32 = matches.iter().map(|m| m.material.matched_share).sum();
        assert!(total <= 1.0);
    }

    #[test]
    fn small_clusters_and_empty_texture_are_ignored() {
        let kb = KnowledgeBase::builtin().expect("kb");
        let params = MatcherParams::default();
        let matcher = MaterialMatcher::new(&kb, &params);
        assert!(matcher
            .match_materials(&features(vec![cluster([140, 140, 140], 0.01, SMOOTH)]))
            .is_empty());

        let mut fs = features(vec![cluster([140, 140, 140], 0.9, SMOOTH)]);
        fs.texture = TextureDescriptor::default();
        assert!(matcher.match_materials(&fs).is_empty());
    }

    #[test]
    fn far_colour_and_texture_is_rejected() {
        let kb = KnowledgeBase::builtin().expect("kb");
        let params = MatcherParams::default();
        let matcher = MaterialMatcher::new(&kb, &params);
        let noisy = TextureSignature {
            mean_gradient: 0.9,
            edge_fraction: 0.9,
        };
        let found = matcher.match_materials(&features(vec![cluster([20, 160, 40], 0.9, noisy)]));
        assert!(found.is_empty(), "unexpected {found:?}");
    }

    #[test]
    fn brick_prefers_reddish_cluster() {
        let kb = KnowledgeBase::builtin().expect("kb");
        let params = MatcherParams::default();
        let matcher = MaterialMatcher::new(&kb, &params);
        let rough = TextureSignature {
            mean_gradient: 0.3,
            edge_fraction: 0.22,
        };
        let fs = features(vec![
            cluster([150, 150, 150], 0.6, SMOOTH),
            cluster([150, 75, 55], 0.3, rough),
        ]);
        let matches = matcher.match_clusters(&fs);
        let brick = matches
            .iter()
            .find(|m| m.material.name == "brick")
            .expect("brick");
        assert_eq!(brick.clusters, [1]);
        assert_eq!(brick.material.texture.as_deref(), Some("rough"));
    }
}
