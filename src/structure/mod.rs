//! Structural component detection from line geometry and texture.
//!
//! Each knowledge-base component carries a geometric signature; the matching
//! rule turns segments (or flat texture cells) into raw detections, which are
//! then scored for dimensional plausibility, graded for condition and placed
//! in a frame zone. Material attribution happens afterwards, once the
//! material matches for the same frame are known.
mod assess;
mod cluster1d;
mod members;
mod params;
mod planar;
mod truss;

pub use params::DetectorParams;

use crate::features::{zone_label, FeatureSet};
use crate::knowledge::{ComponentSignature, ComponentSpec, KnowledgeBase};
use crate::matching::{MaterialMatch, MaterialMatcher};
use crate::types::{report_order, sort_components, StructuralComponent};
use assess::{condition_for, plausibility, MetricScale};
use log::debug;
use members::{detect_members, MemberRule};
use planar::{detect_planar, PlanarRule};
use std::collections::BTreeMap;
use truss::detect_triangulated;

/// Material name used when no cluster explains a component's pixels.
pub const UNIDENTIFIED_MATERIAL: &str = "unidentified";

/// Output of one signature rule before knowledge-base scoring.
pub(crate) struct RawDetection {
    pub dimensions: BTreeMap<String, f32>,
    /// Working-pixel `[x0, y0, x1, y1]`.
    pub support: [f32; 4],
    pub base_confidence: f32,
    pub irregularity: f32,
    pub features: Vec<String>,
}

/// A scored component still waiting for its material.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentCandidate {
    pub component: StructuralComponent,
    /// Working-pixel `[x0, y0, x1, y1]` that supports the detection.
    pub support: [f32; 4],
}

pub struct StructuralComponentDetector<'a> {
    kb: &'a KnowledgeBase,
    params: &'a DetectorParams,
}

impl<'a> StructuralComponentDetector<'a> {
    pub fn new(kb: &'a KnowledgeBase, params: &'a DetectorParams) -> Self {
        Self { kb, params }
    }

    /// Accepted candidates across all component types, strongest first.
    pub fn detect(&self, features: &FeatureSet) -> Vec<ComponentCandidate> {
        if features.width == 0 || features.height == 0 {
            return Vec::new();
        }
        let scale = MetricScale::new(self.params, features.width, features.scale);
        let mut out = Vec::new();
        for spec in &self.kb.components {
            let raw = self.run_rule(spec, features, &scale);
            let found = raw.len();
            let mut accepted: Vec<ComponentCandidate> = raw
                .into_iter()
                .filter_map(|d| self.finish(spec, d, features, &scale))
                .collect();
            accepted.sort_by(candidate_order);
            accepted.truncate(self.params.max_per_type);
            debug!(
                "structure: {} raw={} accepted={}",
                spec.component_type,
                found,
                accepted.len()
            );
            out.extend(accepted);
        }
        out.sort_by(candidate_order);
        out
    }

    /// Attach a material to every candidate: the dominant colour cluster of
    /// its support region decides, preferring an already reported match.
    pub fn attribute_materials(
        &self,
        candidates: Vec<ComponentCandidate>,
        features: &FeatureSet,
        matches: &[MaterialMatch],
        matcher: &MaterialMatcher<'_>,
    ) -> Vec<StructuralComponent> {
        let mut components: Vec<StructuralComponent> = candidates
            .into_iter()
            .map(|c| {
                let [x0, y0, x1, y1] = c.support;
                let material = features
                    .dominant_cluster_in(x0, y0, x1, y1)
                    .and_then(|(idx, _)| {
                        matches
                            .iter()
                            .find(|m| m.clusters.contains(&idx))
                            .map(|m| m.material.name.clone())
                            .or_else(|| {
                                let cluster = features.colors.get(idx)?;
                                matcher.best_for_cluster(cluster).map(|(spec, _)| spec.name.clone())
                            })
                    })
                    .unwrap_or_else(|| UNIDENTIFIED_MATERIAL.to_string());
                let mut component = c.component;
                if let Some(spec) = self.kb.component(&component.component_type) {
                    component.construction_method = spec.method_for(&material).to_string();
                }
                component.material = material;
                component
            })
            .collect();
        sort_components(&mut components);
        components
    }

    /// `detect` followed by `attribute_materials`.
    pub fn detect_components(
        &self,
        features: &FeatureSet,
        matches: &[MaterialMatch],
        matcher: &MaterialMatcher<'_>,
    ) -> Vec<StructuralComponent> {
        let candidates = self.detect(features);
        self.attribute_materials(candidates, features, matches, matcher)
    }

    fn run_rule(&self, spec: &ComponentSpec, f: &FeatureSet, scale: &MetricScale) -> Vec<RawDetection> {
        let size = (f.width, f.height);
        let segments = &f.geometry.segments;
        match &spec.signature {
            ComponentSignature::ParallelMembers {
                axis,
                min_length_frac,
                max_thickness_frac,
                min_members,
            } => {
                let rule = MemberRule {
                    axis: *axis,
                    min_length_frac: *min_length_frac,
                    max_thickness_frac: *max_thickness_frac,
                    min_members: *min_members,
                };
                detect_members(segments, size, &rule, self.params, scale)
            }
            ComponentSignature::Triangulated {
                min_length_frac,
                min_per_direction,
            } => detect_triangulated(
                segments,
                size,
                *min_length_frac,
                *min_per_direction,
                self.params.orientation_tolerance_deg,
                scale,
            )
            .into_iter()
            .collect(),
            ComponentSignature::Planar {
                max_mean_gradient,
                min_coverage,
                min_segments,
            } => {
                let rule = PlanarRule {
                    max_mean_gradient: *max_mean_gradient,
                    min_coverage: *min_coverage,
                    min_segments: *min_segments,
                };
                detect_planar(&f.texture, segments.len(), size, &rule, scale)
                    .into_iter()
                    .collect()
            }
        }
    }

    fn finish(
        &self,
        spec: &ComponentSpec,
        d: RawDetection,
        f: &FeatureSet,
        scale: &MetricScale,
    ) -> Option<ComponentCandidate> {
        let confidence =
            (d.base_confidence * (0.8 + 0.2 * plausibility(spec, &d.dimensions))).clamp(0.0, 1.0);
        if !confidence.is_finite() || confidence < self.params.acceptance_threshold {
            return None;
        }
        let (w, h) = (f.width as f32, f.height as f32);
        let [x0, y0, x1, y1] = d.support;
        let centre = [0.5 * (x0 + x1) / w, 0.5 * (y0 + y1) / h];
        let area = ((x1 - x0).max(0.0) * (y1 - y0).max(0.0)) / (w * h);

        let mut notable_features = Vec::with_capacity(d.features.len() + 2);
        if spec.load_bearing {
            notable_features.push("load-bearing".to_string());
        }
        notable_features.extend(d.features);
        if !scale.calibrated {
            notable_features.push("approximate dimensions".to_string());
        }

        Some(ComponentCandidate {
            component: StructuralComponent {
                component_type: spec.component_type.clone(),
                material: UNIDENTIFIED_MATERIAL.to_string(),
                dimensions: d.dimensions,
                location: zone_label(centre).to_string(),
                construction_method: spec.default_method.clone(),
                condition: condition_for(d.irregularity, &self.params.condition_thresholds),
                confidence,
                notable_features,
                matched_share: area.clamp(0.0, 1.0),
            },
            support: d.support,
        })
    }
}

fn candidate_order(a: &ComponentCandidate, b: &ComponentCandidate) -> std::cmp::Ordering {
    let (ca, cb) = (&a.component, &b.component);
    report_order(
        (ca.confidence, ca.matched_share, &ca.component_type),
        (cb.confidence, cb.matched_share, &cb.component_type),
    )
    .then_with(|| a.support[1].total_cmp(&b.support[1]))
    .then_with(|| a.support[0].total_cmp(&b.support[0]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{ColorCluster, TextureDescriptor, TextureRegion, TextureSignature};
    use crate::matching::MatcherParams;
    use crate::segments::LineSegment;
    use crate::types::Condition;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::builtin().expect("builtin knowledge base")
    }

    fn beam_frame() -> FeatureSet {
        let (w, h) = (320usize, 240usize);
        let mut segments = Vec::new();
        let mut labels = vec![0u8; w * h];
        for y in [40usize, 90, 140, 190] {
            let (top, bottom) = (y as f32, (y + 8) as f32);
            segments.push(LineSegment::new([20.0, top], [300.0, top], 0.45, 560));
            segments.push(LineSegment::new([20.0, bottom], [300.0, bottom], 0.45, 560));
            for row in y..y + 8 {
                for label in &mut labels[row * w + 20..row * w + 300] {
                    *label = 1;
                }
            }
        }
        let texture_sig = TextureSignature {
            mean_gradient: 0.05,
            edge_fraction: 0.03,
        };
        let cluster = |rgb: [u8; 3], share: f32| ColorCluster {
            rgb,
            lab: crate::colorspace::rgb8_to_lab(rgb),
            share,
            centroid: [0.5, 0.5],
            bbox: [0.0, 0.0, 1.0, 1.0],
            texture: texture_sig,
        };
        let mut f = FeatureSet {
            width: w,
            height: h,
            scale: 1.0,
            original_size: (w, h),
            colors: vec![cluster([220, 220, 220], 0.88), cluster([140, 140, 140], 0.12)],
            texture: TextureDescriptor {
                cols: 1,
                rows: 1,
                regions: vec![TextureRegion {
                    mean: 0.08,
                    variance: 0.01,
                }],
                mean_gradient: 0.08,
            },
            labels,
            ..FeatureSet::default()
        };
        f.geometry.segments = segments;
        f
    }

    #[test]
    fn evenly_spaced_bars_become_beams() {
        let kb = kb();
        let params = DetectorParams::default();
        let detector = StructuralComponentDetector::new(&kb, &params);
        let candidates = detector.detect(&beam_frame());
        let beams: Vec<_> = candidates
            .iter()
            .filter(|c| c.component.component_type == "beam")
            .collect();
        assert_eq!(beams.len(), 4);
        for c in &beams {
            let b = &c.component;
            assert_eq!(b.condition, Condition::Excellent);
            assert!(b.confidence >= 0.3 && b.confidence <= 1.0);
            assert!(b.notable_features.iter().any(|f| f == "regular spacing"));
            assert!(b.notable_features.iter().any(|f| f == "approximate dimensions"));
            assert_eq!(b.notable_features[0], "load-bearing");
        }
        assert!(candidates
            .iter()
            .all(|c| c.component.component_type != "column"));
    }

    #[test]
    fn beams_take_the_material_of_their_pixels() {
        let kb = kb();
        let params = DetectorParams::default();
        let matcher_params = MatcherParams::default();
        let matcher = MaterialMatcher::new(&kb, &matcher_params);
        let detector = StructuralComponentDetector::new(&kb, &params);
        let f = beam_frame();
        let components = detector.detect_components(&f, &[], &matcher);
        let beam = components
            .iter()
            .find(|c| c.component_type == "beam")
            .expect("beam");
        assert_eq!(beam.material, "concrete");
        assert_eq!(beam.construction_method, kb.component("beam").expect("beam").method_for("concrete"));
    }

    #[test]
    fn reported_matches_take_precedence_for_attribution() {
        let kb = kb();
        let params = DetectorParams::default();
        let matcher_params = MatcherParams::default();
        let matcher = MaterialMatcher::new(&kb, &matcher_params);
        let detector = StructuralComponentDetector::new(&kb, &params);
        let f = beam_frame();
        let mut matches = matcher.match_clusters(&f);
        let slab = matches
            .iter_mut()
            .find(|m| m.clusters.contains(&1))
            .expect("beam pixels are matched");
        assert_eq!(slab.material.name, "concrete");
        slab.material.name = "steel".into();
        let components = detector.detect_components(&f, &matches, &matcher);
        let beam = components
            .iter()
            .find(|c| c.component_type == "beam")
            .expect("beam");
        assert_eq!(beam.material, "steel");
        assert_eq!(beam.construction_method, kb.component("beam").expect("beam").method_for("steel"));
    }

    #[test]
    fn empty_geometry_detects_nothing() {
        let kb = kb();
        let params = DetectorParams::default();
        let detector = StructuralComponentDetector::new(&kb, &params);
        assert!(detector.detect(&FeatureSet::default()).is_empty());
    }

    #[test]
    fn acceptance_threshold_filters_everything_when_raised() {
        let kb = kb();
        let params = DetectorParams {
            acceptance_threshold: 1.01,
            ..DetectorParams::default()
        };
        let detector = StructuralComponentDetector::new(&kb, &params);
        assert!(detector.detect(&beam_frame()).is_empty());
    }

    #[test]
    fn calibration_drops_the_approximation_note() {
        let kb = kb();
        let params = DetectorParams {
            pixels_per_meter: Some(16.0),
            ..DetectorParams::default()
        };
        let detector = StructuralComponentDetector::new(&kb, &params);
        let candidates = detector.detect(&beam_frame());
        let beam = candidates
            .iter()
            .find(|c| c.component.component_type == "beam")
            .expect("beam");
        assert!(!beam
            .component
            .notable_features
            .iter()
            .any(|f| f == "approximate dimensions"));
        assert!((beam.component.dimensions["length"] - 17.5).abs() < 1e-4);
    }
}
