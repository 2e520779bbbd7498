//! Planar rule: a large share of flat texture cells bounded by a few edges.
use super::assess::MetricScale;
use super::RawDetection;
use crate::features::TextureDescriptor;
use std::collections::BTreeMap;

pub(super) struct PlanarRule {
    pub max_mean_gradient: f32,
    pub min_coverage: f32,
    pub min_segments: usize,
}

pub(super) fn detect_planar(
    texture: &TextureDescriptor,
    segment_count: usize,
    size: (usize, usize),
    rule: &PlanarRule,
    scale: &MetricScale,
) -> Option<RawDetection> {
    if texture.is_empty() || texture.cols == 0 || texture.rows == 0 {
        return None;
    }
    if segment_count < rule.min_segments {
        return None;
    }
    // (cell index, mean, within-cell std) of the flat cells.
    let flat: Vec<(usize, f32, f32)> = texture
        .regions
        .iter()
        .enumerate()
        .filter(|(_, r)| r.mean < rule.max_mean_gradient)
        .map(|(i, r)| (i, r.mean, r.variance.max(0.0).sqrt()))
        .collect();
    let coverage = flat.len() as f32 / texture.regions.len() as f32;
    if flat.is_empty() || coverage < rule.min_coverage {
        return None;
    }

    let (w, h) = (size.0 as f32, size.1 as f32);
    let cell_w = w / texture.cols as f32;
    let cell_h = h / texture.rows as f32;
    let mut support = [f32::INFINITY, f32::INFINITY, 0.0f32, 0.0f32];
    for &(i, _, _) in &flat {
        let (gx, gy) = ((i % texture.cols) as f32, (i / texture.cols) as f32);
        support[0] = support[0].min(gx * cell_w);
        support[1] = support[1].min(gy * cell_h);
        support[2] = support[2].max((gx + 1.0) * cell_w);
        support[3] = support[3].max((gy + 1.0) * cell_h);
    }

    let n = flat.len() as f32;
    let mean = flat.iter().map(|(_, m, _)| m).sum::<f32>() / n;
    let spread = (flat.iter().map(|(_, m, _)| (m - mean) * (m - mean)).sum::<f32>() / n).sqrt();
    let roughness = flat.iter().map(|(_, _, s)| s).sum::<f32>() / n;
    let max_mean = rule.max_mean_gradient.max(1e-6);
    let flatness = (1.0 - mean / max_mean).clamp(0.0, 1.0);
    let bounded = (segment_count as f32 / (2 * rule.min_segments.max(1)) as f32).min(1.0);
    let base = 0.5 * coverage + 0.3 * flatness + 0.2 * bounded;
    // Uneven cells and rough cells both read as surface wear.
    let irregularity = 0.4 * (1.0 - coverage)
        + 0.3 * (spread / max_mean).min(1.0)
        + 0.3 * (roughness / max_mean).min(1.0);

    let mut dimensions = BTreeMap::new();
    dimensions.insert("length".to_string(), scale.metres(support[2] - support[0]));
    dimensions.insert("height".to_string(), scale.metres(support[3] - support[1]));

    Some(RawDetection {
        dimensions,
        support,
        base_confidence: base,
        irregularity,
        features: vec!["continuous surface".to_string()],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::TextureRegion;
    use crate::structure::params::DetectorParams;

    fn grid(means: &[f32]) -> TextureDescriptor {
        grid_with_variance(means, 0.0)
    }

    fn grid_with_variance(means: &[f32], variance: f32) -> TextureDescriptor {
        TextureDescriptor {
            cols: 2,
            rows: 2,
            regions: means
                .iter()
                .map(|&mean| TextureRegion { mean, variance })
                .collect(),
            ..TextureDescriptor::default()
        }
    }

    fn rule() -> PlanarRule {
        PlanarRule {
            max_mean_gradient: 0.06,
            min_coverage: 0.25,
            min_segments: 2,
        }
    }

    #[test]
    fn flat_cells_bound_the_surface() {
        let params = DetectorParams::default();
        let scale = MetricScale::new(&params, 200, 1.0);
        let found = detect_planar(&grid(&[0.01, 0.2, 0.01, 0.2]), 4, (200, 100), &rule(), &scale)
            .expect("planar");
        assert_eq!(found.support, [0.0, 0.0, 100.0, 100.0]);
        assert!((found.dimensions["length"] - 10.0).abs() < 1e-4);
        assert!((found.dimensions["height"] - 10.0).abs() < 1e-4);
        assert_eq!(found.features, vec!["continuous surface".to_string()]);
    }

    #[test]
    fn rough_cells_raise_irregularity() {
        let params = DetectorParams::default();
        let scale = MetricScale::new(&params, 200, 1.0);
        let even = detect_planar(&grid(&[0.02; 4]), 4, (200, 100), &rule(), &scale).expect("even");
        assert!(even.irregularity.abs() < 1e-6);
        // Same cell means, but each cell's gradient spreads by 0.03.
        let rough = grid_with_variance(&[0.02; 4], 0.0009);
        let rough = detect_planar(&rough, 4, (200, 100), &rule(), &scale).expect("rough");
        assert!((rough.irregularity - 0.15).abs() < 1e-4);
        assert!((rough.base_confidence - even.base_confidence).abs() < 1e-6);
    }

    #[test]
    fn busy_or_unbounded_frames_are_rejected() {
        let params = DetectorParams::default();
        let scale = MetricScale::new(&params, 200, 1.0);
        let busy = grid(&[0.2, 0.2, 0.2, 0.2]);
        assert!(detect_planar(&busy, 4, (200, 100), &rule(), &scale).is_none());
        let flat = grid(&[0.01; 4]);
        assert!(detect_planar(&flat, 1, (200, 100), &rule(), &scale).is_none());
        assert!(detect_planar(&TextureDescriptor::default(), 4, (200, 100), &rule(), &scale).is_none());
    }
}
