//! Dominant colours via seeded k-means++ in CIE Lab.
//!
//! Centroids are fitted on a deterministic stride sample and every working
//! pixel is then assigned to its nearest centroid. The RNG only drives the
//! k-means++ seeding, so a fixed seed gives identical clusters run to run.
use super::options::ColorClusterOptions;
use super::types::{ColorCluster, TextureSignature};
use crate::colorspace::{rgb_to_lab, squared_delta_e};
use crate::image::RgbPlanes;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Raw clustering output before per-cluster statistics are attached.
pub(crate) struct Clustering {
    pub centers: Vec<[f32; 3]>,
    /// Per-pixel index into `centers`.
    pub labels: Vec<u8>,
}

/// Lab value of every pixel, row-major.
pub(crate) fn lab_pixels(color: &RgbPlanes) -> Vec<[f32; 3]> {
    let (r, g, b) = (&color.r.data, &color.g.data, &color.b.data);
    (0..r.len())
        .into_par_iter()
        .map(|i| rgb_to_lab([r[i], g[i], b[i]]))
        .collect()
}

pub(crate) fn cluster_colors(lab: &[[f32; 3]], opts: &ColorClusterOptions) -> Clustering {
    let k = opts.k.clamp(1, u8::MAX as usize);
    if lab.is_empty() {
        return Clustering {
            centers: Vec::new(),
            labels: Vec::new(),
        };
    }

    let step = lab.len().div_ceil(opts.max_samples.max(1)).max(1);
    let sample: Vec<[f32; 3]> = lab.iter().step_by(step).copied().collect();

    let mut rng = StdRng::seed_from_u64(opts.seed);
    let mut centers = seed_plus_plus(&sample, k, &mut rng);

    let mut assignment = vec![0usize; sample.len()];
    for _ in 0..opts.max_iterations {
        for (slot, px) in assignment.iter_mut().zip(&sample) {
            *slot = nearest(&centers, *px);
        }
        let mut sums = vec![[0.0f64; 3]; centers.len()];
        let mut counts = vec![0usize; centers.len()];
        for (&c, px) in assignment.iter().zip(&sample) {
            counts[c] += 1;
            for d in 0..3 {
                sums[c][d] += px[d] as f64;
            }
        }
        let mut max_move = 0.0f32;
        for (i, center) in centers.iter_mut().enumerate() {
            if counts[i] == 0 {
                continue;
            }
            let n = counts[i] as f64;
            let updated = [
                (sums[i][0] / n) as f32,
                (sums[i][1] / n) as f32,
                (sums[i][2] / n) as f32,
            ];
            max_move = max_move.max(squared_delta_e(*center, updated).sqrt());
            *center = updated;
        }
        if max_move < opts.convergence_delta_e {
            break;
        }
    }

    let labels: Vec<u8> = lab
        .par_iter()
        .map(|px| nearest(&centers, *px) as u8)
        .collect();
    Clustering { centers, labels }
}

fn seed_plus_plus(sample: &[[f32; 3]], k: usize, rng: &mut StdRng) -> Vec<[f32; 3]> {
    let mut centers = Vec::with_capacity(k);
    centers.push(sample[rng.random_range(0..sample.len())]);
    let mut dist: Vec<f64> = sample
        .iter()
        .map(|px| squared_delta_e(centers[0], *px) as f64)
        .collect();
    while centers.len() < k {
        let total: f64 = dist.iter().sum();
        if total <= f64::EPSILON {
            // Fewer distinct colours than requested clusters.
            break;
        }
        let target = rng.random::<f64>() * total;
        let mut acc = 0.0;
        let mut chosen = dist.len() - 1;
        for (i, &d) in dist.iter().enumerate() {
            acc += d;
            if acc >= target && d > 0.0 {
                chosen = i;
                break;
            }
        }
        let center = sample[chosen];
        centers.push(center);
        for (d, px) in dist.iter_mut().zip(sample) {
            *d = d.min(squared_delta_e(center, *px) as f64);
        }
    }
    centers
}

fn nearest(centers: &[[f32; 3]], px: [f32; 3]) -> usize {
    let mut best = 0;
    let mut best_d = f32::INFINITY;
    for (i, c) in centers.iter().enumerate() {
        let d = squared_delta_e(*c, px);
        if d < best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

/// Per-pixel inputs needed to summarise clusters.
pub(crate) struct ClusterInputs<'a> {
    pub color: &'a RgbPlanes,
    pub gradient: Option<&'a [f32]>,
    pub edge_mask: Option<&'a [bool]>,
}

/// Turn a clustering into sorted `ColorCluster`s, dropping empty clusters and
/// relabelling pixels to the sorted order.
pub(crate) fn summarize_clusters(
    clustering: Clustering,
    inputs: &ClusterInputs<'_>,
    opts: &ColorClusterOptions,
) -> (Vec<ColorCluster>, Vec<u8>) {
    let w = inputs.color.width();
    let h = inputs.color.height();
    let n = w * h;
    let k = clustering.centers.len();
    if n == 0 || k == 0 {
        return (Vec::new(), Vec::new());
    }

    let mut acc = vec![ClusterAccumulator::new(w, h); k];
    for (i, &label) in clustering.labels.iter().enumerate() {
        let (x, y) = (i % w, i / w);
        let a = &mut acc[label as usize];
        a.count += 1;
        a.rgb[0] += inputs.color.r.data[i] as f64;
        a.rgb[1] += inputs.color.g.data[i] as f64;
        a.rgb[2] += inputs.color.b.data[i] as f64;
        a.sum_x += x as f64 + 0.5;
        a.sum_y += y as f64 + 0.5;
        a.hist_x[x] += 1;
        a.hist_y[y] += 1;
        if let Some(grad) = inputs.gradient {
            a.sum_grad += grad[i] as f64;
        }
        if inputs.edge_mask.is_some_and(|m| m[i]) {
            a.edges += 1;
        }
    }

    let mut clusters: Vec<(usize, ColorCluster)> = acc
        .iter()
        .enumerate()
        .filter(|(_, a)| a.count > 0)
        .map(|(idx, a)| (idx, a.finish(clustering.centers[idx], n, opts)))
        .collect();
    clusters.sort_by(|a, b| {
        b.1.share
            .total_cmp(&a.1.share)
            .then_with(|| a.1.rgb.cmp(&b.1.rgb))
    });

    let mut remap = vec![0u8; k];
    for (new_idx, (old_idx, _)) in clusters.iter().enumerate() {
        remap[*old_idx] = new_idx as u8;
    }
    let labels = clustering
        .labels
        .iter()
        .map(|&l| remap[l as usize])
        .collect();
    (clusters.into_iter().map(|(_, c)| c).collect(), labels)
}

#[derive(Clone)]
struct ClusterAccumulator {
    count: usize,
    rgb: [f64; 3],
    sum_x: f64,
    sum_y: f64,
    hist_x: Vec<u32>,
    hist_y: Vec<u32>,
    sum_grad: f64,
    edges: usize,
}

impl ClusterAccumulator {
    fn new(w: usize, h: usize) -> Self {
        Self {
            count: 0,
            rgb: [0.0; 3],
            sum_x: 0.0,
            sum_y: 0.0,
            hist_x: vec![0; w],
            hist_y: vec![0; h],
            sum_grad: 0.0,
            edges: 0,
        }
    }

    fn finish(&self, lab: [f32; 3], total: usize, opts: &ColorClusterOptions) -> ColorCluster {
        let n = self.count as f64;
        let to_u8 = |v: f64| ((v / n) * 255.0).round().clamp(0.0, 255.0) as u8;
        let (w, h) = (self.hist_x.len() as f32, self.hist_y.len() as f32);
        let x0 = hist_percentile(&self.hist_x, self.count, opts.bbox_low_pct);
        let x1 = hist_percentile(&self.hist_x, self.count, opts.bbox_high_pct);
        let y0 = hist_percentile(&self.hist_y, self.count, opts.bbox_low_pct);
        let y1 = hist_percentile(&self.hist_y, self.count, opts.bbox_high_pct);
        ColorCluster {
            rgb: [to_u8(self.rgb[0]), to_u8(self.rgb[1]), to_u8(self.rgb[2])],
            lab,
            share: self.count as f32 / total as f32,
            centroid: [(self.sum_x / n) as f32 / w, (self.sum_y / n) as f32 / h],
            bbox: [x0 as f32 / w, y0 as f32 / h, (x1 + 1) as f32 / w, (y1 + 1) as f32 / h],
            texture: TextureSignature {
                mean_gradient: (self.sum_grad / n) as f32,
                edge_fraction: self.edges as f32 / self.count as f32,
            },
        }
    }
}

fn hist_percentile(hist: &[u32], count: usize, pct: f32) -> usize {
    let target = ((pct.clamp(0.0, 100.0) / 100.0) * (count.saturating_sub(1)) as f32).round() as u64;
    let mut seen = 0u64;
    for (i, &c) in hist.iter().enumerate() {
        seen += c as u64;
        if seen > target {
            return i;
        }
    }
    hist.len().saturating_sub(1)
}
