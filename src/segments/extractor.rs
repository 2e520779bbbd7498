use super::options::LsdOptions;
use super::region_accumulator::RegionAccumulator;
use super::segment::LineSegment;
use crate::angle::{angular_difference, normalize_half_pi};
use crate::edges::Grad;
use rayon::prelude::*;

const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

pub(super) struct LsdExtractor<'a> {
    grad: &'a Grad,
    width: usize,
    height: usize,
    opts: Thresholds,
    /// Undirected gradient orientation per pixel, NaN below the threshold.
    angles: Vec<f32>,
    used: Vec<bool>,
    stack: Vec<usize>,
    region: RegionAccumulator,
}

struct Thresholds {
    magnitude: f32,
    angle_tol: f32,
    aligned_tol: f32,
    min_len: f32,
    min_region: usize,
    min_aligned: f32,
}

impl<'a> LsdExtractor<'a> {
    pub(super) fn new(grad: &'a Grad, options: &LsdOptions) -> Self {
        let (width, height) = (grad.width(), grad.height());
        let angle_tol = options.angle_tolerance_deg.to_radians();
        let magnitude = options.magnitude_threshold;
        let angles = grad
            .mag
            .data
            .par_iter()
            .zip(grad.gx.data.par_iter().zip(grad.gy.data.par_iter()))
            .map(|(&m, (&gx, &gy))| {
                if m >= magnitude {
                    normalize_half_pi(gy.atan2(gx))
                } else {
                    f32::NAN
                }
            })
            .collect();
        Self {
            grad,
            width,
            height,
            opts: Thresholds {
                magnitude,
                angle_tol,
                aligned_tol: angle_tol * 0.5,
                min_len: options.min_length_px,
                min_region: options.min_region_px.max(2),
                min_aligned: options.min_aligned_fraction,
            },
            angles,
            used: vec![false; width * height],
            stack: Vec::with_capacity(64),
            region: RegionAccumulator::with_capacity(128),
        }
    }

    /// Seeds are visited strongest first (ties in raster order), so regions
    /// start on the crest of an edge rather than at its corners.
    fn seed_order(&self) -> Vec<usize> {
        let mag = &self.grad.mag.data;
        let mut seeds: Vec<usize> = (0..mag.len())
            .filter(|&i| mag[i] >= self.opts.magnitude)
            .collect();
        seeds.sort_by(|&a, &b| mag[b].total_cmp(&mag[a]).then(a.cmp(&b)));
        seeds
    }

    pub(super) fn extract(mut self) -> Vec<LineSegment> {
        let mut segments = Vec::new();
        for seed in self.seed_order() {
            if self.used[seed] {
                continue;
            }
            self.grow_from(seed);
            match self.build_segment() {
                Some(segment) => segments.push(segment),
                None => {
                    self.region.release_flags(&mut self.used);
                    // Keep the seed consumed so the same region is not regrown.
                    self.used[seed] = true;
                }
            }
        }
        segments
    }

    fn grow_from(&mut self, seed: usize) {
        self.region.reset();
        self.stack.clear();
        let seed_angle = self.angles[seed];
        self.used[seed] = true;
        self.stack.push(seed);

        while let Some(idx) = self.stack.pop() {
            let (x, y) = (idx % self.width, idx / self.width);
            let aligned = angular_difference(self.angles[idx], seed_angle) <= self.opts.aligned_tol;
            self.region
                .push(idx, x, y, self.grad.mag.data[idx], aligned);

            for (dx, dy) in NEIGHBOURS {
                let (nx, ny) = (x as isize + dx, y as isize + dy);
                if nx < 0 || ny < 0 || nx >= self.width as isize || ny >= self.height as isize {
                    continue;
                }
                let n = ny as usize * self.width + nx as usize;
                let angle = self.angles[n];
                // NaN marks pixels under the magnitude threshold.
                if self.used[n] || angle.is_nan() {
                    continue;
                }
                if angular_difference(angle, seed_angle) <= self.opts.angle_tol {
                    self.used[n] = true;
                    self.stack.push(n);
                }
            }
        }
    }

    fn build_segment(&self) -> Option<LineSegment> {
        if self.region.len() < self.opts.min_region
            || self.region.aligned_fraction() < self.opts.min_aligned
        {
            return None;
        }
        let fit = self.region.fit_axis(self.width)?;
        let len = fit.length();
        if !len.is_finite() || len <= 0.0 || len < self.opts.min_len {
            return None;
        }
        let (p0, p1) = fit.endpoints();
        Some(LineSegment::new(
            p0,
            p1,
            self.region.avg_mag(),
            self.region.len(),
        ))
    }
}
