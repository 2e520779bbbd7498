//! Running moments of a grown pixel region and the PCA line fit over them.
use nalgebra::{Matrix2, SymmetricEigen};

/// Principal axis of a region: centroid, unit tangent and the extent of the
/// region's pixels projected onto the tangent.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AxisFit {
    pub centroid: [f32; 2],
    pub tangent: [f32; 2],
    pub s_min: f32,
    pub s_max: f32,
}

impl AxisFit {
    pub(crate) fn length(&self) -> f32 {
        self.s_max - self.s_min
    }

    pub(crate) fn endpoints(&self) -> ([f32; 2], [f32; 2]) {
        let [cx, cy] = self.centroid;
        let [tx, ty] = self.tangent;
        (
            [cx + self.s_min * tx, cy + self.s_min * ty],
            [cx + self.s_max * tx, cy + self.s_max * ty],
        )
    }
}

#[derive(Debug, Default)]
pub(crate) struct RegionAccumulator {
    pub indices: Vec<usize>,
    /// Sums of x, y, x², y² and xy.
    moments: [f64; 5],
    aligned: usize,
    sum_mag: f64,
}

impl RegionAccumulator {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub(crate) fn reset(&mut self) {
        self.indices.clear();
        self.moments = [0.0; 5];
        self.aligned = 0;
        self.sum_mag = 0.0;
    }

    pub(crate) fn push(&mut self, idx: usize, x: usize, y: usize, mag: f32, aligned: bool) {
        self.indices.push(idx);
        let (xf, yf) = (x as f64, y as f64);
        for (m, v) in self.moments.iter_mut().zip([xf, yf, xf * xf, yf * yf, xf * yf]) {
            *m += v;
        }
        self.aligned += aligned as usize;
        self.sum_mag += mag as f64;
    }

    pub(crate) fn len(&self) -> usize {
        self.indices.len()
    }

    pub(crate) fn aligned_fraction(&self) -> f32 {
        if self.indices.is_empty() {
            0.0
        } else {
            self.aligned as f32 / self.indices.len() as f32
        }
    }

    pub(crate) fn avg_mag(&self) -> f32 {
        if self.indices.is_empty() {
            0.0
        } else {
            (self.sum_mag / self.indices.len() as f64) as f32
        }
    }

    /// Return the region's pixels to the pool after a rejected fit.
    pub(crate) fn release_flags(&self, used: &mut [bool]) {
        for &idx in &self.indices {
            used[idx] = false;
        }
    }

    /// Major eigenvector of the pixel covariance. The tangent sign is
    /// canonical (`tx > 0`, or `ty > 0` when vertical) so endpoints do not
    /// depend on the eigen solver.
    pub(crate) fn fit_axis(&self, width: usize) -> Option<AxisFit> {
        if self.indices.len() < 2 || width == 0 {
            return None;
        }
        let n = self.indices.len() as f64;
        let [sx, sy, sxx, syy, sxy] = self.moments;
        let (cx, cy) = (sx / n, sy / n);
        let cxy = sxy / n - cx * cy;
        let cov = Matrix2::new(sxx / n - cx * cx, cxy, cxy, syy / n - cy * cy);
        let eig = SymmetricEigen::new(cov);
        let major = if eig.eigenvalues[0] >= eig.eigenvalues[1] { 0 } else { 1 };
        let lambda = eig.eigenvalues[major];
        if !lambda.is_finite() || lambda <= 0.0 {
            return None;
        }
        let v = eig.eigenvectors.column(major);
        let norm = v.norm();
        if !norm.is_finite() || norm < 1e-9 {
            return None;
        }
        let (mut tx, mut ty) = (v[0] / norm, v[1] / norm);
        if tx < 0.0 || (tx == 0.0 && ty < 0.0) {
            tx = -tx;
            ty = -ty;
        }

        let (mut s_min, mut s_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for &idx in &self.indices {
            let s = ((idx % width) as f64 - cx) * tx + ((idx / width) as f64 - cy) * ty;
            s_min = s_min.min(s);
            s_max = s_max.max(s);
        }
        Some(AxisFit {
            centroid: [cx as f32, cy as f32],
            tangent: [tx as f32, ty as f32],
            s_min: s_min as f32,
            s_max: s_max as f32,
        })
    }
}
