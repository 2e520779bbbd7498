//! Separable smoothing filters used by the denoising step.
use crate::image::ImageF32;

/// Trait implemented by separable 1D filters.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order). The kernel is assumed to be
    /// symmetric around its centre, but the implementation does not rely on it.
    fn taps(&self) -> &[f32];
}

/// Simple wrapper around a static filter kernel.
#[derive(Clone, Copy, Debug)]
pub struct StaticSeparableFilter {
    taps: &'static [f32],
}

impl Default for StaticSeparableFilter {
    fn default() -> Self {
        GAUSSIAN_5TAP
    }
}

impl StaticSeparableFilter {
    pub const fn new(taps: &'static [f32]) -> Self {
        Self { taps }
    }
}

impl SeparableFilter for StaticSeparableFilter {
    #[inline]
    fn taps(&self) -> &[f32] {
        self.taps
    }
}

/// Normalised 5-tap Gaussian filter `[1, 4, 6, 4, 1] / 16`.
pub const GAUSSIAN_5TAP: StaticSeparableFilter =
    StaticSeparableFilter::new(&[0.0625, 0.25, 0.375, 0.25, 0.0625]);

/// Convolve `src` with `filter` horizontally then vertically (clamped borders).
pub fn apply_separable(src: &ImageF32, filter: &dyn SeparableFilter) -> ImageF32 {
    let (w, h) = (src.w, src.h);
    let taps = filter.taps();
    if w == 0 || h == 0 || taps.is_empty() {
        return src.clone();
    }
    let radius = (taps.len() / 2) as isize;

    let mut horiz = ImageF32::new(w, h);
    for y in 0..h {
        let row = src.row(y);
        let out = horiz.row_mut(y);
        for (x, dst) in out.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let sx = clamp_index(x as isize + k as isize - radius, w);
                acc += tap * row[sx];
            }
            *dst = acc;
        }
    }

    let mut out = ImageF32::new(w, h);
    for y in 0..h {
        let dst = out.row_mut(y);
        for (k, &tap) in taps.iter().enumerate() {
            let sy = clamp_index(y as isize + k as isize - radius, h);
            let src_row = horiz.row(sy);
            for (d, &s) in dst.iter_mut().zip(src_row) {
                *d += tap * s;
            }
        }
    }
    out
}

fn clamp_index(idx: isize, upper: usize) -> usize {
    if idx < 0 {
        0
    } else if (idx as usize) >= upper {
        upper - 1
    } else {
        idx as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaussian_preserves_constant_image() {
        let mut img = ImageF32::new(7, 5);
        img.data.iter_mut().for_each(|v| *v = 0.6);
        let out = apply_separable(&img, &GAUSSIAN_5TAP);
        assert!(out.data.iter().all(|v| (v - 0.6).abs() < 1e-5));
    }

    #[test]
    fn gaussian_spreads_impulse() {
        let mut img = ImageF32::new(9, 9);
        img.set(4, 4, 1.0);
        let out = apply_separable(&img, &GAUSSIAN_5TAP);
        assert!((out.get(4, 4) - 0.375 * 0.375).abs() < 1e-6);
        let total: f32 = out.data.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
    }
}
