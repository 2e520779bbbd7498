//! Percentile statistics and luminance contrast stretching.
use crate::image::ImageF32;

const BINS: usize = 256;

/// Value at the given percentile (0–100) of a `[0, 1]` plane, 256-bin resolution.
pub fn percentile(img: &ImageF32, pct: f32) -> f32 {
    let hist = histogram(img);
    percentile_from_hist(&hist, img.data.len(), pct)
}

/// `(low, high)` percentile pair computed from one histogram pass.
pub fn percentile_range(img: &ImageF32, low_pct: f32, high_pct: f32) -> (f32, f32) {
    let hist = histogram(img);
    let n = img.data.len();
    (
        percentile_from_hist(&hist, n, low_pct),
        percentile_from_hist(&hist, n, high_pct),
    )
}

fn histogram(img: &ImageF32) -> [u32; BINS] {
    let mut hist = [0u32; BINS];
    for &v in &img.data {
        let bin = (v.clamp(0.0, 1.0) * (BINS - 1) as f32).round() as usize;
        hist[bin] += 1;
    }
    hist
}

fn percentile_from_hist(hist: &[u32; BINS], n: usize, pct: f32) -> f32 {
    if n == 0 {
        return 0.0;
    }
    let target = ((pct.clamp(0.0, 100.0) / 100.0) * (n - 1) as f32).round() as u64;
    let mut seen = 0u64;
    for (bin, &count) in hist.iter().enumerate() {
        seen += count as u64;
        if seen > target {
            return bin as f32 / (BINS - 1) as f32;
        }
    }
    1.0
}

/// Outcome of a contrast stretch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StretchOutcome {
    pub low: f32,
    pub high: f32,
    pub gain: f32,
}

/// Stretch `img` so that `[low, high]` percentiles map towards `[0, 1]`,
/// with the gain capped at `max_gain`. Planes whose range is below
/// `min_range` are left untouched (gain 1).
pub fn stretch_contrast(
    img: &mut ImageF32,
    low_pct: f32,
    high_pct: f32,
    max_gain: f32,
    min_range: f32,
) -> StretchOutcome {
    let (low, high) = percentile_range(img, low_pct, high_pct);
    let range = high - low;
    if range < min_range.max(1e-6) {
        return StretchOutcome {
            low,
            high,
            gain: 1.0,
        };
    }
    let gain = (1.0 / range).min(max_gain.max(1.0));
    img.map_in_place(|v| ((v - low) * gain).clamp(0.0, 1.0));
    StretchOutcome { low, high, gain }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentiles_of_ramp() {
        let data: Vec<f32> = (0..256).map(|i| i as f32 / 255.0).collect();
        let img = ImageF32::from_vec(256, 1, data).expect("length matches");
        let (lo, hi) = percentile_range(&img, 1.0, 99.0);
        assert!(lo < 0.02);
        assert!(hi > 0.98);
        assert!((percentile(&img, 50.0) - 0.5).abs() < 0.01);
    }

    #[test]
    fn stretch_expands_narrow_range() {
        let data: Vec<f32> = (0..100).map(|i| 0.4 + 0.2 * i as f32 / 99.0).collect();
        let mut img = ImageF32::from_vec(100, 1, data).expect("length matches");
        let out = stretch_contrast(&mut img, 1.0, 99.0, 10.0, 0.01);
        assert!(out.gain > 4.0);
        let max = img.data.iter().cloned().fold(0.0f32, f32::max);
        assert!(max > 0.95);
    }

    #[test]
    fn stretch_leaves_flat_plane() {
        let mut img = ImageF32::from_vec(4, 1, vec![0.3; 4]).expect("length matches");
        let out = stretch_contrast(&mut img, 1.0, 99.0, 4.0, 0.01);
        assert_eq!(out.gain, 1.0);
        assert!(img.data.iter().all(|&v| v == 0.3));
    }
}
