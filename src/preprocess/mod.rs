//! Canonicalisation of the input frame.
//!
//! The steps run in a fixed order:
//! - area-average downscale so the longest side fits `max_dimension`
//!   (never upscaled),
//! - separable Gaussian denoise on each colour plane,
//! - luminance extraction and percentile contrast stretch.
//!
//! Colour planes are only denoised; the stretch is applied to the luminance
//! plane that feeds texture and geometry so that absolute colours still line
//! up with knowledge-base ranges.
mod contrast;
mod filters;
mod options;
mod resize;

pub use contrast::{percentile, percentile_range, stretch_contrast, StretchOutcome};
pub use filters::{apply_separable, SeparableFilter, StaticSeparableFilter, GAUSSIAN_5TAP};
pub use options::PreprocessOptions;
pub use resize::{downscale_area, working_size};

use crate::image::{ImageF32, ImageRgb8, RgbPlanes};
use log::debug;

/// Working-resolution planes plus the bookkeeping needed to map back.
#[derive(Clone, Debug)]
pub struct Preprocessed {
    pub color: RgbPlanes,
    pub luminance: ImageF32,
    /// Working size divided by original size (≤ 1).
    pub scale: f32,
    pub original_size: (usize, usize),
    /// Every channel is essentially flat.
    pub uniform: bool,
    pub contrast: StretchOutcome,
}

impl Preprocessed {
    pub fn width(&self) -> usize {
        self.luminance.w
    }

    pub fn height(&self) -> usize {
        self.luminance.h
    }
}

/// Run the canonicalisation chain on a validated view.
pub fn preprocess(image: &ImageRgb8<'_>, opts: &PreprocessOptions) -> Preprocessed {
    let (nw, nh) = working_size(image.w, image.h, opts.max_dimension);
    let planes = image.to_planes();
    let mut color = if (nw, nh) == (image.w, image.h) {
        planes
    } else {
        RgbPlanes {
            r: downscale_area(&planes.r, nw, nh),
            g: downscale_area(&planes.g, nw, nh),
            b: downscale_area(&planes.b, nw, nh),
        }
    };

    for _ in 0..opts.denoise_passes {
        for ch in color.channels_mut() {
            *ch = apply_separable(ch, &GAUSSIAN_5TAP);
        }
    }

    let uniform = color.channels().iter().all(|ch| {
        let (lo, hi) = percentile_range(ch, opts.stretch_low_pct, opts.stretch_high_pct);
        hi - lo < opts.uniform_range
    });

    let mut luminance = color.luminance();
    let contrast = stretch_contrast(
        &mut luminance,
        opts.stretch_low_pct,
        opts.stretch_high_pct,
        opts.max_gain,
        opts.uniform_range,
    );

    let scale = nw as f32 / image.w.max(1) as f32;
    debug!(
        "preprocess: {}x{} -> {}x{} gain={:.2} uniform={}",
        image.w, image.h, nw, nh, contrast.gain, uniform
    );
    Preprocessed {
        color,
        luminance,
        scale,
        original_size: (image.w, image.h),
        uniform,
        contrast,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: usize, h: usize, rgb: [u8; 3]) -> Vec<u8> {
        rgb.iter().copied().cycle().take(w * h * 3).collect()
    }

    #[test]
    fn uniform_frame_is_flagged() {
        let data = solid(40, 30, [128, 128, 128]);
        let img = ImageRgb8 {
            w: 40,
            h: 30,
            stride: 120,
            data: &data,
        };
        let pre = preprocess(&img, &PreprocessOptions::default());
        assert!(pre.uniform);
        assert_eq!(pre.contrast.gain, 1.0);
        assert_eq!((pre.width(), pre.height()), (40, 30));
    }

    #[test]
    fn large_frame_is_downscaled() {
        let (w, h) = (960, 600);
        let mut data = solid(w, h, [60, 60, 60]);
        for y in 0..h {
            for x in w / 2..w {
                let i = (y * w + x) * 3;
                data[i..i + 3].copy_from_slice(&[200, 200, 200]);
            }
        }
        let img = ImageRgb8 {
            w,
            h,
            stride: w * 3,
            data: &data,
        };
        let pre = preprocess(&img, &PreprocessOptions::default());
        assert_eq!((pre.width(), pre.height()), (480, 300));
        assert!((pre.scale - 0.5).abs() < 1e-6);
        assert!(!pre.uniform);
    }
}
