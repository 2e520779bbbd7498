//! Colour-space helpers: sRGB → CIE Lab (D65) and ΔE distances.
//!
//! Clustering and material colour matching both operate in Lab so that a
//! distance threshold means roughly the same perceptual step everywhere in
//! the gamut.

use palette::{FromColor, Lab, Srgb};

/// Convert an sRGB triple in `[0, 1]` to Lab `[L, a, b]`.
#[inline]
pub fn rgb_to_lab(rgb: [f32; 3]) -> [f32; 3] {
    let lab: Lab = Lab::from_color(Srgb::new(rgb[0], rgb[1], rgb[2]).into_linear());
    [lab.l, lab.a, lab.b]
}

/// Convert an 8-bit sRGB triple to Lab.
#[inline]
pub fn rgb8_to_lab(rgb: [u8; 3]) -> [f32; 3] {
    rgb_to_lab([
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    ])
}

/// CIE76 colour difference (Euclidean distance in Lab).
#[inline]
pub fn delta_e76(a: [f32; 3], b: [f32; 3]) -> f32 {
    squared_delta_e(a, b).sqrt()
}

#[inline]
pub fn squared_delta_e(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dl = a[0] - b[0];
    let da = a[1] - b[1];
    let db = a[2] - b[2];
    dl * dl + da * da + db * db
}

/// Closest point of the axis-aligned RGB box `[lo, hi]` to `rgb`.
#[inline]
pub fn project_into_box(rgb: [u8; 3], lo: [u8; 3], hi: [u8; 3]) -> [u8; 3] {
    [
        rgb[0].clamp(lo[0], hi[0]),
        rgb[1].clamp(lo[1], hi[1]),
        rgb[2].clamp(lo[2], hi[2]),
    ]
}

/// ΔE from `rgb` to the nearest colour inside the RGB box `[lo, hi]`.
/// Zero when the colour lies inside the box.
pub fn delta_e_to_box(rgb: [u8; 3], lo: [u8; 3], hi: [u8; 3]) -> f32 {
    let nearest = project_into_box(rgb, lo, hi);
    if nearest == rgb {
        return 0.0;
    }
    delta_e76(rgb8_to_lab(rgb), rgb8_to_lab(nearest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_and_black_have_extreme_lightness() {
        let white = rgb8_to_lab([255, 255, 255]);
        let black = rgb8_to_lab([0, 0, 0]);
        assert!((white[0] - 100.0).abs() < 0.5);
        assert!(black[0].abs() < 0.5);
        assert!(white[1].abs() < 0.5 && white[2].abs() < 0.5);
    }

    #[test]
    fn box_distance_is_zero_inside() {
        assert_eq!(delta_e_to_box([140, 140, 140], [100; 3], [180; 3]), 0.0);
        let outside = delta_e_to_box([60, 60, 60], [100; 3], [180; 3]);
        assert!(outside > 10.0);
    }
}
