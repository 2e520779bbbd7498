//! Area-average downscaling to the canonical working size.
//!
//! Images whose longest side is already within the limit are returned as-is;
//! the stage never upscales.
use crate::image::ImageF32;

/// Working dimensions for an input of `w × h` capped at `max_dimension`.
pub fn working_size(w: usize, h: usize, max_dimension: usize) -> (usize, usize) {
    let longest = w.max(h);
    if longest == 0 || max_dimension == 0 || longest <= max_dimension {
        return (w, h);
    }
    let scale = max_dimension as f64 / longest as f64;
    let nw = ((w as f64 * scale).round() as usize).clamp(1, w);
    let nh = ((h as f64 * scale).round() as usize).clamp(1, h);
    (nw, nh)
}

/// Box-filter `src` down to `nw × nh`. Each destination pixel averages the
/// source pixels whose indices fall inside its footprint.
pub fn downscale_area(src: &ImageF32, nw: usize, nh: usize) -> ImageF32 {
    if nw >= src.w && nh >= src.h {
        return src.clone();
    }
    let mut out = ImageF32::new(nw, nh);
    for dy in 0..nh {
        let (y0, y1) = footprint(dy, nh, src.h);
        let dst = out.row_mut(dy);
        for (dx, px) in dst.iter_mut().enumerate() {
            let (x0, x1) = footprint(dx, nw, src.w);
            let mut acc = 0.0f32;
            for y in y0..y1 {
                acc += src.row(y)[x0..x1].iter().sum::<f32>();
            }
            *px = acc / ((y1 - y0) * (x1 - x0)) as f32;
        }
    }
    out
}

fn footprint(d: usize, dst_len: usize, src_len: usize) -> (usize, usize) {
    let start = d * src_len / dst_len;
    let end = ((d + 1) * src_len / dst_len).max(start + 1).min(src_len);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn working_size_never_upscales() {
        assert_eq!(working_size(320, 240, 480), (320, 240));
        assert_eq!(working_size(960, 480, 480), (480, 240));
        assert_eq!(working_size(1000, 10, 100), (100, 1));
    }

    #[test]
    fn downscale_averages_blocks() {
        let mut img = ImageF32::new(4, 2);
        for x in 0..4 {
            img.set(x, 0, x as f32);
            img.set(x, 1, x as f32);
        }
        let out = downscale_area(&img, 2, 1);
        assert_eq!(out.w, 2);
        assert!((out.get(0, 0) - 0.5).abs() < 1e-6);
        assert!((out.get(1, 0) - 2.5).abs() < 1e-6);
    }
}
