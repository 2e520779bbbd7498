//! Non-maximum suppression on gradient magnitude with direction alignment.
//!
//! Canny-style thinning without hysteresis: a pixel survives when its
//! magnitude reaches the threshold and beats both neighbours along the
//! quantised gradient direction. The outermost 1-pixel frame is never marked,
//! so neighbour lookups stay inside the image.
use crate::edges::grad::Grad;
use rayon::prelude::*;

/// Thin edge mask over a `width × height` image.
#[derive(Clone, Debug, Default)]
pub struct EdgeMap {
    pub width: usize,
    pub height: usize,
    /// Row-major, `true` on surviving edge pixels.
    pub mask: Vec<bool>,
}

const TAN_22_5_DEG: f32 = 0.41421356237;

/// Offsets of the two neighbours across the edge for gradient `(gx, gy)`.
#[inline]
fn across_edge(gx: f32, gy: f32) -> (isize, isize) {
    let (ax, ay) = (gx.abs(), gy.abs());
    if ay <= ax * TAN_22_5_DEG {
        (1, 0)
    } else if ax <= ay * TAN_22_5_DEG {
        (0, 1)
    } else if (gx >= 0.0) == (gy >= 0.0) {
        (1, 1)
    } else {
        (-1, 1)
    }
}

fn is_local_max(grad: &Grad, x: usize, y: usize, mag_thresh: f32) -> bool {
    let mag = grad.mag.get(x, y);
    if mag < mag_thresh {
        return false;
    }
    let (dx, dy) = across_edge(grad.gx.get(x, y), grad.gy.get(x, y));
    let (xi, yi) = (x as isize, y as isize);
    let before = grad.mag.get((xi - dx) as usize, (yi - dy) as usize);
    let after = grad.mag.get((xi + dx) as usize, (yi + dy) as usize);
    // Plateaus (two equal maxima across a symmetric step) keep one side.
    mag >= before && mag > after
}

/// Thin the gradient magnitude into an edge mask.
pub fn detect_edges_nms(grad: &Grad, mag_thresh: f32) -> EdgeMap {
    let (w, h) = (grad.width(), grad.height());
    let mut mask = vec![false; w * h];
    if w >= 3 && h >= 3 {
        mask.par_chunks_mut(w)
            .enumerate()
            .filter(|(y, _)| *y > 0 && *y < h - 1)
            .for_each(|(y, row)| {
                for (x, slot) in row.iter_mut().enumerate().take(w - 1).skip(1) {
                    *slot = is_local_max(grad, x, y, mag_thresh);
                }
            });
    }
    EdgeMap {
        width: w,
        height: h,
        mask,
    }
}
