//! Regional gradient statistics over a fixed grid.
use super::options::TextureOptions;
use super::types::{TextureDescriptor, TextureRegion};
use crate::edges::Grad;

pub(crate) fn describe_texture(grad: &Grad, opts: &TextureOptions) -> TextureDescriptor {
    let (w, h) = (grad.width(), grad.height());
    if w == 0 || h == 0 {
        return TextureDescriptor::default();
    }
    let cols = opts.grid_cols.clamp(1, w);
    let rows = opts.grid_rows.clamp(1, h);

    let mut regions = Vec::with_capacity(cols * rows);
    for gy in 0..rows {
        let (y0, y1) = (gy * h / rows, (gy + 1) * h / rows);
        for gx in 0..cols {
            let (x0, x1) = (gx * w / cols, (gx + 1) * w / cols);
            regions.push(region_stats(grad, x0, x1, y0, y1));
        }
    }

    TextureDescriptor {
        cols,
        rows,
        regions,
        mean_gradient: grad.mag.mean(),
    }
}

fn region_stats(grad: &Grad, x0: usize, x1: usize, y0: usize, y1: usize) -> TextureRegion {
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut count = 0usize;
    for y in y0..y1 {
        for &v in &grad.mag.row(y)[x0..x1] {
            let v = v as f64;
            sum += v;
            sum_sq += v * v;
            count += 1;
        }
    }
    if count == 0 {
        return TextureRegion::default();
    }
    let mean = sum / count as f64;
    TextureRegion {
        mean: mean as f32,
        variance: (sum_sq / count as f64 - mean * mean).max(0.0) as f32,
    }
}
