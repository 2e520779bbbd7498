//! Image gradients (Sobel/Scharr) with magnitude.
//!
//! - Convolves a 3×3 kernel pair (`X` and `Y`) with border clamping.
//! - Outputs per-pixel `gx`, `gy`, `mag = sqrt(gx^2+gy^2)`, scaled so that a
//!   unit intensity step yields a magnitude of 1.
//!
//! Rows are convolved in parallel on the rayon pool.
use crate::image::ImageF32;
use rayon::prelude::*;
use serde::Deserialize;

type Kernel3 = [[f32; 3]; 3];

/// Reciprocal of the kernel gain (sum of |taps| on one side).
const KERNEL_NORM: f32 = 0.25;

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

// Scharr taps are normalised to the Sobel gain (sum of |taps| per side = 4)
// so magnitude thresholds stay comparable between the two kernels.
const SCHARR_KERNEL_X: Kernel3 = [
    [-0.75, 0.0, 0.75],
    [-2.5, 0.0, 2.5],
    [-0.75, 0.0, 0.75],
];
const SCHARR_KERNEL_Y: Kernel3 = [
    [-0.75, -2.5, -0.75],
    [0.0, 0.0, 0.0],
    [0.75, 2.5, 0.75],
];

/// Derivative kernel used by the gradient stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientKernel {
    #[default]
    Sobel,
    Scharr,
}

/// Per-pixel gradient buffers.
#[derive(Clone, Debug, Default)]
pub struct Grad {
    /// Horizontal derivative (convolution with kernel X)
    pub gx: ImageF32,
    /// Vertical derivative (convolution with kernel Y)
    pub gy: ImageF32,
    /// Euclidean magnitude per pixel: `sqrt(gx^2 + gy^2)`
    pub mag: ImageF32,
}

impl Grad {
    pub fn width(&self) -> usize {
        self.mag.w
    }

    pub fn height(&self) -> usize {
        self.mag.h
    }
}

fn gradients_with_kernels(l: &ImageF32, kernel_x: &Kernel3, kernel_y: &Kernel3) -> Grad {
    let (w, h) = (l.w, l.h);
    if w == 0 || h == 0 {
        return Grad {
            gx: ImageF32::new(w, h),
            gy: ImageF32::new(w, h),
            mag: ImageF32::new(w, h),
        };
    }

    let rows: Vec<(Vec<f32>, Vec<f32>)> = (0..h)
        .into_par_iter()
        .map(|y| {
            let ys = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
            let src = [l.row(ys[0]), l.row(ys[1]), l.row(ys[2])];
            let mut gx = vec![0.0f32; w];
            let mut gy = vec![0.0f32; w];
            for x in 0..w {
                let xs = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
                let (mut sx, mut sy) = (0.0f32, 0.0f32);
                for (r, row) in src.iter().enumerate() {
                    for (c, &xx) in xs.iter().enumerate() {
                        sx += kernel_x[r][c] * row[xx];
                        sy += kernel_y[r][c] * row[xx];
                    }
                }
                gx[x] = sx * KERNEL_NORM;
                gy[x] = sy * KERNEL_NORM;
            }
            (gx, gy)
        })
        .collect();

    let mut gx = Vec::with_capacity(w * h);
    let mut gy = Vec::with_capacity(w * h);
    for (rx, ry) in rows {
        gx.extend(rx);
        gy.extend(ry);
    }
    let mag: Vec<f32> = gx.iter().zip(&gy).map(|(a, b)| a.hypot(*b)).collect();
    Grad {
        gx: ImageF32 { w, h, data: gx },
        gy: ImageF32 { w, h, data: gy },
        mag: ImageF32 { w, h, data: mag },
    }
}

/// Compute gradients with the selected kernel on a single-channel float image.
pub fn image_gradients(l: &ImageF32, kernel: GradientKernel) -> Grad {
    match kernel {
        GradientKernel::Sobel => gradients_with_kernels(l, &SOBEL_KERNEL_X, &SOBEL_KERNEL_Y),
        GradientKernel::Scharr => gradients_with_kernels(l, &SCHARR_KERNEL_X, &SCHARR_KERNEL_Y),
    }
}

/// Compute Sobel gradients on a single-channel float image.
pub fn sobel_gradients(l: &ImageF32) -> Grad {
    image_gradients(l, GradientKernel::Sobel)
}
