//! Edge processing: image gradients and a thin edge map.
//!
//! - Gradient computation (Sobel/Scharr) returning `gx`, `gy` and magnitude.
//!   The magnitude plane feeds the texture descriptor and the per-cluster
//!   texture signatures; the oriented components feed the segment extractor.
//! - Direction-aligned non-maximum suppression producing a thin edge mask
//!   whose density is part of the texture descriptor.
//!
//! Borders are handled by clamping indices (replicate).

pub mod grad;
pub mod nms;

/// Per-pixel gradients with magnitude.
pub use grad::{image_gradients, sobel_gradients, Grad, GradientKernel};
/// Direction-aligned NMS returning a thin edge mask.
pub use nms::{detect_edges_nms, EdgeMap};
