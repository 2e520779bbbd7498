//! Lightweight LSD-like segment extractor.
//!
//! Segments feed two consumers: the geometry descriptor (counts, orientation
//! histogram, regularity) and the structural component rules. The algorithm:
//!
//! - Region growing from seeds ordered by gradient magnitude: neighbours whose gradient
//!   orientation is within the tolerance of the seed and whose magnitude
//!   clears the threshold join the region.
//! - PCA line fitting: the region's coordinate moments are accumulated online
//!   and the 2x2 covariance is eigendecomposed to obtain the tangent.
//! - Endpoints are the extreme projections of region pixels on the tangent.
//! - Significance tests: minimum region size, minimum length, and minimum
//!   fraction of pixels aligned with the seed orientation.
//!
//! Orientation is taken modulo π; the extractor is biased toward long coherent
//! edges rather than exhaustive coverage. Seed ties break in raster order so
//! the output is deterministic for a given gradient field.
mod extractor;
mod options;
mod region_accumulator;
mod segment;

pub use options::LsdOptions;
pub use segment::LineSegment;

use crate::edges::Grad;
use log::debug;

/// Extract line segments from a precomputed gradient field.
pub fn extract_segments(grad: &Grad, options: &LsdOptions) -> Vec<LineSegment> {
    let segments = extractor::LsdExtractor::new(grad, options).extract();
    debug!(
        "lsd: {} segments from {}x{} gradient field",
        segments.len(),
        grad.width(),
        grad.height()
    );
    segments
}

#[cfg(test)]
mod tests;
