use crate::angle::orientation_deg;
use serde::Serialize;

/// Straight edge fitted to a region of consistently oriented gradients.
///
/// Coordinates are in working-resolution pixels, `y` pointing down.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineSegment {
    pub p0: [f32; 2],
    pub p1: [f32; 2],
    pub length: f32,
    /// Undirected orientation in degrees, `[0, 180)`; 0 is horizontal.
    pub orientation_deg: f32,
    /// Mean gradient magnitude over the supporting region.
    pub avg_mag: f32,
    /// `length * avg_mag`, used as a saliency weight.
    pub strength: f32,
    /// Number of supporting pixels.
    pub support: usize,
}

impl LineSegment {
    pub fn new(p0: [f32; 2], p1: [f32; 2], avg_mag: f32, support: usize) -> Self {
        let dx = p1[0] - p0[0];
        let dy = p1[1] - p0[1];
        let length = (dx * dx + dy * dy).sqrt();
        Self {
            p0,
            p1,
            length,
            orientation_deg: orientation_deg([dx, dy]),
            avg_mag,
            strength: length * avg_mag.max(1e-3),
            support,
        }
    }

    pub fn midpoint(&self) -> [f32; 2] {
        [
            (self.p0[0] + self.p1[0]) * 0.5,
            (self.p0[1] + self.p1[1]) * 0.5,
        ]
    }

    /// Extent of the segment projected on the x and y axes.
    pub fn span(&self) -> ([f32; 2], [f32; 2]) {
        (
            [self.p0[0].min(self.p1[0]), self.p0[0].max(self.p1[0])],
            [self.p0[1].min(self.p1[1]), self.p0[1].max(self.p1[1])],
        )
    }
}
