use crate::segments::LineSegment;
use serde::Serialize;

/// Mean gradient magnitude and edge fraction over a set of pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct TextureSignature {
    pub mean_gradient: f32,
    pub edge_fraction: f32,
}

/// One dominant colour of the frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColorCluster {
    /// Mean sRGB of member pixels.
    pub rgb: [u8; 3],
    pub lab: [f32; 3],
    /// Fraction of working pixels assigned to this cluster.
    pub share: f32,
    /// Normalised `(x, y)` centre of mass, `y` growing downwards.
    pub centroid: [f32; 2],
    /// Normalised `[x0, y0, x1, y1]` from member coordinate percentiles.
    pub bbox: [f32; 4],
    pub texture: TextureSignature,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct TextureRegion {
    pub mean: f32,
    pub variance: f32,
}

/// Regional gradient statistics of the contrast-normalised luminance.
///
/// The row-major `regions` grid of `(mean, variance)` pairs is the texture
/// signature; the planar rule reads both moments per cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TextureDescriptor {
    pub cols: usize,
    pub rows: usize,
    pub regions: Vec<TextureRegion>,
    /// Mean gradient magnitude over the whole frame.
    pub mean_gradient: f32,
}

impl TextureDescriptor {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Line-based description of the frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GeometryDescriptor {
    pub segments: Vec<LineSegment>,
    /// Fraction of segment length aligned with the image axes.
    pub regularity: f32,
}

impl GeometryDescriptor {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Everything later stages know about one frame.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FeatureSet {
    /// Working resolution.
    pub width: usize,
    pub height: usize,
    /// Working size over original size.
    pub scale: f32,
    pub original_size: (usize, usize),
    /// The frame was essentially flat; texture and geometry are empty.
    pub uniform: bool,
    /// Sorted by share, largest first.
    pub colors: Vec<ColorCluster>,
    pub texture: TextureDescriptor,
    pub geometry: GeometryDescriptor,
    /// Per working pixel index into `colors`.
    #[serde(skip)]
    pub labels: Vec<u8>,
}

impl FeatureSet {
    /// Dominant cluster inside a working-resolution rectangle, with its share
    /// of the rectangle.
    pub fn dominant_cluster_in(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> Option<(usize, f32)> {
        if self.labels.len() != self.width * self.height || self.colors.is_empty() {
            return None;
        }
        let clamp_x = |v: f32| (v.max(0.0) as usize).min(self.width);
        let clamp_y = |v: f32| (v.max(0.0) as usize).min(self.height);
        let (xa, xb) = (clamp_x(x0.min(x1)), clamp_x(x0.max(x1).ceil() + 1.0));
        let (ya, yb) = (clamp_y(y0.min(y1)), clamp_y(y0.max(y1).ceil() + 1.0));
        let mut counts = vec![0usize; self.colors.len()];
        for y in ya..yb {
            for &label in &self.labels[y * self.width + xa..y * self.width + xb] {
                if let Some(c) = counts.get_mut(label as usize) {
                    *c += 1;
                }
            }
        }
        let total: usize = counts.iter().sum();
        if total == 0 {
            return None;
        }
        counts
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(&a.0)))
            .map(|(idx, &count)| (idx, count as f32 / total as f32))
    }
}
