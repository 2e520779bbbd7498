use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inclusive sRGB box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRange {
    pub lo: [u8; 3],
    pub hi: [u8; 3],
}

impl ColorRange {
    pub fn contains(&self, rgb: [u8; 3]) -> bool {
        (0..3).all(|c| rgb[c] >= self.lo[c] && rgb[c] <= self.hi[c])
    }

    pub fn is_ordered(&self) -> bool {
        (0..3).all(|c| self.lo[c] <= self.hi[c])
    }
}

/// Reference texture of a material in gradient units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextureSpec {
    pub label: String,
    pub mean_gradient: f32,
    pub edge_fraction: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    pub name: String,
    pub color_ranges: Vec<ColorRange>,
    pub textures: Vec<TextureSpec>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}
