use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Geometric rule a component must satisfy. Fractions are relative to the
/// working frame size along the relevant axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentSignature {
    /// Long straight members along one axis, grouped across their thickness.
    ParallelMembers {
        axis: Axis,
        min_length_frac: f32,
        max_thickness_frac: f32,
        min_members: usize,
    },
    /// Two opposing diagonal families crossing each other.
    Triangulated {
        min_length_frac: f32,
        min_per_direction: usize,
    },
    /// Large low-gradient surface bounded by a few edges.
    Planar {
        max_mean_gradient: f32,
        min_coverage: f32,
        min_segments: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DimensionRange {
    pub min: f32,
    pub max: f32,
}

impl DimensionRange {
    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub component_type: String,
    pub signature: ComponentSignature,
    /// Plausible extents in metres, keyed by dimension name.
    #[serde(default)]
    pub typical_dimensions: BTreeMap<String, DimensionRange>,
    /// Construction method keyed by material name.
    #[serde(default)]
    pub construction_methods: BTreeMap<String, String>,
    pub default_method: String,
    #[serde(default)]
    pub load_bearing: bool,
}

impl ComponentSpec {
    pub fn method_for(&self, material: &str) -> &str {
        self.construction_methods
            .get(material)
            .map(String::as_str)
            .unwrap_or(&self.default_method)
    }
}
