//! Wire data model produced by one analysis.
//!
//! Field names and shapes are the contract exposed to serving layers; keep
//! them stable. Pixel-share bookkeeping used for ordering is kept out of the
//! serialized form.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// An identified building material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub confidence: f32,
    pub quantity: String,
    pub location: String,
    pub properties: BTreeMap<String, String>,
    pub color_info: Option<String>,
    pub texture: Option<String>,
    /// Fraction of the frame covered by the matched colour cluster.
    #[serde(skip)]
    pub matched_share: f32,
}

/// Qualitative state of a detected component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Excellent => "excellent",
            Condition::Good => "good",
            Condition::Fair => "fair",
            Condition::Poor => "poor",
        }
    }

    /// True for the states that call for remedial attention.
    pub fn needs_attention(&self) -> bool {
        matches!(self, Condition::Fair | Condition::Poor)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructuralComponent {
    pub component_type: String,
    pub material: String,
    /// Estimated extents in metres, keyed by dimension name.
    pub dimensions: BTreeMap<String, f32>,
    pub location: String,
    pub construction_method: String,
    pub condition: Condition,
    pub confidence: f32,
    pub notable_features: Vec<String>,
    /// Fraction of the frame covered by the component's support region.
    #[serde(skip)]
    pub matched_share: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectProgress {
    pub phase: String,
    pub completion_percentage: f32,
    pub completed_elements: Vec<String>,
    pub planned_elements: Vec<String>,
    pub materials_used: Vec<Material>,
    pub construction_methods: Vec<String>,
    pub timeline: Option<String>,
    pub challenges: Vec<String>,
}

/// Immutable outcome of one analysis request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub materials: Vec<Material>,
    pub structural_components: Vec<StructuralComponent>,
    pub project_progress: Option<ProjectProgress>,
    pub summary: String,
    pub detailed_description: String,
    pub recommendations: Vec<String>,
    pub confidence_score: f32,
}

/// Reporting order: confidence descending, then matched share descending,
/// then name ascending so equal entries still sort deterministically.
pub(crate) fn report_order(
    a: (f32, f32, &str),
    b: (f32, f32, &str),
) -> Ordering {
    b.0.total_cmp(&a.0)
        .then_with(|| b.1.total_cmp(&a.1))
        .then_with(|| a.2.cmp(b.2))
}

pub(crate) fn sort_materials(materials: &mut [Material]) {
    materials.sort_by(|a, b| {
        report_order(
            (a.confidence, a.matched_share, &a.name),
            (b.confidence, b.matched_share, &b.name),
        )
    });
}

pub(crate) fn sort_components(components: &mut [StructuralComponent]) {
    components.sort_by(|a, b| {
        report_order(
            (a.confidence, a.matched_share, &a.component_type),
            (b.confidence, b.matched_share, &b.component_type),
        )
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material(name: &str, confidence: f32, share: f32) -> Material {
        Material {
            name: name.to_string(),
            confidence,
            quantity: String::new(),
            location: String::new(),
            properties: BTreeMap::new(),
            color_info: None,
            texture: None,
            matched_share: share,
        }
    }

    #[test]
    fn ties_break_on_share_then_name() {
        let mut list = vec![
            material("wood", 0.5, 0.1),
            material("steel", 0.7, 0.1),
            material("brick", 0.5, 0.3),
            material("glass", 0.5, 0.1),
        ];
        sort_materials(&mut list);
        let names: Vec<_> = list.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["steel", "brick", "glass", "wood"]);
    }

    #[test]
    fn condition_serializes_lowercase() {
        let json = serde_json::to_string(&Condition::Fair).expect("serialize");
        assert_eq!(json, "\"fair\"");
        assert!(Condition::Poor.needs_attention());
        assert!(!Condition::Good.needs_attention());
    }

    #[test]
    fn matched_share_is_not_serialized() {
        let json = serde_json::to_value(material("concrete", 0.8, 0.4)).expect("serialize");
        assert!(json.get("matched_share").is_none());
        assert_eq!(json["color_info"], serde_json::Value::Null);
    }
}
