//! Read-only domain configuration shared by every stage.
//!
//! The knowledge base is a JSON document: materials with colour ranges and
//! texture signatures, component signature rules, the ordered phase taxonomy,
//! narrative templates and recommendation rules. It is validated once on load
//! and then shared behind an `Arc` without further mutation.
mod components;
mod materials;
mod narrative;
mod phases;

pub use components::{Axis, ComponentSignature, ComponentSpec, DimensionRange};
pub use materials::{ColorRange, MaterialSpec, TextureSpec};
pub use narrative::{FindingKind, RecommendationRule, RecommendationTrigger, TemplateSpec};
pub use phases::{Indicator, IndicatorMode, PhaseSpec};

use crate::error::KnowledgeBaseError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

const BUILTIN_JSON: &str = include_str!("../../config/knowledge_base.json");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub materials: Vec<MaterialSpec>,
    pub components: Vec<ComponentSpec>,
    /// Ordered from earliest to latest.
    pub phases: Vec<PhaseSpec>,
    #[serde(default)]
    pub templates: Vec<TemplateSpec>,
    /// Used whenever no template is similar enough or slot filling fails.
    /// Only `{subject}` and `{detail}` are guaranteed to be bound.
    pub fallback_template: String,
    /// Domain term per material, component or condition name.
    #[serde(default)]
    pub vocabulary: BTreeMap<String, String>,
    #[serde(default)]
    pub recommendations: Vec<RecommendationRule>,
}

impl KnowledgeBase {
    /// The knowledge base compiled into the crate.
    pub fn builtin() -> Result<Self, KnowledgeBaseError> {
        Self::from_json_str(BUILTIN_JSON)
    }

    pub fn load(path: &Path) -> Result<Self, KnowledgeBaseError> {
        let text = fs::read_to_string(path).map_err(|source| KnowledgeBaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let kb = Self::from_json_str(&text)?;
        debug!(
            "knowledge base {}: {} materials, {} components, {} phases",
            path.display(),
            kb.materials.len(),
            kb.components.len(),
            kb.phases.len()
        );
        Ok(kb)
    }

    pub fn from_json_str(text: &str) -> Result<Self, KnowledgeBaseError> {
        let kb: KnowledgeBase = serde_json::from_str(text)?;
        kb.validate()?;
        Ok(kb)
    }

    pub fn material(&self, name: &str) -> Option<&MaterialSpec> {
        self.materials.iter().find(|m| m.name == name)
    }

    pub fn component(&self, component_type: &str) -> Option<&ComponentSpec> {
        self.components
            .iter()
            .find(|c| c.component_type == component_type)
    }

    pub fn phase(&self, id: &str) -> Option<&PhaseSpec> {
        self.phases.iter().find(|p| p.id == id)
    }

    /// Domain term for `key`, or `key` itself when the vocabulary has none.
    pub fn term<'a>(&'a self, key: &'a str) -> &'a str {
        self.vocabulary.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Structural checks run on every load.
    pub fn validate(&self) -> Result<(), KnowledgeBaseError> {
        let invalid = |msg: String| Err(KnowledgeBaseError::Invalid(msg));

        let mut names = BTreeSet::new();
        for m in &self.materials {
            if m.name.trim().is_empty() {
                return invalid("material with empty name".into());
            }
            if !names.insert(m.name.as_str()) {
                return invalid(format!("duplicate material '{}'", m.name));
            }
            if m.color_ranges.is_empty() {
                return invalid(format!("material '{}' has no colour ranges", m.name));
            }
            if let Some(r) = m.color_ranges.iter().find(|r| !r.is_ordered()) {
                return invalid(format!(
                    "material '{}' has inverted colour range {:?}..{:?}",
                    m.name, r.lo, r.hi
                ));
            }
            if m.textures.is_empty() {
                return invalid(format!("material '{}' has no texture signatures", m.name));
            }
            for t in &m.textures {
                if !(t.mean_gradient.is_finite() && t.edge_fraction.is_finite()) {
                    return invalid(format!(
                        "material '{}' texture '{}' is not finite",
                        m.name, t.label
                    ));
                }
            }
        }

        let mut types = BTreeSet::new();
        for c in &self.components {
            if !types.insert(c.component_type.as_str()) {
                return invalid(format!("duplicate component '{}'", c.component_type));
            }
            if let Some((dim, _)) = c
                .typical_dimensions
                .iter()
                .find(|(_, r)| !(r.min <= r.max && r.min >= 0.0))
            {
                return invalid(format!(
                    "component '{}' has an invalid '{dim}' range",
                    c.component_type
                ));
            }
            let fractions_ok = match &c.signature {
                ComponentSignature::ParallelMembers {
                    min_length_frac,
                    max_thickness_frac,
                    ..
                } => in_unit(*min_length_frac) && in_unit(*max_thickness_frac),
                ComponentSignature::Triangulated {
                    min_length_frac, ..
                } => in_unit(*min_length_frac),
                ComponentSignature::Planar { min_coverage, .. } => in_unit(*min_coverage),
            };
            if !fractions_ok {
                return invalid(format!(
                    "component '{}' signature fractions must lie in (0, 1]",
                    c.component_type
                ));
            }
        }

        if self.phases.is_empty() {
            return invalid("phase taxonomy is empty".into());
        }
        let mut ids = BTreeSet::new();
        for p in &self.phases {
            if !ids.insert(p.id.as_str()) {
                return invalid(format!("duplicate phase '{}'", p.id));
            }
            if !(p.weight.is_finite() && p.weight > 0.0) {
                return invalid(format!("phase '{}' needs a positive weight", p.id));
            }
            if p.indicators.is_empty() {
                return invalid(format!("phase '{}' has no indicators", p.id));
            }
            for ind in &p.indicators {
                match ind {
                    Indicator::MaterialPresent { material, .. } => {
                        if !names.contains(material.as_str()) {
                            return invalid(format!(
                                "phase '{}' references unknown material '{material}'",
                                p.id
                            ));
                        }
                    }
                    Indicator::ComponentCount {
                        component_types, ..
                    } => {
                        if let Some(t) = component_types
                            .iter()
                            .find(|t| !types.contains(t.as_str()))
                        {
                            return invalid(format!(
                                "phase '{}' references unknown component '{t}'",
                                p.id
                            ));
                        }
                    }
                }
            }
        }

        if self.fallback_template.trim().is_empty() {
            return invalid("fallback template is empty".into());
        }
        Ok(())
    }
}

fn in_unit(v: f32) -> bool {
    v > 0.0 && v <= 1.0
}
