use crate::types::Condition;
use serde::{Deserialize, Serialize};

/// What a narrative sentence talks about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    Material,
    Component,
    Progress,
}

/// Sentence template with `{slot}` placeholders; `topic` is the text whose
/// embedding is compared against a finding's descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateSpec {
    pub kind: FindingKind,
    pub topic: String,
    pub template: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationTrigger {
    /// Fires once per component whose condition is listed.
    ComponentCondition { conditions: Vec<Condition> },
    /// Fires once per material below the confidence bound.
    LowMaterialConfidence { below: f32 },
    /// Fires when progress lists upcoming checklist items.
    PlannedElements,
    /// Fires when progress lists non-standard challenges.
    Challenges,
    /// Fires when component dimensions rest on the assumed scene width.
    UncalibratedDimensions,
    /// Fires when neither materials nor components were reported.
    NoFindings,
    Always,
}

/// `text` may reference `{name}`, bound to the triggering entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRule {
    pub trigger: RecommendationTrigger,
    pub text: String,
}
