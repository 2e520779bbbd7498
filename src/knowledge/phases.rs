use serde::{Deserialize, Serialize};

/// How a phase combines its indicators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorMode {
    #[default]
    Any,
    All,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Indicator {
    MaterialPresent {
        material: String,
        min_confidence: f32,
    },
    /// At least `min_count` components of any of `component_types`.
    ComponentCount {
        component_types: Vec<String>,
        min_count: usize,
        min_confidence: f32,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseSpec {
    pub id: String,
    pub weight: f32,
    #[serde(default)]
    pub mode: IndicatorMode,
    pub indicators: Vec<Indicator>,
    pub checklist: Vec<String>,
    pub duration_weeks: u32,
    /// Methods reported when no detected component supplies one.
    #[serde(default)]
    pub default_methods: Vec<String>,
}
