//! Construction phase and completion inferred from the findings.
//!
//! Phases are evaluated against their knowledge-base indicators; the latest
//! phase with a firing indicator set is the current one. Completion counts
//! every earlier phase in full plus the satisfied share of the current one.
mod params;

pub use params::ProgressParams;

use crate::features::FeatureSet;
use crate::knowledge::{Indicator, IndicatorMode, KnowledgeBase, PhaseSpec};
use crate::types::{Material, ProjectProgress, StructuralComponent};
use log::debug;
use std::collections::BTreeSet;

pub const COMPLEX_GEOMETRY: &str = "Complex geometry requiring specialized formwork";
pub const SURFACE_PREPARATION: &str = "Surface preparation and finishing requirements";
pub const REMEDIAL_WORK: &str = "Remedial work on components in fair or poor condition";
pub const STANDARD_CONSIDERATIONS: &str = "Standard construction considerations";

/// Indicator evaluation for one phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseEvidence {
    pub satisfied: usize,
    pub total: usize,
    pub fires: bool,
}

impl PhaseEvidence {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.satisfied as f32 / self.total as f32
        }
    }
}

pub struct ProgressEstimator<'a> {
    kb: &'a KnowledgeBase,
    params: &'a ProgressParams,
}

impl<'a> ProgressEstimator<'a> {
    pub fn new(kb: &'a KnowledgeBase, params: &'a ProgressParams) -> Self {
        Self { kb, params }
    }

    /// `None` when no phase indicator fires.
    pub fn estimate(
        &self,
        materials: &[Material],
        components: &[StructuralComponent],
        features: &FeatureSet,
    ) -> Option<ProjectProgress> {
        let evidence: Vec<PhaseEvidence> = self
            .kb
            .phases
            .iter()
            .map(|p| evaluate_phase(p, materials, components))
            .collect();
        let current = evidence.iter().rposition(|e| e.fires)?;
        let phase = &self.kb.phases[current];

        let total_weight: f32 = self.kb.phases.iter().map(|p| p.weight.max(0.0)).sum();
        let done: f32 = self.kb.phases[..current]
            .iter()
            .map(|p| p.weight.max(0.0))
            .sum();
        let completion = if total_weight > 0.0 {
            (done + phase.weight.max(0.0) * evidence[current].fraction()) / total_weight * 100.0
        } else {
            0.0
        };

        let completed_elements = dedup(
            self.kb.phases[..=current]
                .iter()
                .flat_map(|p| p.checklist.iter()),
        );
        let planned_elements = dedup(
            self.kb.phases[current + 1..]
                .iter()
                .flat_map(|p| p.checklist.iter()),
        )
        .into_iter()
        .filter(|item| !completed_elements.contains(item))
        .collect();

        let mut construction_methods = dedup(components.iter().map(|c| &c.construction_method));
        if construction_methods.is_empty() {
            construction_methods = dedup(phase.default_methods.iter());
        }

        debug!(
            "progress: phase={} evidence={}/{} completion={:.1}",
            phase.id, evidence[current].satisfied, evidence[current].total, completion
        );

        Some(ProjectProgress {
            phase: phase.id.clone(),
            completion_percentage: completion.clamp(0.0, 100.0),
            completed_elements,
            planned_elements,
            materials_used: materials.to_vec(),
            construction_methods,
            timeline: Some(format!(
                "Estimated phase duration: {} weeks",
                phase.duration_weeks
            )),
            challenges: self.challenges(components, features),
        })
    }

    /// Challenge rules in a fixed order; never empty.
    pub fn challenges(&self, components: &[StructuralComponent], features: &FeatureSet) -> Vec<String> {
        let p = self.params;
        let geometry = &features.geometry;
        let mut out = Vec::new();
        if geometry.segments.len() >= p.complex_min_segments
            && geometry.regularity < p.complex_regularity_max
        {
            out.push(COMPLEX_GEOMETRY.to_string());
        }
        if !features.texture.is_empty() && features.texture.mean_gradient > p.rough_surface_gradient {
            out.push(SURFACE_PREPARATION.to_string());
        }
        if components.iter().any(|c| c.condition.needs_attention()) {
            out.push(REMEDIAL_WORK.to_string());
        }
        if out.is_empty() {
            out.push(STANDARD_CONSIDERATIONS.to_string());
        }
        out
    }
}

pub fn evaluate_phase(
    phase: &PhaseSpec,
    materials: &[Material],
    components: &[StructuralComponent],
) -> PhaseEvidence {
    let satisfied = phase
        .indicators
        .iter()
        .filter(|i| indicator_holds(i, materials, components))
        .count();
    let total = phase.indicators.len();
    let fires = match phase.mode {
        IndicatorMode::Any => satisfied > 0,
        IndicatorMode::All => total > 0 && satisfied == total,
    };
    PhaseEvidence {
        satisfied,
        total,
        fires,
    }
}

fn indicator_holds(
    indicator: &Indicator,
    materials: &[Material],
    components: &[StructuralComponent],
) -> bool {
    match indicator {
        Indicator::MaterialPresent {
            material,
            min_confidence,
        } => materials
            .iter()
            .any(|m| &m.name == material && m.confidence >= *min_confidence),
        Indicator::ComponentCount {
            component_types,
            min_count,
            min_confidence,
        } => {
            let count = components
                .iter()
                .filter(|c| {
                    c.confidence >= *min_confidence
                        && component_types.iter().any(|t| t == &c.component_type)
                })
                .count();
            count >= *min_count
        }
    }
}

/// Order-preserving de-duplication.
fn dedup<'s>(items: impl Iterator<Item = &'s String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for s in items {
        if seen.insert(s.as_str()) {
            out.push(s.clone());
        }
    }
    out
}
