//! Recommendation rules evaluated against the findings.
use super::Findings;
use crate::knowledge::{KnowledgeBase, RecommendationTrigger};
use crate::progress::STANDARD_CONSIDERATIONS;

/// Rule texts in knowledge-base order, `{name}` bound per triggering entry,
/// duplicates removed.
pub fn recommendations(kb: &KnowledgeBase, f: &Findings<'_>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |text: String| {
        if !out.contains(&text) {
            out.push(text);
        }
    };
    for rule in &kb.recommendations {
        let bind = |name: &str| rule.text.replace("{name}", name);
        match &rule.trigger {
            RecommendationTrigger::ComponentCondition { conditions } => {
                for c in f.components.iter().filter(|c| conditions.contains(&c.condition)) {
                    push(bind(kb.term(&c.component_type)));
                }
            }
            RecommendationTrigger::LowMaterialConfidence { below } => {
                for m in f.materials.iter().filter(|m| m.confidence < *below) {
                    push(bind(&m.name));
                }
            }
            RecommendationTrigger::PlannedElements => {
                if let Some(p) = f.progress.filter(|p| !p.planned_elements.is_empty()) {
                    push(bind(&p.planned_elements.join(", ")));
                }
            }
            RecommendationTrigger::Challenges => {
                let notable = f
                    .progress
                    .is_some_and(|p| p.challenges.iter().any(|c| c != STANDARD_CONSIDERATIONS));
                if notable {
                    push(bind(""));
                }
            }
            RecommendationTrigger::UncalibratedDimensions => {
                if !f.components.is_empty() && !f.dimensions_calibrated {
                    push(bind(""));
                }
            }
            RecommendationTrigger::NoFindings => {
                if f.materials.is_empty() && f.components.is_empty() {
                    push(bind(""));
                }
            }
            RecommendationTrigger::Always => push(bind("")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AnalysisKind;
    use crate::types::{Condition, Material, StructuralComponent};
    use std::collections::BTreeMap;

    fn beam(condition: Condition) -> StructuralComponent {
        StructuralComponent {
            component_type: "beam".into(),
            material: "steel".into(),
            dimensions: BTreeMap::new(),
            location: "upper region".into(),
            construction_method: "bolted steel connections".into(),
            condition,
            confidence: 0.7,
            notable_features: Vec::new(),
            matched_share: 0.02,
        }
    }

    fn findings<'a>(
        materials: &'a [Material],
        components: &'a [StructuralComponent],
    ) -> Findings<'a> {
        Findings {
            kind: AnalysisKind::Comprehensive,
            materials,
            components,
            progress: None,
            dimensions_calibrated: false,
        }
    }

    #[test]
    fn empty_findings_ask_for_better_images() {
        let kb = KnowledgeBase::builtin().expect("builtin");
        let recs = recommendations(&kb, &findings(&[], &[]));
        assert_eq!(recs.len(), 3);
        assert!(recs[0].starts_with("Capture additional images"));
        assert!(recs[2].starts_with("Ensure compliance"));
    }

    #[test]
    fn poor_components_trigger_one_inspection_line() {
        let kb = KnowledgeBase::builtin().expect("builtin");
        let components = [beam(Condition::Poor), beam(Condition::Poor), beam(Condition::Good)];
        let recs = recommendations(&kb, &findings(&[], &components));
        let inspections: Vec<_> = recs
            .iter()
            .filter(|r| r.starts_with("Schedule detailed structural inspection"))
            .collect();
        assert_eq!(inspections.len(), 1);
        assert!(inspections[0].contains("load-bearing beam"));
        assert!(recs.iter().any(|r| r.starts_with("Confirm component dimensions")));
    }

    #[test]
    fn low_confidence_materials_are_named() {
        let kb = KnowledgeBase::builtin().expect("builtin");
        let materials = [Material {
            name: "wood".into(),
            confidence: 0.45,
            quantity: "12.0% of visible area".into(),
            location: "upper region".into(),
            properties: BTreeMap::new(),
            color_info: None,
            texture: None,
            matched_share: 0.12,
        }];
        let recs = recommendations(&kb, &findings(&materials, &[]));
        assert!(recs
            .iter()
            .any(|r| r == "Verify wood identification through physical testing."));
    }
}
