//! Narrative generation: summary, detailed description, recommendations.
//!
//! Every finding becomes one sentence. The sentence template is the
//! knowledge-base template whose topic embedding is most similar to the
//! finding's descriptor; below the similarity threshold, or when slot filling
//! fails, the fixed fallback template is used instead. The stage never fails:
//! internal errors are logged and the output is marked degraded.
mod embed;
mod params;
mod recommend;
mod templates;
pub mod text;

pub use embed::{cosine_similarity, Embedder, HashingEmbedder};
pub use params::NarrativeParams;
pub use recommend::recommendations;
pub use templates::{fill_template, Selection, TemplateLibrary};

use crate::analyzer::AnalysisKind;
use crate::error::NarrativeError;
use crate::knowledge::{FindingKind, KnowledgeBase};
use crate::types::{Material, ProjectProgress, StructuralComponent};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

/// Structured findings handed to the generator.
#[derive(Clone, Copy, Debug)]
pub struct Findings<'a> {
    pub kind: AnalysisKind,
    pub materials: &'a [Material],
    pub components: &'a [StructuralComponent],
    pub progress: Option<&'a ProjectProgress>,
    /// Component dimensions rest on a supplied calibration.
    pub dimensions_calibrated: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Narrative {
    pub summary: String,
    pub detailed_description: String,
    pub recommendations: Vec<String>,
    /// Some sentence fell back because of an internal failure.
    pub degraded: bool,
}

pub struct DescriptionGenerator {
    kb: Arc<KnowledgeBase>,
    embedder: Arc<dyn Embedder>,
    library: TemplateLibrary,
    params: NarrativeParams,
}

impl DescriptionGenerator {
    /// Embeds the template topics once.
    pub fn new(kb: Arc<KnowledgeBase>, embedder: Arc<dyn Embedder>, params: NarrativeParams) -> Self {
        let library = TemplateLibrary::build(&kb, embedder.as_ref());
        debug!("narrative: {} templates embedded", library.len());
        Self {
            kb,
            embedder,
            library,
            params,
        }
    }

    pub fn generate(&self, f: &Findings<'_>) -> Narrative {
        let mut degraded = false;
        let detailed_description = self.detailed_description(f, &mut degraded);
        Narrative {
            summary: self.summary(f),
            detailed_description,
            recommendations: recommendations(&self.kb, f),
            degraded,
        }
    }

    /// Short overview in the fixed section layout.
    pub fn summary(&self, f: &Findings<'_>) -> String {
        let limit = self.params.summary_limit;
        let mut lines = vec![format!("=== {} Analysis Summary ===", f.kind.title()), String::new()];
        if !f.materials.is_empty() {
            lines.push("Material Analysis:".into());
            lines.push(format!(
                "Identified {} distinct material types:",
                f.materials.len()
            ));
            for m in f.materials.iter().take(limit) {
                lines.push(format!("  • {} - {}", m.name, m.location));
            }
            lines.push(String::new());
        }
        if !f.components.is_empty() {
            lines.push("Structural Components:".into());
            lines.push(format!(
                "Detected {} structural elements:",
                f.components.len()
            ));
            for c in f.components.iter().take(limit) {
                lines.push(format!("  • {} - {}", c.component_type, c.material));
            }
            lines.push(String::new());
        }
        if let Some(p) = f.progress {
            lines.push("Project Progress:".into());
            lines.push(format!("Phase: {}", p.phase));
            lines.push(format!("Completion: {:.1}%", p.completion_percentage));
            lines.push(String::new());
        }
        if f.materials.is_empty() && f.components.is_empty() && f.progress.is_none() {
            lines.push("No materials or structural components were identified with sufficient confidence.".into());
        }
        lines.join("\n").trim_end().to_string()
    }

    fn detailed_description(&self, f: &Findings<'_>, degraded: &mut bool) -> String {
        let mut paragraphs = vec![format!(
            "This {} analysis provides comprehensive insights into the construction \
             characteristics, materials composition, and structural elements present in the \
             examined structure.",
            f.kind.label()
        )];

        if !f.materials.is_empty() {
            let sentences: Vec<String> = f
                .materials
                .iter()
                .map(|m| {
                    self.sentence(
                        FindingKind::Material,
                        &material_descriptor(&self.kb, m),
                        material_slots(&self.kb, m),
                        degraded,
                    )
                })
                .collect();
            paragraphs.push(sentences.join(" "));
            paragraphs.push(material_report(f.materials));
        }

        if !f.components.is_empty() {
            let sentences: Vec<String> = f
                .components
                .iter()
                .map(|c| {
                    self.sentence(
                        FindingKind::Component,
                        &component_descriptor(&self.kb, c),
                        component_slots(&self.kb, c),
                        degraded,
                    )
                })
                .collect();
            paragraphs.push(sentences.join(" "));
            if !f.dimensions_calibrated {
                paragraphs.push(
                    "Dimensions are approximate estimates derived from an assumed scene width \
                     and should be confirmed by on-site measurement."
                        .to_string(),
                );
            }
        }

        if let Some(p) = f.progress {
            paragraphs.push(self.sentence(
                FindingKind::Progress,
                &progress_descriptor(&self.kb, p),
                progress_slots(p),
                degraded,
            ));
            if !p.construction_methods.is_empty() {
                paragraphs.push(format!(
                    "Construction methodology analysis indicates the use of {}.",
                    p.construction_methods.join(", ")
                ));
            }
        }

        paragraphs.join("\n\n")
    }

    /// One finding rendered; never fails.
    fn sentence(
        &self,
        kind: FindingKind,
        descriptor: &str,
        slots: BTreeMap<&'static str, String>,
        degraded: &mut bool,
    ) -> String {
        let text = match self.try_sentence(kind, descriptor, &slots) {
            Ok(text) => text,
            Err(err) => {
                warn!("narrative: {kind:?} finding degraded to fallback: {err}");
                *degraded = true;
                self.fallback_sentence(&slots)
            }
        };
        capitalize(&text)
    }

    fn try_sentence(
        &self,
        kind: FindingKind,
        descriptor: &str,
        slots: &BTreeMap<&'static str, String>,
    ) -> Result<String, NarrativeError> {
        let pick = self.library.select(
            kind,
            descriptor,
            self.embedder.as_ref(),
            self.params.similarity_threshold,
        )?;
        fill_template(pick.template, slots)
    }

    fn fallback_sentence(&self, slots: &BTreeMap<&'static str, String>) -> String {
        fill_template(self.library.fallback(), slots).unwrap_or_else(|_| {
            let subject = slots.get("subject").map(String::as_str).unwrap_or("finding");
            let detail = slots.get("detail").map(String::as_str).unwrap_or("");
            format!("{subject}: {detail}.")
        })
    }
}

fn material_descriptor(kb: &KnowledgeBase, m: &Material) -> String {
    format!(
        "{} {} {}",
        m.name,
        kb.term(&m.name),
        m.texture.as_deref().unwrap_or("")
    )
}

fn component_descriptor(kb: &KnowledgeBase, c: &StructuralComponent) -> String {
    format!(
        "{} {} {}",
        c.component_type,
        kb.term(&c.component_type),
        c.notable_features.join(" ")
    )
}

fn progress_descriptor(kb: &KnowledgeBase, p: &ProjectProgress) -> String {
    format!(
        "{} {} {}",
        p.phase.replace('_', " "),
        kb.term(&p.phase),
        p.completed_elements.join(" ")
    )
}

fn list_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

fn material_slots(kb: &KnowledgeBase, m: &Material) -> BTreeMap<&'static str, String> {
    let properties: Vec<String> = m
        .properties
        .iter()
        .map(|(k, v)| format!("{}: {v}", k.replace('_', " ")))
        .collect();
    let term = kb.term(&m.name).to_string();
    let texture = m.texture.clone().unwrap_or_else(|| "unspecified".into());
    let detail = format!("{} in {}, {} texture", m.quantity, m.location, texture);
    BTreeMap::from([
        ("subject", term.clone()),
        ("detail", detail),
        ("term", term),
        ("quantity", m.quantity.clone()),
        ("location", m.location.clone()),
        ("texture", texture),
        ("confidence_pct", format!("{:.0}", m.confidence * 100.0)),
        ("properties", list_or(&properties, "no recorded properties")),
    ])
}

fn component_slots(kb: &KnowledgeBase, c: &StructuralComponent) -> BTreeMap<&'static str, String> {
    let dimensions: Vec<String> = c
        .dimensions
        .iter()
        .map(|(k, v)| format!("{k} {v:.2} m"))
        .collect();
    let term = kb.term(&c.component_type).to_string();
    let condition = kb.term(c.condition.as_str()).to_string();
    let detail = format!(
        "{} of {} in {}, showing {condition}",
        c.component_type, c.material, c.location
    );
    BTreeMap::from([
        ("subject", term.clone()),
        ("detail", detail),
        ("term", term),
        ("material", kb.term(&c.material).to_string()),
        ("location", c.location.clone()),
        ("dimensions", list_or(&dimensions, "unmeasured extents")),
        ("condition", condition),
        ("method", c.construction_method.clone()),
        ("features", list_or(&c.notable_features, "no notable features")),
    ])
}

fn progress_slots(p: &ProjectProgress) -> BTreeMap<&'static str, String> {
    let phase = p.phase.replace('_', " ");
    BTreeMap::from([
        ("subject", "Project progress".to_string()),
        (
            "detail",
            format!("{phase} phase, {:.1}% complete", p.completion_percentage),
        ),
        ("phase", phase),
        ("percentage", format!("{:.1}", p.completion_percentage)),
        ("completed", list_or(&p.completed_elements, "no recorded elements")),
        ("planned", list_or(&p.planned_elements, "no further elements")),
    ])
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Wording for a match confidence in the material report.
pub fn confidence_level(confidence: f32) -> &'static str {
    if confidence > 0.8 {
        "high"
    } else if confidence > 0.6 {
        "moderate"
    } else {
        "possible"
    }
}

/// Per-material section of the detailed description.
pub fn material_report(materials: &[Material]) -> String {
    let mut out = String::from("MATERIAL ANALYSIS REPORT\n");
    out.push_str(&"=".repeat(50));
    out.push('\n');
    for (i, m) in materials.iter().enumerate() {
        let _ = write!(
            out,
            "\n{}. {}\n   Confidence: {:.1}% ({} confidence)\n   Quantity: {}\n   Location: {}\n",
            i + 1,
            m.name.to_uppercase(),
            m.confidence * 100.0,
            confidence_level(m.confidence),
            m.quantity,
            m.location
        );
        if !m.properties.is_empty() {
            out.push_str("   Properties:\n");
            for (k, v) in &m.properties {
                let _ = writeln!(out, "     - {k}: {v}");
            }
        }
    }
    out.trim_end().to_string()
}
