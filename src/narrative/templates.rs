//! Template library: topic embeddings and slot filling.
use super::embed::{cosine_similarity, Embedder};
use crate::error::NarrativeError;
use crate::knowledge::{FindingKind, KnowledgeBase, TemplateSpec};
use log::warn;
use std::collections::BTreeMap;

struct Entry {
    spec: TemplateSpec,
    topic: Vec<f32>,
}

/// Knowledge-base templates with their topic vectors, embedded once.
pub struct TemplateLibrary {
    entries: Vec<Entry>,
    fallback: String,
}

/// Outcome of template selection for one finding.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection<'l> {
    pub template: &'l str,
    pub similarity: f32,
    pub fallback: bool,
}

impl TemplateLibrary {
    /// Templates whose topic cannot be embedded are skipped with a warning.
    pub fn build(kb: &KnowledgeBase, embedder: &dyn Embedder) -> Self {
        let entries = kb
            .templates
            .iter()
            .filter_map(|spec| match embedder.embed(&spec.topic) {
                Ok(topic) => Some(Entry {
                    spec: spec.clone(),
                    topic,
                }),
                Err(err) => {
                    warn!("narrative: skipping template '{}': {err}", spec.topic);
                    None
                }
            })
            .collect();
        Self {
            entries,
            fallback: kb.fallback_template.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Most similar template of `kind` for `descriptor`, or the fallback when
    /// nothing reaches `threshold`. Ties keep the earlier template.
    pub fn select(
        &self,
        kind: FindingKind,
        descriptor: &str,
        embedder: &dyn Embedder,
        threshold: f32,
    ) -> Result<Selection<'_>, NarrativeError> {
        let query = embedder.embed(descriptor)?;
        let best = self
            .entries
            .iter()
            .filter(|e| e.spec.kind == kind)
            .map(|e| (e, cosine_similarity(&query, &e.topic)))
            .fold(None::<(&Entry, f32)>, |best, cur| match best {
                Some(b) if b.1 >= cur.1 => Some(b),
                _ => Some(cur),
            });
        Ok(match best {
            Some((entry, similarity)) if similarity >= threshold => Selection {
                template: &entry.spec.template,
                similarity,
                fallback: false,
            },
            other => Selection {
                template: &self.fallback,
                similarity: other.map_or(0.0, |b| b.1),
                fallback: true,
            },
        })
    }
}

/// Substitute every `{slot}` in `template`. Unbound or unterminated slots are
/// errors so the caller can fall back.
pub fn fill_template(template: &str, slots: &BTreeMap<&str, String>) -> Result<String, NarrativeError> {
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| NarrativeError::MalformedTemplate(template.to_string()))?;
        let name = &after[..close];
        let value = slots
            .get(name)
            .ok_or_else(|| NarrativeError::MissingSlot(name.to_string()))?;
        out.push_str(value);
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
