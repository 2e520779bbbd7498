use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct NarrativeParams {
    /// Minimum cosine similarity between a finding and a template topic.
    pub similarity_threshold: f32,
    /// Entries listed per section of the summary.
    pub summary_limit: usize,
}

impl Default for NarrativeParams {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.2,
            summary_limit: 5,
        }
    }
}
