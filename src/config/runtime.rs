use crate::analyzer::{AnalysisKind, AnalysisParams};
use crate::knowledge::KnowledgeBase;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub analysis_type: AnalysisKind,
    /// Knowledge base JSON; the built-in one when absent.
    #[serde(default)]
    pub knowledge_base: Option<PathBuf>,
    #[serde(default)]
    pub params: AnalysisParams,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Wire-shaped `AnalysisResult`.
    pub result_json: Option<PathBuf>,
    /// Full report with image info and stage timings.
    pub report_json: Option<PathBuf>,
}

impl RuntimeConfig {
    pub fn load_knowledge_base(&self) -> Result<KnowledgeBase, String> {
        match &self.knowledge_base {
            Some(path) => KnowledgeBase::load(path).map_err(|e| e.to_string()),
            None => KnowledgeBase::builtin().map_err(|e| e.to_string()),
        }
    }
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

pub fn parse_config(text: &str) -> Result<RuntimeConfig, serde_json::Error> {
    serde_json::from_str(text)
}
