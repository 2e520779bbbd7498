//! Error taxonomy for the analysis pipeline and the knowledge base.
//!
//! Only two outcomes are fatal for a request: the image could not be turned
//! into descriptors, or an internal invariant broke. Low-confidence output and
//! narrative degradation are not errors.
use std::path::PathBuf;
use thiserror::Error;

use crate::analyzer::Stage;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The input frame cannot yield any usable descriptor (e.g. zero-size buffer).
    #[error("feature extraction failed: {0}")]
    FeatureExtractionFailed(String),
    /// Unexpected internal failure.
    #[error("analysis failed: {0}")]
    AnalysisFailed(String),
    /// A caller-supplied cancel token fired at a stage checkpoint.
    #[error("analysis cancelled before {stage}")]
    Cancelled { stage: Stage },
}

#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    #[error("failed to read knowledge base {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse knowledge base: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid knowledge base: {0}")]
    Invalid(String),
}

/// Failure of the text-embedding capability.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("empty text has no embedding")]
    EmptyText,
    #[error("embedding backend failed: {0}")]
    Backend(String),
}

/// Internal failure of the description stage. Always recovered with the
/// fallback template; never returned from the pipeline.
#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("template references unbound slot '{0}'")]
    MissingSlot(String),
    #[error("unterminated slot in template '{0}'")]
    MalformedTemplate(String),
    #[error(transparent)]
    Embed(#[from] EmbedError),
}
