#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod analyzer;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod knowledge;
pub mod types;

// Stage modules – public so tools and tests can drive individual stages.
pub mod angle;
pub mod colorspace;
pub mod config;
pub mod edges;
pub mod features;
pub mod matching;
pub mod narrative;
pub mod preprocess;
pub mod progress;
pub mod segments;
pub mod structure;

// --- High-level re-exports -------------------------------------------------

pub use crate::analyzer::{AnalysisKind, AnalysisParams, CancelToken, SiteAnalyzer, Stage};
pub use crate::diagnostics::{AnalysisReport, ImageInfo, PipelineTrace};
pub use crate::error::AnalysisError;
pub use crate::image::{ImageMeta, ImageRgb8};
pub use crate::knowledge::KnowledgeBase;
pub use crate::types::{
    AnalysisResult, Condition, Material, ProjectProgress, StructuralComponent,
};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::analyzer::{AnalysisKind, AnalysisParams, SiteAnalyzer};
    pub use crate::image::{ImageMeta, ImageRgb8};
    pub use crate::knowledge::KnowledgeBase;
    pub use crate::types::AnalysisResult;
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    pub use crate::features::{FeatureExtractor, FeatureSet};
    pub use crate::matching::MaterialMatcher;
    pub use crate::narrative::{DescriptionGenerator, Embedder, HashingEmbedder, Narrative};
    pub use crate::progress::ProgressEstimator;
    pub use crate::structure::StructuralComponentDetector;
}
