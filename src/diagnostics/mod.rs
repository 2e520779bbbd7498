//! Diagnostics returned alongside the wire result.
//!
//! `AnalysisReport` wraps the `AnalysisResult` with a description of the input
//! frame and a `PipelineTrace` of per-stage timings and descriptor counts.
//! The result itself keeps its exact wire shape; everything else lives here.

pub mod report;
pub mod timing;

pub use report::{AnalysisReport, ImageInfo, PipelineTrace};
pub use timing::{StageTiming, TimingBreakdown};
