use super::TimingBreakdown;
use crate::analyzer::AnalysisKind;
use crate::image::ImageMeta;
use crate::types::AnalysisResult;
use serde::Serialize;

/// Result produced by [`SiteAnalyzer::analyze`](crate::SiteAnalyzer::analyze).
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    pub analysis_type: AnalysisKind,
    pub image_info: ImageInfo,
    pub result: AnalysisResult,
    pub trace: PipelineTrace,
}

/// Input frame as received, before any resizing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImageInfo {
    pub filename: String,
    pub width: usize,
    pub height: usize,
    pub format: String,
    pub aspect_ratio: f32,
    pub total_pixels: usize,
}

impl ImageInfo {
    pub fn new(meta: &ImageMeta, width: usize, height: usize) -> Self {
        let aspect_ratio = if height > 0 {
            width as f32 / height as f32
        } else {
            0.0
        };
        Self {
            filename: meta.filename.clone(),
            width,
            height,
            format: meta.format.clone(),
            aspect_ratio,
            total_pixels: width * height,
        }
    }
}

/// What the pipeline did on this frame.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub timings: TimingBreakdown,
    /// Resolution the descriptors were computed at.
    pub working_size: (usize, usize),
    pub cluster_count: usize,
    pub segment_count: usize,
    /// The frame was flat enough to skip texture and geometry.
    pub uniform: bool,
    /// Some narrative sentence fell back after an internal failure.
    pub narrative_degraded: bool,
}
