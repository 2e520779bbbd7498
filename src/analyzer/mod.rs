//! Site analyzer orchestrating the stage pipeline for one frame.
//!
//! Overview
//! - Extracts the `FeatureSet` (resize, denoise, contrast, colour clusters,
//!   texture grid, line segments).
//! - Runs material matching and component detection side by side on the
//!   rayon pool; they share nothing but the read-only inputs.
//! - After the join, attributes materials to components, estimates progress,
//!   renders the narrative and assembles the immutable result.
//!
//! Typical usage:
//! ```no_run
//! use site_insight::{AnalysisKind, AnalysisParams, ImageMeta, ImageRgb8, KnowledgeBase, SiteAnalyzer};
//! use std::sync::Arc;
//!
//! # fn example(pixels: &[u8], w: usize, h: usize) -> Result<(), Box<dyn std::error::Error>> {
//! let kb = Arc::new(KnowledgeBase::builtin()?);
//! let analyzer = SiteAnalyzer::new(kb, AnalysisParams::default());
//! let image = ImageRgb8 { w, h, stride: w * 3, data: pixels };
//! let report = analyzer.analyze(&image, &ImageMeta::from_filename("site.jpg"), AnalysisKind::Comprehensive)?;
//! println!("{}", report.result.summary);
//! # Ok(())
//! # }
//! ```
mod assemble;
mod cancel;
mod kind;
mod params;

pub use assemble::{assemble, confidence_score};
pub use cancel::CancelToken;
pub use kind::{AnalysisKind, Stage, StageSelection};
pub use params::AnalysisParams;

use crate::diagnostics::{AnalysisReport, ImageInfo, PipelineTrace, TimingBreakdown};
use crate::error::AnalysisError;
use crate::features::FeatureExtractor;
use crate::image::{ImageMeta, ImageRgb8};
use crate::knowledge::KnowledgeBase;
use crate::matching::MaterialMatcher;
use crate::narrative::{DescriptionGenerator, Embedder, Findings, HashingEmbedder};
use crate::progress::ProgressEstimator;
use crate::structure::StructuralComponentDetector;
use log::debug;
use std::sync::Arc;
use std::time::Instant;

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Stateless between calls; one analyzer can serve concurrent requests.
pub struct SiteAnalyzer {
    kb: Arc<KnowledgeBase>,
    params: AnalysisParams,
    extractor: FeatureExtractor,
    narrator: DescriptionGenerator,
}

impl SiteAnalyzer {
    /// Analyzer with the deterministic hashing embedder.
    pub fn new(kb: Arc<KnowledgeBase>, params: AnalysisParams) -> Self {
        Self::with_embedder(kb, params, Arc::new(HashingEmbedder::default()))
    }

    pub fn with_embedder(
        kb: Arc<KnowledgeBase>,
        params: AnalysisParams,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        let extractor = FeatureExtractor::new(params.extractor.clone());
        let narrator = DescriptionGenerator::new(kb.clone(), embedder, params.narrative.clone());
        Self {
            kb,
            params,
            extractor,
            narrator,
        }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    pub fn analyze(
        &self,
        image: &ImageRgb8<'_>,
        meta: &ImageMeta,
        kind: AnalysisKind,
    ) -> Result<AnalysisReport, AnalysisError> {
        self.analyze_with_cancel(image, meta, kind, &CancelToken::new())
    }

    pub fn analyze_with_cancel(
        &self,
        image: &ImageRgb8<'_>,
        meta: &ImageMeta,
        kind: AnalysisKind,
        cancel: &CancelToken,
    ) -> Result<AnalysisReport, AnalysisError> {
        debug!(
            "SiteAnalyzer::analyze start {} w={} h={} kind={}",
            meta.filename, image.w, image.h, kind
        );
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();
        let stages = kind.stages();
        let p = &self.params;

        cancel.checkpoint(Stage::Extract)?;
        let start = Instant::now();
        let features = self.extractor.extract(image)?;
        timings.push(Stage::Extract.as_str(), elapsed_ms(start));

        cancel.checkpoint(Stage::MatchAndDetect)?;
        let matcher = MaterialMatcher::new(&self.kb, &p.matcher);
        let detector = StructuralComponentDetector::new(&self.kb, &p.detector);
        let ((matches, match_ms), (candidates, detect_ms)) = rayon::join(
            || {
                let start = Instant::now();
                let matches = matcher.match_clusters(&features);
                (matches, elapsed_ms(start))
            },
            || {
                let start = Instant::now();
                let candidates = if stages.detect_components() {
                    detector.detect(&features)
                } else {
                    Vec::new()
                };
                (candidates, elapsed_ms(start))
            },
        );
        timings.push("material matching", match_ms);
        timings.push("component detection", detect_ms);
        let components = detector.attribute_materials(candidates, &features, &matches, &matcher);
        let materials: Vec<_> = matches.into_iter().map(|m| m.material).collect();

        cancel.checkpoint(Stage::EstimateProgress)?;
        let progress = if stages.estimate_progress {
            let start = Instant::now();
            let estimator = ProgressEstimator::new(&self.kb, &p.progress);
            let progress = estimator.estimate(&materials, &components, &features);
            timings.push(Stage::EstimateProgress.as_str(), elapsed_ms(start));
            progress
        } else {
            None
        };

        let reported_materials = if stages.report_materials {
            materials
        } else {
            Vec::new()
        };
        let reported_components = if stages.report_components {
            components
        } else {
            Vec::new()
        };

        cancel.checkpoint(Stage::GenerateDescription)?;
        let start = Instant::now();
        let narrative = self.narrator.generate(&Findings {
            kind,
            materials: &reported_materials,
            components: &reported_components,
            progress: progress.as_ref(),
            dimensions_calibrated: p.detector.is_calibrated(),
        });
        timings.push(Stage::GenerateDescription.as_str(), elapsed_ms(start));
        let narrative_degraded = narrative.degraded;

        cancel.checkpoint(Stage::Assemble)?;
        let result = assemble(reported_materials, reported_components, progress, narrative)?;
        timings.total_ms = elapsed_ms(total_start);

        debug!(
            "SiteAnalyzer::analyze done materials={} components={} progress={} score={:.3} total_ms={:.1}",
            result.materials.len(),
            result.structural_components.len(),
            result.project_progress.is_some(),
            result.confidence_score,
            timings.total_ms
        );

        Ok(AnalysisReport {
            analysis_type: kind,
            image_info: ImageInfo::new(meta, image.w, image.h),
            result,
            trace: PipelineTrace {
                timings,
                working_size: (features.width, features.height),
                cluster_count: features.colors.len(),
                segment_count: features.geometry.segments.len(),
                uniform: features.uniform,
                narrative_degraded,
            },
        })
    }
}
