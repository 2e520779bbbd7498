mod common;

use common::synthetic_image::{beams_rgb, blank_rgb, concrete_rgb};
use site_insight::{
    AnalysisError, AnalysisKind, AnalysisParams, AnalysisResult, CancelToken, ImageMeta,
    ImageRgb8, KnowledgeBase, SiteAnalyzer, Stage,
};
use std::sync::Arc;
use std::time::Instant;

fn analyzer() -> SiteAnalyzer {
    let _ = env_logger::builder().is_test(true).try_init();
    let kb = Arc::new(KnowledgeBase::builtin().expect("builtin knowledge base"));
    SiteAnalyzer::new(kb, AnalysisParams::default())
}

fn view(w: usize, h: usize, data: &[u8]) -> ImageRgb8<'_> {
    ImageRgb8 {
        w,
        h,
        stride: w * 3,
        data,
    }
}

fn assert_well_formed(result: &AnalysisResult) {
    assert!((0.0..=1.0).contains(&result.confidence_score));
    for m in &result.materials {
        assert!((0.0..=1.0).contains(&m.confidence), "{}: {}", m.name, m.confidence);
    }
    for c in &result.structural_components {
        assert!(
            (0.0..=1.0).contains(&c.confidence),
            "{}: {}",
            c.component_type,
            c.confidence
        );
        assert!(c.dimensions.values().all(|v| v.is_finite() && *v >= 0.0));
    }
    if let Some(p) = &result.project_progress {
        assert!((0.0..=100.0).contains(&p.completion_percentage));
    }
    assert!(result
        .materials
        .windows(2)
        .all(|w| w[0].confidence >= w[1].confidence));
    assert!(result
        .structural_components
        .windows(2)
        .all(|w| w[0].confidence >= w[1].confidence));
    assert!(!result.summary.is_empty());
}

#[test]
fn repeated_analysis_is_deterministic() {
    let analyzer = analyzer();
    let (w, h, data) = beams_rgb();
    let img = view(w, h, &data);
    let meta = ImageMeta::from_filename("beams.png");
    let a = analyzer
        .analyze(&img, &meta, AnalysisKind::Comprehensive)
        .expect("first run");
    let b = analyzer
        .analyze(&img, &meta, AnalysisKind::Comprehensive)
        .expect("second run");
    assert_eq!(a.result, b.result);
    assert_eq!(a.trace.segment_count, b.trace.segment_count);
    assert_eq!(a.trace.cluster_count, b.trace.cluster_count);
}

#[test]
fn every_kind_produces_a_well_formed_result() {
    let analyzer = analyzer();
    let (w, h, data) = beams_rgb();
    let img = view(w, h, &data);
    let meta = ImageMeta::from_filename("beams.png");
    for kind in AnalysisKind::ALL {
        let report = analyzer.analyze(&img, &meta, kind).expect("analysis");
        assert_eq!(report.analysis_type, kind);
        assert_well_formed(&report.result);
        assert!(report
            .result
            .summary
            .starts_with(&format!("=== {} Analysis Summary ===", kind.title())));
        let stages = kind.stages();
        if !stages.report_materials {
            assert!(report.result.materials.is_empty());
        }
        if !stages.report_components {
            assert!(report.result.structural_components.is_empty());
        }
        if !stages.estimate_progress {
            assert!(report.result.project_progress.is_none());
        }
    }
}

#[test]
fn image_info_reflects_the_input() {
    let analyzer = analyzer();
    let data = concrete_rgb(200, 100);
    let report = analyzer
        .analyze(
            &view(200, 100, &data),
            &ImageMeta::from_filename("slab.JPG"),
            AnalysisKind::MaterialIdentification,
        )
        .expect("analysis");
    let info = &report.image_info;
    assert_eq!(info.filename, "slab.JPG");
    assert_eq!(info.format, "jpg");
    assert_eq!((info.width, info.height), (200, 100));
    assert_eq!(info.total_pixels, 20_000);
    assert!((info.aspect_ratio - 2.0).abs() < 1e-6);
}

#[test]
fn blank_frame_degrades_to_an_empty_result() {
    let analyzer = analyzer();
    let data = blank_rgb(160, 120);
    let report = analyzer
        .analyze(
            &view(160, 120, &data),
            &ImageMeta::from_filename("blank.png"),
            AnalysisKind::Comprehensive,
        )
        .expect("a flat frame is not an error");
    let result = &report.result;
    assert!(report.trace.uniform);
    assert!(result.materials.is_empty());
    assert!(result.structural_components.is_empty());
    assert!(result.project_progress.is_none());
    assert_eq!(result.confidence_score, 0.0);
    assert!(result
        .summary
        .contains("No materials or structural components were identified with sufficient confidence."));
}

#[test]
fn cancelled_token_stops_before_extraction() {
    let analyzer = analyzer();
    let data = concrete_rgb(64, 48);
    let token = CancelToken::new();
    token.cancel();
    let err = analyzer
        .analyze_with_cancel(
            &view(64, 48, &data),
            &ImageMeta::default(),
            AnalysisKind::Comprehensive,
            &token,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Cancelled {
            stage: Stage::Extract
        }
    ));
}

#[test]
fn expired_deadline_cancels_the_request() {
    let analyzer = analyzer();
    let data = concrete_rgb(64, 48);
    let token = CancelToken::with_deadline(Instant::now());
    let err = analyzer
        .analyze_with_cancel(
            &view(64, 48, &data),
            &ImageMeta::default(),
            AnalysisKind::StructuralAnalysis,
            &token,
        )
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Cancelled { .. }));
}

#[test]
fn truncated_buffer_is_rejected() {
    let analyzer = analyzer();
    let data = vec![128u8; 10 * 10 * 3 - 1];
    let err = analyzer
        .analyze(
            &view(10, 10, &data),
            &ImageMeta::default(),
            AnalysisKind::Comprehensive,
        )
        .unwrap_err();
    assert!(matches!(err, AnalysisError::FeatureExtractionFailed(_)));
}

#[test]
fn analyzer_serves_concurrent_requests() {
    let analyzer = Arc::new(analyzer());
    let (w, h, data) = beams_rgb();
    let data = Arc::new(data);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let analyzer = Arc::clone(&analyzer);
            let data = Arc::clone(&data);
            std::thread::spawn(move || {
                analyzer
                    .analyze(
                        &view(w, h, &data),
                        &ImageMeta::from_filename("beams.png"),
                        AnalysisKind::Comprehensive,
                    )
                    .expect("analysis")
                    .result
            })
        })
        .collect();
    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("worker thread"))
        .collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}
