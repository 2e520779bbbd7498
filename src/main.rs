use site_insight::{AnalysisKind, AnalysisParams, ImageMeta, ImageRgb8, KnowledgeBase, SiteAnalyzer};
use std::sync::Arc;

fn main() {
    env_logger::init();
    // Demo frame: concrete-gray slab under four dark horizontal beams.
    let (w, h) = (320usize, 240usize);
    let mut data = vec![0u8; w * h * 3];
    for y in 0..h {
        for x in 0..w {
            let on_beam = (20..300).contains(&x)
                && [40, 90, 140, 190].iter().any(|&t| (t..t + 8).contains(&y));
            let v = if on_beam { 90 } else { 150 };
            let i = (y * w + x) * 3;
            data[i..i + 3].copy_from_slice(&[v, v, v]);
        }
    }
    let img = ImageRgb8 {
        w,
        h,
        stride: w * 3,
        data: &data,
    };

    let kb = match KnowledgeBase::builtin() {
        Ok(kb) => Arc::new(kb),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };
    let analyzer = SiteAnalyzer::new(kb, AnalysisParams::default());
    match analyzer.analyze(&img, &ImageMeta::new("demo", "synthetic"), AnalysisKind::Comprehensive) {
        Ok(report) => {
            println!("{}", report.result.summary);
            println!(
                "confidence={:.3} latency_ms={:.3}",
                report.result.confidence_score, report.trace.timings.total_ms
            );
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
