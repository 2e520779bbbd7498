use site_insight::config::load_config;
use site_insight::image::io::{load_rgb_image, write_json_file};
use site_insight::SiteAnalyzer;
use std::env;
use std::path::Path;
use std::sync::Arc;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let kb = Arc::new(config.load_knowledge_base()?);
    let image = load_rgb_image(&config.input)?;
    let analyzer = SiteAnalyzer::new(kb, config.params.clone());
    let report = analyzer
        .analyze(&image.as_view(), image.meta(), config.analysis_type)
        .map_err(|e| e.to_string())?;

    println!("{}", report.result.summary);
    println!(
        "confidence={:.3} materials={} components={} total_ms={:.1}",
        report.result.confidence_score,
        report.result.materials.len(),
        report.result.structural_components.len(),
        report.trace.timings.total_ms
    );

    if let Some(path) = &config.output.result_json {
        write_json_file(path, &report.result)?;
        println!("Saved result to {}", path.display());
    }
    if let Some(path) = &config.output.report_json {
        write_json_file(path, &report)?;
        println!("Saved report to {}", path.display());
    }
    Ok(())
}

fn usage() -> String {
    "Usage: site_analyze <config.json>".to_string()
}
