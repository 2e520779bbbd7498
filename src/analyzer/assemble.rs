//! Pure construction of the final result from fully computed parts.
use crate::error::AnalysisError;
use crate::narrative::Narrative;
use crate::types::{
    sort_components, sort_materials, AnalysisResult, Material, ProjectProgress,
    StructuralComponent,
};

fn check_unit(what: &str, value: f32) -> Result<f32, AnalysisError> {
    if value.is_finite() {
        Ok(value.clamp(0.0, 1.0))
    } else {
        Err(AnalysisError::AnalysisFailed(format!(
            "{what} confidence is not finite"
        )))
    }
}

fn check_materials(materials: &mut [Material]) -> Result<(), AnalysisError> {
    for m in materials.iter_mut() {
        m.confidence = check_unit(&format!("material '{}'", m.name), m.confidence)?;
    }
    sort_materials(materials);
    Ok(())
}

/// Count-weighted mean confidence of the reported entries. A progress-only
/// result falls back to the materials the progress estimate used.
pub fn confidence_score(
    materials: &[Material],
    components: &[StructuralComponent],
    progress: Option<&ProjectProgress>,
) -> f32 {
    let (mut sum, mut n) = (0.0f32, 0usize);
    for c in materials.iter().map(|m| m.confidence).chain(components.iter().map(|c| c.confidence)) {
        sum += c;
        n += 1;
    }
    if n == 0 {
        if let Some(p) = progress {
            for m in &p.materials_used {
                sum += m.confidence;
                n += 1;
            }
        }
    }
    if n == 0 {
        0.0
    } else {
        (sum / n as f32).clamp(0.0, 1.0)
    }
}

/// Validate, clamp and order the parts, then build the result.
pub fn assemble(
    mut materials: Vec<Material>,
    mut components: Vec<StructuralComponent>,
    mut progress: Option<ProjectProgress>,
    narrative: Narrative,
) -> Result<AnalysisResult, AnalysisError> {
    check_materials(&mut materials)?;
    for c in components.iter_mut() {
        c.confidence = check_unit(&format!("component '{}'", c.component_type), c.confidence)?;
        if c.dimensions.values().any(|v| !v.is_finite()) {
            return Err(AnalysisError::AnalysisFailed(format!(
                "component '{}' has a non-finite dimension",
                c.component_type
            )));
        }
    }
    sort_components(&mut components);
    if let Some(p) = progress.as_mut() {
        if !p.completion_percentage.is_finite() {
            return Err(AnalysisError::AnalysisFailed(
                "completion percentage is not finite".into(),
            ));
        }
        p.completion_percentage = p.completion_percentage.clamp(0.0, 100.0);
        check_materials(&mut p.materials_used)?;
    }

    let confidence_score = confidence_score(&materials, &components, progress.as_ref());
    Ok(AnalysisResult {
        materials,
        structural_components: components,
        project_progress: progress,
        summary: narrative.summary,
        detailed_description: narrative.detailed_description,
        recommendations: narrative.recommendations,
        confidence_score,
    })
}
