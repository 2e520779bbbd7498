use serde::{Deserialize, Serialize};
use std::fmt;

/// Which findings a request asks for. Each kind is a stage selection over
/// the same pipeline, not a separate analyzer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    MaterialIdentification,
    StructuralAnalysis,
    ProjectProgress,
    #[default]
    Comprehensive,
}

/// Stages enabled for one kind. Material matching always runs because
/// component attribution and progress both consume it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageSelection {
    pub report_materials: bool,
    pub report_components: bool,
    pub estimate_progress: bool,
}

impl StageSelection {
    pub fn detect_components(&self) -> bool {
        self.report_components || self.estimate_progress
    }
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 4] = [
        AnalysisKind::MaterialIdentification,
        AnalysisKind::StructuralAnalysis,
        AnalysisKind::ProjectProgress,
        AnalysisKind::Comprehensive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::MaterialIdentification => "material_identification",
            AnalysisKind::StructuralAnalysis => "structural_analysis",
            AnalysisKind::ProjectProgress => "project_progress",
            AnalysisKind::Comprehensive => "comprehensive",
        }
    }

    /// Heading form, e.g. "Material Identification".
    pub fn title(&self) -> &'static str {
        match self {
            AnalysisKind::MaterialIdentification => "Material Identification",
            AnalysisKind::StructuralAnalysis => "Structural Analysis",
            AnalysisKind::ProjectProgress => "Project Progress",
            AnalysisKind::Comprehensive => "Comprehensive",
        }
    }

    /// Running-text form, e.g. "material identification".
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisKind::MaterialIdentification => "material identification",
            AnalysisKind::StructuralAnalysis => "structural analysis",
            AnalysisKind::ProjectProgress => "project progress",
            AnalysisKind::Comprehensive => "comprehensive",
        }
    }

    pub fn stages(&self) -> StageSelection {
        let (report_materials, report_components, estimate_progress) = match self {
            AnalysisKind::MaterialIdentification => (true, false, false),
            AnalysisKind::StructuralAnalysis => (true, true, false),
            AnalysisKind::ProjectProgress => (false, false, true),
            AnalysisKind::Comprehensive => (true, true, true),
        };
        StageSelection {
            report_materials,
            report_components,
            estimate_progress,
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalysisKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown analysis type '{s}'"))
    }
}

/// Pipeline stages, in execution order. Cancellation checkpoints sit in
/// front of each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Extract,
    MatchAndDetect,
    EstimateProgress,
    GenerateDescription,
    Assemble,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Extract => "feature extraction",
            Stage::MatchAndDetect => "material matching and component detection",
            Stage::EstimateProgress => "progress estimation",
            Stage::GenerateDescription => "description generation",
            Stage::Assemble => "result assembly",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
