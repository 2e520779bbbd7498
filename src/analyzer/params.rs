use crate::features::ExtractorParams;
use crate::matching::MatcherParams;
use crate::narrative::NarrativeParams;
use crate::progress::ProgressParams;
use crate::structure::DetectorParams;
use serde::Deserialize;

/// All stage parameters; any omitted group keeps its defaults.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    pub extractor: ExtractorParams,
    pub matcher: MatcherParams,
    pub detector: DetectorParams,
    pub progress: ProgressParams,
    pub narrative: NarrativeParams,
}
