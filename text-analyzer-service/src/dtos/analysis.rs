use crate::models::{AnalysisDocument, AnalysisMetadata, AnalysisSummary, TextStatistics};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct TextParams {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<String>,
}

/// One analysis as returned to clients, both right after analysing and in
/// the history listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub id: String,
    pub analysis: TextStatistics,
    pub metadata: AnalysisMetadata,
}

impl From<&AnalysisDocument> for AnalysisResponse {
    fn from(doc: &AnalysisDocument) -> Self {
        Self {
            id: doc.id.clone(),
            analysis: doc.analysis.clone(),
            metadata: doc.metadata.clone(),
        }
    }
}

impl From<AnalysisSummary> for AnalysisResponse {
    fn from(summary: AnalysisSummary) -> Self {
        Self {
            id: summary.id,
            analysis: summary.analysis,
            metadata: summary.metadata,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub count: usize,
    pub results: Vec<AnalysisResponse>,
}
