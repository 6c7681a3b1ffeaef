use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest prefix, in characters, kept in `textPreview` before the ellipsis.
pub const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStatistics {
    pub word_count: i64,
    pub character_count: i64,
    pub character_count_no_spaces: i64,
    pub sentence_count: i64,
    pub paragraph_count: i64,
    pub average_word_length: f64,
    pub longest_word: String,
    pub reading_time_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    /// RFC 3339, UTC, fixed microsecond precision. Sorting the strings sorts
    /// the analyses chronologically.
    pub analyzed_at: String,
    pub text_preview: String,
}

/// A stored analysis. Written once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub original_text: String,
    pub analysis: TextStatistics,
    pub metadata: AnalysisMetadata,
}

/// History projection of [`AnalysisDocument`]; the original text is not read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub analysis: TextStatistics,
    pub metadata: AnalysisMetadata,
}

impl AnalysisDocument {
    pub fn new(
        original_text: String,
        analysis: TextStatistics,
        analyzed_at: DateTime<Utc>,
    ) -> Self {
        let metadata = AnalysisMetadata {
            analyzed_at: format_timestamp(analyzed_at),
            text_preview: text_preview(&original_text),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            original_text,
            analysis,
            metadata,
        }
    }

    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            id: self.id.clone(),
            analysis: self.analysis.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn text_preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
