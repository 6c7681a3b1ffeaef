use crate::dtos::{AnalysisResponse, HistoryParams, HistoryResponse, TextParams};
use crate::models::AnalysisDocument;
use crate::services::analyze;
use crate::services::metrics::record_analysis;
use crate::services::store::{
    clamp_limit, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT, MIN_HISTORY_LIMIT,
};
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde_json::json;
use service_core::error::AppError;

/// `GET|POST /api/TextAnalyzer`
///
/// Text comes from `?text=` or, failing that, a JSON body `{"text": ...}`.
/// The analysis is returned even when it could not be stored.
pub async fn analyze_text(
    State(state): State<AppState>,
    query: Option<Query<TextParams>>,
    body: Bytes,
) -> Result<Json<AnalysisResponse>, AppError> {
    tracing::info!("Text analysis requested");

    let query_text = query.and_then(|Query(params)| params.text);
    let text = resolve_text(query_text, &body).ok_or_else(missing_text)?;

    let analysis = analyze(&text);
    let document = AnalysisDocument::new(text, analysis, Utc::now());

    let persisted = match state.store.save(&document).await {
        Ok(()) => {
            tracing::info!(document_id = %document.id, "Saved analysis");
            true
        }
        Err(e) => {
            tracing::error!(document_id = %document.id, error = %e, "Failed to save analysis");
            false
        }
    };
    record_analysis(persisted);

    Ok(Json(AnalysisResponse::from(&document)))
}

/// `GET /api/GetAnalysisHistory`
pub async fn analysis_history(
    State(state): State<AppState>,
    query: Option<Query<HistoryParams>>,
) -> Result<Json<HistoryResponse>, AppError> {
    let raw_limit = query.and_then(|Query(params)| params.limit);
    let limit = parse_limit(raw_limit.as_deref());
    tracing::info!(limit = limit, "Analysis history requested");

    let results = state.store.query(limit).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to get history");
        AppError::RetrievalError("Failed to retrieve history".to_string(), anyhow::Error::new(e))
    })?;

    let results: Vec<AnalysisResponse> = results.into_iter().map(AnalysisResponse::from).collect();

    Ok(Json(HistoryResponse {
        count: results.len(),
        results,
    }))
}

/// Query text wins unless it is empty. An unreadable body counts as no body.
fn resolve_text(query_text: Option<String>, body: &[u8]) -> Option<String> {
    if let Some(text) = query_text.filter(|t| !t.is_empty()) {
        return Some(text);
    }

    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("text")
        .and_then(|t| t.as_str())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn missing_text() -> AppError {
    AppError::MissingInput {
        message: "No text provided".to_string(),
        how_to_use: json!({
            "option1": "Add ?text=YourText to the URL",
            "option2": "Send a POST request with JSON body: {\"text\": \"Your text here\"}"
        }),
    }
}

/// Lenient `limit` parsing: default when absent or not an integer, clamped
/// otherwise. Integers too wide for `i64` clamp by sign.
pub fn parse_limit(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return DEFAULT_HISTORY_LIMIT;
    };
    let trimmed = raw.trim();

    match trimmed.parse::<i64>() {
        Ok(limit) => clamp_limit(limit),
        Err(_) => {
            let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                if trimmed.starts_with('-') {
                    MIN_HISTORY_LIMIT
                } else {
                    MAX_HISTORY_LIMIT
                }
            } else {
                DEFAULT_HISTORY_LIMIT
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_to_ten() {
        assert_eq!(parse_limit(None), 10);
        assert_eq!(parse_limit(Some("")), 10);
        assert_eq!(parse_limit(Some("abc")), 10);
        assert_eq!(parse_limit(Some("5.5")), 10);
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(parse_limit(Some("0")), 1);
        assert_eq!(parse_limit(Some("-3")), 1);
        assert_eq!(parse_limit(Some("101")), 100);
        assert_eq!(parse_limit(Some("25")), 25);
    }

    #[test]
    fn limit_accepts_whitespace_and_sign() {
        assert_eq!(parse_limit(Some(" 7 ")), 7);
        assert_eq!(parse_limit(Some("+4")), 4);
    }

    #[test]
    fn oversized_limits_clamp_by_sign() {
        assert_eq!(parse_limit(Some("99999999999999999999999")), 100);
        assert_eq!(parse_limit(Some("-99999999999999999999999")), 1);
    }

    #[test]
    fn query_text_takes_precedence() {
        let body = br#"{"text": "from body"}"#;
        assert_eq!(
            resolve_text(Some("from query".to_string()), body),
            Some("from query".to_string())
        );
    }

    #[test]
    fn empty_query_text_falls_back_to_body() {
        let body = br#"{"text": "from body"}"#;
        assert_eq!(
            resolve_text(Some(String::new()), body),
            Some("from body".to_string())
        );
    }

    #[test]
    fn unusable_bodies_yield_no_text() {
        assert_eq!(resolve_text(None, b""), None);
        assert_eq!(resolve_text(None, b"not json"), None);
        assert_eq!(resolve_text(None, br#"["text"]"#), None);
        assert_eq!(resolve_text(None, br#"{"text": 42}"#), None);
        assert_eq!(resolve_text(None, br#"{"text": ""}"#), None);
    }
}
