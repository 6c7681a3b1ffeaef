mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{router_with_store, send, FailingStore, TestApp};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn analyzes_text_from_query_string() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/TextAnalyzer?text=Hello%20world.").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"]["wordCount"], 2);
    assert_eq!(body["analysis"]["sentenceCount"], 1);
    assert_eq!(body["analysis"]["characterCount"], 12);
    assert_eq!(body["analysis"]["longestWord"], "world.");
    assert_eq!(body["metadata"]["textPreview"], "Hello world.");
    assert!(body["metadata"]["analyzedAt"].as_str().unwrap().ends_with('Z'));
    assert!(uuid::Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
    // The response never echoes the full text back
    assert!(body.get("originalText").is_none());
}

#[tokio::test]
async fn analyzes_text_from_json_body() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json(
            "/api/TextAnalyzer",
            json!({ "text": "First paragraph. Still first!\n\nSecond one?" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"]["wordCount"], 6);
    assert_eq!(body["analysis"]["sentenceCount"], 3);
    assert_eq!(body["analysis"]["paragraphCount"], 2);
}

#[tokio::test]
async fn saves_each_analysis() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/TextAnalyzer?text=Persist%20me").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(app.store.len(), 1);
    let stored = app
        .store
        .get(body["id"].as_str().unwrap())
        .expect("analysis should be stored under the returned id");
    assert_eq!(stored.original_text, "Persist me");
    assert_eq!(stored.analysis.word_count, 2);
}

#[tokio::test]
async fn missing_text_returns_usage_instructions() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/TextAnalyzer").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No text provided");
    assert_eq!(body["howToUse"]["option1"], "Add ?text=YourText to the URL");
    assert!(body["howToUse"]["option2"]
        .as_str()
        .unwrap()
        .contains("POST request with JSON body"));
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn empty_text_is_rejected() {
    let app = TestApp::new();

    let (status, _) = app.get("/api/TextAnalyzer?text=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.post_json("/api/TextAnalyzer", json!({ "text": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No text provided");
}

#[tokio::test]
async fn malformed_body_is_treated_as_missing_text() {
    let app = TestApp::new();

    let (status, body) = send(
        &app.router,
        Request::builder()
            .method("POST")
            .uri("/api/TextAnalyzer")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("howToUse").is_some());
}

#[tokio::test]
async fn save_failure_still_returns_analysis() {
    let router = router_with_store(Arc::new(FailingStore));

    let (status, body) = send(
        &router,
        Request::builder()
            .uri("/api/TextAnalyzer?text=Hello%20world.")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"]["wordCount"], 2);
    assert!(body["id"].is_string());
}

#[tokio::test]
async fn long_text_preview_is_truncated() {
    let app = TestApp::new();
    let text = "word ".repeat(40);

    let (status, body) = app.post_json("/api/TextAnalyzer", json!({ "text": text })).await;

    assert_eq!(status, StatusCode::OK);
    let preview = body["metadata"]["textPreview"].as_str().unwrap();
    assert_eq!(preview.chars().count(), 103);
    assert!(preview.ends_with("..."));
    assert_eq!(body["analysis"]["wordCount"], 40);
    assert_eq!(body["analysis"]["readingTimeMinutes"], 0.2);
}
