#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use service_core::error::AppError;
use std::sync::Arc;
use text_analyzer_service::config::AnalyzerConfig;
use text_analyzer_service::models::{AnalysisDocument, AnalysisSummary};
use text_analyzer_service::services::{AnalysisStore, InMemoryAnalysisStore};
use text_analyzer_service::{build_router, AppState};
use tower::util::ServiceExt;

/// Store whose every operation fails, standing in for an unreachable database.
pub struct FailingStore;

#[async_trait]
impl AnalysisStore for FailingStore {
    async fn save(&self, _document: &AnalysisDocument) -> Result<(), AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!("write refused")))
    }

    async fn query(&self, _limit: i64) -> Result<Vec<AnalysisSummary>, AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!("connection refused")))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!("connection refused")))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryAnalysisStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryAnalysisStore::new());
        let router = router_with_store(store.clone());
        Self { router, store }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        send(
            &self.router,
            Request::builder().uri(uri).body(Body::empty()).unwrap(),
        )
        .await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        send(
            &self.router,
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

pub fn router_with_store(store: Arc<dyn AnalysisStore>) -> Router {
    build_router(AppState::new(AnalyzerConfig::in_memory(), store))
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}
