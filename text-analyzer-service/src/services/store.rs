use crate::models::{AnalysisDocument, AnalysisSummary};
use async_trait::async_trait;
use service_core::error::AppError;
use std::collections::VecDeque;
use std::sync::Mutex;

pub const DEFAULT_HISTORY_LIMIT: i64 = 10;
pub const MIN_HISTORY_LIMIT: i64 = 1;
pub const MAX_HISTORY_LIMIT: i64 = 100;

/// Documents kept by [`InMemoryAnalysisStore::new`]; the oldest inserts are
/// dropped beyond this.
pub const IN_MEMORY_CAPACITY: usize = 1_000;

pub fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(MIN_HISTORY_LIMIT, MAX_HISTORY_LIMIT)
}

/// Persistence for analyses.
///
/// Implementations hold a long-lived client; handlers share one instance
/// through `AppState`.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Inserts a new analysis.
    async fn save(&self, document: &AnalysisDocument) -> Result<(), AppError>;

    /// Most recent analyses first. `limit` is clamped to 1..=100.
    async fn query(&self, limit: i64) -> Result<Vec<AnalysisSummary>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

/// Process-local store, used when no database is configured and in tests.
///
/// Bounded: once `capacity` documents are held, each save evicts the oldest
/// insert.
pub struct InMemoryAnalysisStore {
    documents: Mutex<VecDeque<AnalysisDocument>>,
    capacity: usize,
}

impl Default for InMemoryAnalysisStore {
    fn default() -> Self {
        Self::with_capacity(IN_MEMORY_CAPACITY)
    }
}

impl InMemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            documents: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.documents.lock().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<AnalysisDocument> {
        self.documents
            .lock()
            .ok()?
            .iter()
            .find(|doc| doc.id == id)
            .cloned()
    }
}

fn poisoned(e: &dyn std::fmt::Display) -> AppError {
    AppError::DatabaseError(anyhow::anyhow!("In-memory store mutex poisoned: {}", e))
}

#[async_trait]
impl AnalysisStore for InMemoryAnalysisStore {
    async fn save(&self, document: &AnalysisDocument) -> Result<(), AppError> {
        let mut documents = self.documents.lock().map_err(|e| poisoned(&e))?;
        while documents.len() >= self.capacity {
            documents.pop_front();
        }
        documents.push_back(document.clone());
        Ok(())
    }

    async fn query(&self, limit: i64) -> Result<Vec<AnalysisSummary>, AppError> {
        let documents = self
            .documents
            .lock()
            .map_err(|e| poisoned(&e))?;

        // Newest insert first so equal timestamps keep insertion recency.
        let mut summaries: Vec<AnalysisSummary> =
            documents.iter().rev().map(AnalysisDocument::summary).collect();
        summaries.sort_by(|a, b| b.metadata.analyzed_at.cmp(&a.metadata.analyzed_at));
        summaries.truncate(clamp_limit(limit) as usize);

        Ok(summaries)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
