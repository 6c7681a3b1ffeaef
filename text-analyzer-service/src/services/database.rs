use crate::models::{AnalysisDocument, AnalysisSummary};
use crate::services::store::{clamp_limit, AnalysisStore};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Client as MongoClient, Collection, IndexModel,
};
use secrecy::{ExposeSecret, Secret};
use service_core::error::AppError;

/// Analysis store backed by a MongoDB-compatible document database
/// (Cosmos DB's MongoDB API in production).
///
/// One client is created at startup; the driver pools connections and hands
/// one out per operation.
#[derive(Clone)]
pub struct MongoAnalysisStore {
    client: MongoClient,
    collection: Collection<AnalysisDocument>,
}

impl MongoAnalysisStore {
    pub async fn connect(
        connection_string: &Secret<String>,
        database: &str,
        container: &str,
    ) -> Result<Self, AppError> {
        tracing::info!(
            database = %database,
            container = %container,
            "Connecting to document store"
        );
        let client = MongoClient::with_uri_str(connection_string.expose_secret())
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to document store: {}", e);
                AppError::from(e)
            })?;
        let collection = client.database(database).collection(container);
        tracing::info!(database = %database, "Successfully connected to document store");
        Ok(Self { client, collection })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        let analyzed_at_index = IndexModel::builder()
            .keys(doc! { "metadata.analyzedAt": -1 })
            .options(
                IndexOptions::builder()
                    .name("analyzed_at_desc".to_string())
                    .build(),
            )
            .build();

        self.collection
            .create_index(analyzed_at_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create analyzedAt index: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on metadata.analyzedAt");

        Ok(())
    }

    pub fn collection(&self) -> &Collection<AnalysisDocument> {
        &self.collection
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

#[async_trait]
impl AnalysisStore for MongoAnalysisStore {
    async fn save(&self, document: &AnalysisDocument) -> Result<(), AppError> {
        self.collection.insert_one(document, None).await?;
        Ok(())
    }

    async fn query(&self, limit: i64) -> Result<Vec<AnalysisSummary>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "metadata.analyzedAt": -1 })
            .limit(clamp_limit(limit))
            .projection(doc! { "originalText": 0 })
            .build();

        let cursor = self
            .collection
            .clone_with_type::<AnalysisSummary>()
            .find(None, options)
            .await?;

        let results: Vec<AnalysisSummary> = cursor.try_collect().await?;
        Ok(results)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("Document store health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}
