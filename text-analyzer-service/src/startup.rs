use crate::config::{AnalyzerConfig, StoreBackend};
use crate::handlers;
use crate::services::{AnalysisStore, InMemoryAnalysisStore, MongoAnalysisStore};
use axum::{
    body::Body,
    http::Method,
    middleware::from_fn,
    routing::get,
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    security_headers::security_headers_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: AnalyzerConfig,
    pub store: Arc<dyn AnalysisStore>,
}

impl AppState {
    pub fn new(config: AnalyzerConfig, store: Arc<dyn AnalysisStore>) -> Self {
        Self { config, store }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/TextAnalyzer",
            get(handlers::analyze_text).post(handlers::analyze_text),
        )
        .route("/api/GetAnalysisHistory", get(handlers::analysis_history))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        // Route layer so the matched path is available as a metric label
        .route_layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Creates the store selected by configuration. The returned handle owns the
/// database client for the lifetime of the application.
pub async fn build_store(config: &AnalyzerConfig) -> Result<Arc<dyn AnalysisStore>, AppError> {
    match config.store.backend {
        StoreBackend::Mongo => {
            let connection_string = config.store.connection_string.as_ref().ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!(
                    "COSMOS_CONNECTION_STRING is required but not set"
                ))
            })?;
            let store = MongoAnalysisStore::connect(
                connection_string,
                &config.store.database,
                &config.store.container,
            )
            .await?;
            store.initialize_indexes().await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            let store = InMemoryAnalysisStore::new();
            tracing::warn!(
                capacity = store.capacity(),
                "Using in-memory analysis store; history is capped and lost on restart"
            );
            Ok(Arc::new(store))
        }
    }
}

type ServerFuture = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>;

pub struct Application {
    port: u16,
    server: ServerFuture,
    state: AppState,
}

impl Application {
    pub async fn build(config: AnalyzerConfig) -> Result<Self, AppError> {
        let store = build_store(&config).await?;
        Self::with_store(config, store).await
    }

    pub async fn with_store(
        config: AnalyzerConfig,
        store: Arc<dyn AnalysisStore>,
    ) -> Result<Self, AppError> {
        let state = AppState::new(config.clone(), store);
        let app = build_router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, service = %config.service_name, "Listening");

        let server = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .into_future();

        Ok(Self {
            port,
            server: Box::pin(server),
            state,
        })
    }

    pub fn store(&self) -> &Arc<dyn AnalysisStore> {
        &self.state.store
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
