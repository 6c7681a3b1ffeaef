pub mod analyzer;
pub mod database;
pub mod metrics;
pub mod store;

pub use analyzer::analyze;
pub use database::MongoAnalysisStore;
pub use metrics::{get_metrics, init_metrics};
pub use store::{AnalysisStore, InMemoryAnalysisStore};
