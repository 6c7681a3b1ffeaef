pub mod analysis;
pub mod health;
pub mod metrics;

pub use analysis::{analysis_history, analyze_text};
pub use health::{health_check, readiness_check};
pub use metrics::metrics_endpoint;
