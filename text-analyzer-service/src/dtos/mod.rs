pub mod analysis;

pub use analysis::{AnalysisResponse, HistoryParams, HistoryResponse, TextParams};
