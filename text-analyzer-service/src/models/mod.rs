pub mod analysis;

pub use analysis::{AnalysisDocument, AnalysisMetadata, AnalysisSummary, TextStatistics};
