//! Data processing modules.

pub mod analysis;

// Re-export key types for convenience
pub use analysis::{
    analyze_propellers, rank_propellers, AnalysisError, PerformancePoint, ResultRow,
};
