// src/analysis/mod.rs
pub mod model;
pub mod service;

// Re-export commonly used types
pub use model::{
    AnalysisResult,
    Benchmark,
    ChartPoint,
    ExpenseCategories
};
pub use service::{AnalysisService, HttpAnalysisService, ServiceError};
