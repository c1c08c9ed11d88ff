// src/view/mod.rs
pub mod layout;
pub mod projection;

// Re-export commonly used types
pub use layout::{compose, Section};
pub use projection::{CardStyle, CategoryBar, DashboardView, MetricCard};
