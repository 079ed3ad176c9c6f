//! Command implementations

pub mod aggregate;
pub mod analyze;
pub mod expand;
pub mod heatmap;
