//! GSA Toolkit: elementary-effects sensitivity analysis for energy model experiments
//!
//! Expands a normalized Morris experimental design into per-run model input
//! overrides, aggregates the runs' raw outputs onto rectangular year/country
//! grids, and computes per-year elementary-effects sensitivity measures.

pub mod cli;
pub mod core;
