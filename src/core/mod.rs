//! Core module - the sampling-expansion / aggregation / alignment / analysis chain

pub mod aggregate;
pub mod align;
pub mod catalog;
pub mod expand;
pub mod heatmap;
pub mod morris;
pub mod results;
pub mod sample;
pub mod sensitivity;

pub use aggregate::{
    calc_share, calc_sum, load_production, write_records, AggregateError, AggregationGrid,
    ProductionRecord, ShareRecord,
};
pub use align::{align_objectives, align_total, align_year, AlignError};
pub use catalog::{Action, CatalogError, Parameter, ParameterCatalog};
pub use expand::{expand, write_override_files, ExpandError, RunOverride};
pub use heatmap::{shape, HeatmapError, LabeledMatrix};
pub use morris::{GroupStats, MorrisError, Problem};
pub use results::{MetricKind, ObjectiveResults, ResultError, RunId, VariableResults};
pub use sample::{Sample, SampleError};
pub use sensitivity::{SensitivityAnalyzer, SensitivityError, YearFailure, YearlySensitivity};
