//! Parameter catalog - the immutable table of parameters driving an experiment
//!
//! One catalog row describes one perturbed model parameter: its bounds at the
//! base and end year, the entity it applies to, and how the model input
//! builder should treat it over time. Row order is load-bearing: it defines
//! the column order of the design matrix and must never be re-sorted on its
//! own.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the downstream model-input builder treats a parameter over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Action {
    /// Constant over the whole horizon, equal to the base-year value
    #[default]
    Fixed,
    /// Linearly interpolated from base-year to end-year value
    Interpolate,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Fixed => write!(f, "fixed"),
            Action::Interpolate => write!(f, "interpolate"),
        }
    }
}

/// One row of the parameter catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Metric identifier (e.g. a cost or ratio type)
    pub name: String,

    /// Label used to batch related parameters for reporting
    pub group: String,

    /// Ordered dimension keys identifying the perturbed model entity
    /// (e.g. region, technology, mode)
    pub indexes: Vec<String>,

    /// Lower bound at the base year
    pub min_value_base_year: f64,

    /// Upper bound at the base year
    pub max_value_base_year: f64,

    /// Lower bound at the end year
    pub min_value_end_year: f64,

    /// Upper bound at the end year
    pub max_value_end_year: f64,

    /// Sampling distribution (currently always uniform)
    pub distribution: String,

    /// Axis along which base/end values are later interpolated, if any
    pub interpolation_index: Option<String>,

    /// Whether the value is held fixed or interpolated over time
    pub action: Action,
}

impl Parameter {
    /// Indexes joined back into their catalog file form, e.g. "REGION1,HYD1"
    pub fn indexes_label(&self) -> String {
        self.indexes.join(",")
    }
}

/// Catalog loading/validation errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read parameter catalog {path}: {source}")]
    Read {
        path: String,
        source: csv::Error,
    },

    #[error("parameter '{name}' (indexes {indexes}): {field} value '{value}' is not numeric")]
    InvalidBound {
        name: String,
        indexes: String,
        field: &'static str,
        value: String,
    },

    #[error("parameter '{name}' (indexes {indexes}): unknown action '{value}' (expected 'fixed' or 'interpolate')")]
    InvalidAction {
        name: String,
        indexes: String,
        value: String,
    },

    #[error("parameter catalog is empty")]
    Empty,
}

/// Raw catalog row as it appears in the CSV file
///
/// Bounds stay strings here so a malformed cell can be reported with the
/// owning parameter's identity instead of a bare parse error.
#[derive(Debug, Deserialize)]
struct RawParameter {
    name: String,
    group: String,
    indexes: String,
    min_value_base_year: String,
    max_value_base_year: String,
    min_value_end_year: String,
    max_value_end_year: String,
    dist: String,
    #[serde(default)]
    interpolation_index: String,
    action: String,
}

impl RawParameter {
    fn bound(&self, field: &'static str, value: &str) -> Result<f64, CatalogError> {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| CatalogError::InvalidBound {
                name: self.name.clone(),
                indexes: self.indexes.clone(),
                field,
                value: value.to_string(),
            })
    }

    fn validate(self) -> Result<Parameter, CatalogError> {
        let min_value_base_year = self.bound("min_value_base_year", &self.min_value_base_year)?;
        let max_value_base_year = self.bound("max_value_base_year", &self.max_value_base_year)?;
        let min_value_end_year = self.bound("min_value_end_year", &self.min_value_end_year)?;
        let max_value_end_year = self.bound("max_value_end_year", &self.max_value_end_year)?;

        let action = match self.action.trim() {
            "fixed" => Action::Fixed,
            "interpolate" => Action::Interpolate,
            other => {
                return Err(CatalogError::InvalidAction {
                    name: self.name,
                    indexes: self.indexes,
                    value: other.to_string(),
                })
            }
        };

        Ok(Parameter {
            name: self.name,
            group: self.group,
            indexes: self
                .indexes
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            min_value_base_year,
            max_value_base_year,
            min_value_end_year,
            max_value_end_year,
            distribution: self.dist,
            interpolation_index: normalize_interpolation_index(&self.interpolation_index),
            action,
        })
    }
}

/// "None"/"none"/empty in the catalog file all mean no interpolation axis
pub(crate) fn normalize_interpolation_index(raw: &str) -> Option<String> {
    match raw.trim() {
        "" | "None" | "none" => None,
        other => Some(other.to_string()),
    }
}

/// Immutable, order-preserving table of parameter definitions
#[derive(Debug, Clone)]
pub struct ParameterCatalog {
    parameters: Vec<Parameter>,
}

impl ParameterCatalog {
    /// Build a catalog from already-validated rows, preserving order
    pub fn new(parameters: Vec<Parameter>) -> Result<Self, CatalogError> {
        if parameters.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { parameters })
    }

    /// Load and validate a catalog CSV file
    ///
    /// Any non-numeric bound fails the whole load; a single malformed row
    /// would invalidate column alignment for every model run.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let mut parameters = Vec::new();
        for row in reader.deserialize::<RawParameter>() {
            let raw = row.map_err(|source| CatalogError::Read {
                path: path.display().to_string(),
                source,
            })?;
            parameters.push(raw.validate()?);
        }
        Self::new(parameters)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.parameters.iter()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Distinct group labels in first-appearance (catalog) order
    pub fn group_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for param in &self.parameters {
            if !labels.iter().any(|g| g == &param.group) {
                labels.push(param.group.clone());
            }
        }
        labels
    }
}
