//! Sample expansion - normalized design matrix to per-run override tables
//!
//! Every [0,1] cell of the design matrix is rescaled affinely into the
//! physical bounds of its catalog parameter, once for the base year and once
//! for the end year. The expander never interpolates across years itself;
//! it only fixes the two endpoint values for the downstream model-input
//! builder.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::core::catalog::{Action, ParameterCatalog};
use crate::core::sample::Sample;

/// Relative tolerance for the degenerate-bound check, mirroring the sampler's
/// convention for "these two bounds are the same number"
const BOUND_REL_TOL: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum ExpandError {
    #[error("sample has {sample_columns} columns but the catalog declares {catalog_rows} parameters")]
    ColumnMismatch {
        sample_columns: usize,
        catalog_rows: usize,
    },

    #[error("failed to write override file {path}: {source}")]
    Write {
        path: String,
        source: csv::Error,
    },

    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },
}

/// One expanded (run, parameter) record, consumed by the model-input builder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOverride {
    pub name: String,
    pub indexes: String,
    pub value_base_year: f64,
    pub value_end_year: f64,
    pub action: Action,
    #[serde(serialize_with = "serialize_interpolation_index")]
    pub interpolation_index: Option<String>,
}

/// Absent interpolation axes are written as the literal "None", matching the
/// catalog file convention the model-input builder expects
fn serialize_interpolation_index<S>(
    value: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(axis) => serializer.serialize_str(axis),
        None => serializer.serialize_str("None"),
    }
}

fn isclose(a: f64, b: f64) -> bool {
    (a - b).abs() <= BOUND_REL_TOL * a.abs().max(b.abs())
}

/// Affine rescale of a normalized cell into [min, max]
///
/// Degenerate ranges bypass the arithmetic entirely so a constant bound never
/// picks up floating noise.
fn scale(min: f64, max: f64, cell: f64) -> f64 {
    if isclose(min, max) {
        min
    } else {
        (max - min) * cell + min
    }
}

/// Expand a design matrix into one override table per model run
///
/// Pure and deterministic: the same (sample, catalog) pair always yields the
/// same tables. Both endpoint values are computed unconditionally regardless
/// of `action`; collapsing fixed parameters is the consumer's call.
pub fn expand(
    sample: &Sample,
    catalog: &ParameterCatalog,
) -> Result<Vec<Vec<RunOverride>>, ExpandError> {
    if sample.parameter_count() != catalog.len() {
        return Err(ExpandError::ColumnMismatch {
            sample_columns: sample.parameter_count(),
            catalog_rows: catalog.len(),
        });
    }

    let mut tables = Vec::with_capacity(sample.run_count());
    for run in 0..sample.run_count() {
        let mut table = Vec::with_capacity(catalog.len());
        for (column, param) in catalog.iter().enumerate() {
            let cell = sample.cell(run, column);
            table.push(RunOverride {
                name: param.name.clone(),
                indexes: param.indexes_label(),
                value_base_year: scale(
                    param.min_value_base_year,
                    param.max_value_base_year,
                    cell,
                ),
                value_end_year: scale(param.min_value_end_year, param.max_value_end_year, cell),
                action: param.action,
                interpolation_index: param.interpolation_index.clone(),
            });
        }
        tables.push(table);
    }
    Ok(tables)
}

/// Write one `<prefix>_<ordinal>.csv` override file per run
///
/// Returns the written paths in run order.
pub fn write_override_files(
    tables: &[Vec<RunOverride>],
    output_dir: impl AsRef<Path>,
    prefix: &str,
) -> Result<Vec<PathBuf>, ExpandError> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir).map_err(|source| ExpandError::CreateDir {
        path: output_dir.display().to_string(),
        source,
    })?;

    let mut paths = Vec::with_capacity(tables.len());
    for (run, table) in tables.iter().enumerate() {
        let path = output_dir.join(format!("{prefix}_{run}.csv"));
        let mut writer =
            csv::Writer::from_path(&path).map_err(|source| ExpandError::Write {
                path: path.display().to_string(),
                source,
            })?;
        for record in table {
            writer
                .serialize(record)
                .map_err(|source| ExpandError::Write {
                    path: path.display().to_string(),
                    source,
                })?;
        }
        writer.flush().map_err(|source| ExpandError::Write {
            path: path.display().to_string(),
            source: source.into(),
        })?;
        paths.push(path);
    }
    Ok(paths)
}
