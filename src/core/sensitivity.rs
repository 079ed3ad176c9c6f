//! Sensitivity analysis driver - scalar and per-year elementary effects
//!
//! The scalar path runs the estimator once against a whole-experiment
//! observation vector. The time-indexed path runs it independently for every
//! year in the result calendar and collects the mu_star statistic into a
//! parameter x year structure. Years are statistically independent: a failure
//! in one year is recorded and its column zeroed, never aborting the rest.

use std::path::Path;

use thiserror::Error;

use crate::core::align::{self, AlignError};
use crate::core::catalog::ParameterCatalog;
use crate::core::morris::{self, GroupStats, MorrisError, Problem};
use crate::core::results::VariableResults;
use crate::core::sample::Sample;

#[derive(Debug, Error)]
pub enum SensitivityError {
    #[error("design matrix has {x_rows} rows but {run_count} model runs are declared")]
    RunCountMismatch { x_rows: usize, run_count: usize },

    #[error(transparent)]
    Align(#[from] AlignError),

    #[error(transparent)]
    Morris(#[from] MorrisError),

    #[error("failed to write sensitivity file {path}: {source}")]
    Write {
        path: String,
        source: csv::Error,
    },
}

/// A year whose estimator call failed; its statistics were zeroed
#[derive(Debug, Clone, PartialEq)]
pub struct YearFailure {
    pub year: i32,
    pub reason: String,
}

/// mu_star collected year by year, in computation (year-major) layout
///
/// `columns[i]` holds one value per group label for `years[i]`. The
/// parameter-major presentation is the heatmap builder's job.
#[derive(Debug, Clone)]
pub struct YearlySensitivity {
    pub labels: Vec<String>,
    pub years: Vec<i32>,
    pub columns: Vec<Vec<f64>>,
    pub failures: Vec<YearFailure>,
}

/// Drives the elementary-effects estimator over aligned observations
#[derive(Debug, Clone)]
pub struct SensitivityAnalyzer {
    problem: Problem,
    run_count: usize,
    scaled: bool,
}

impl SensitivityAnalyzer {
    pub fn new(catalog: &ParameterCatalog, run_count: usize, scaled: bool) -> Self {
        Self {
            problem: Problem::from(catalog),
            run_count,
            scaled,
        }
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    /// The one up-front alignment guarantee: X rows must equal declared runs
    fn check_sample(&self, x: &Sample) -> Result<(), SensitivityError> {
        if x.run_count() != self.run_count {
            return Err(SensitivityError::RunCountMismatch {
                x_rows: x.run_count(),
                run_count: self.run_count,
            });
        }
        Ok(())
    }

    /// One estimator call over a scalar observation vector
    pub fn analyze_scalar(
        &self,
        x: &Sample,
        y: &[f64],
    ) -> Result<Vec<GroupStats>, SensitivityError> {
        self.check_sample(x)?;
        Ok(morris::analyze(&self.problem, x.matrix(), y, self.scaled)?)
    }

    /// Independent estimator calls for every year present in the results
    ///
    /// Alignment errors are dataset-wide and fatal; estimator errors are
    /// per-year, recorded in `failures` with that year's column zeroed.
    pub fn analyze_years(
        &self,
        x: &Sample,
        results: &VariableResults,
    ) -> Result<YearlySensitivity, SensitivityError> {
        self.check_sample(x)?;

        let labels = self.problem.group_labels();
        let years = results.years();
        let mut columns = Vec::with_capacity(years.len());
        let mut failures = Vec::new();

        for &year in &years {
            let y = align::align_year(results, self.run_count, year)?;
            match morris::analyze(&self.problem, x.matrix(), &y, self.scaled) {
                Ok(stats) => columns.push(stats.into_iter().map(|s| s.mu_star).collect()),
                Err(err) => {
                    failures.push(YearFailure {
                        year,
                        reason: err.to_string(),
                    });
                    columns.push(vec![0.0; labels.len()]);
                }
            }
        }

        Ok(YearlySensitivity {
            labels,
            years,
            columns,
            failures,
        })
    }
}

/// Write a scalar statistics table: one row per parameter group
pub fn write_stats(stats: &[GroupStats], path: impl AsRef<Path>) -> Result<(), SensitivityError> {
    let path = path.as_ref();
    let write_err = |source: csv::Error| SensitivityError::Write {
        path: path.display().to_string(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(write_err)?;
    writer
        .write_record(["parameter", "mu", "mu_star", "sigma"])
        .map_err(write_err)?;
    for s in stats {
        writer
            .write_record([
                s.name.clone(),
                s.mu.to_string(),
                s.mu_star.to_string(),
                s.sigma.to_string(),
            ])
            .map_err(write_err)?;
    }
    writer.flush().map_err(|source| SensitivityError::Write {
        path: path.display().to_string(),
        source: source.into(),
    })
}
