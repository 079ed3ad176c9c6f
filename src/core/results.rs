//! Model result tables - per-run variable series and scalar objectives
//!
//! Result files identify runs with a `<prefix>_<integer>` MODELRUN label.
//! The integer ordinal is parsed exactly once, at load time, into a
//! first-class [`RunId`]; everything downstream orders by that integer so
//! string parsing never becomes a correctness dependency again.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResultError {
    #[error("failed to read result file {path}: {source}")]
    Read {
        path: String,
        source: csv::Error,
    },

    #[error("run identifier '{label}' has no numeric '_<integer>' suffix")]
    BadRunId { label: String },

    #[error("duplicate objective rows for run '{label}'")]
    DuplicateRun { label: String },

    #[error("result file {path} contains no rows")]
    Empty { path: String },
}

/// A model run identifier with its parsed ordinal
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunId {
    pub label: String,
    pub ordinal: usize,
}

impl FromStr for RunId {
    type Err = ResultError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let ordinal = label
            .rsplit_once('_')
            .and_then(|(_, suffix)| suffix.parse::<usize>().ok())
            .ok_or_else(|| ResultError::BadRunId {
                label: label.to_string(),
            })?;
        Ok(Self {
            label: label.to_string(),
            ordinal,
        })
    }
}

/// Which observation metric a variable result file is analyzed for
///
/// Share outputs store the fractional share in VALUE and the raw quantity in
/// absolute_production. The per-year observation follows the metric directly;
/// the scalar (whole-horizon) observation is always the raw quantity, since
/// share fractions do not sum meaningfully across years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Fractional share (the VALUE column)
    Share,
    /// Raw summed quantity (absolute_production when present, else VALUE)
    Absolute,
}

#[derive(Debug, Deserialize)]
struct RawVariableRow {
    #[serde(rename = "MODELRUN")]
    modelrun: String,
    #[serde(rename = "YEAR")]
    year: i32,
    #[serde(rename = "VALUE")]
    value: f64,
    #[serde(default)]
    absolute_production: Option<f64>,
}

/// One loaded row of a per-run variable result file
#[derive(Debug, Clone, PartialEq)]
pub struct VariableRow {
    pub run: RunId,
    pub year: i32,
    pub value: f64,
    pub absolute_production: Option<f64>,
}

/// A variable result file across all model runs
#[derive(Debug, Clone)]
pub struct VariableResults {
    rows: Vec<VariableRow>,
    kind: MetricKind,
}

impl VariableResults {
    /// Load a variable result CSV; the metric kind is decided by whether the
    /// absolute_production column is present, never by the file name
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ResultError> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|source| ResultError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let mut rows = Vec::new();
        for row in reader.deserialize::<RawVariableRow>() {
            let raw = row.map_err(|source| ResultError::Read {
                path: path.display().to_string(),
                source,
            })?;
            rows.push(VariableRow {
                run: raw.modelrun.parse()?,
                year: raw.year,
                value: raw.value,
                absolute_production: raw.absolute_production,
            });
        }
        if rows.is_empty() {
            return Err(ResultError::Empty {
                path: path.display().to_string(),
            });
        }
        let kind = if rows.iter().any(|r| r.absolute_production.is_some()) {
            MetricKind::Share
        } else {
            MetricKind::Absolute
        };
        Ok(Self { rows, kind })
    }

    pub fn from_rows(rows: Vec<VariableRow>, kind: MetricKind) -> Self {
        Self { rows, kind }
    }

    /// Override the inferred metric, e.g. to take the raw quantity out of a
    /// share file
    pub fn with_kind(mut self, kind: MetricKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn rows(&self) -> &[VariableRow] {
        &self.rows
    }

    /// Sorted distinct years present in the table
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.rows.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Metric value summed per (run ordinal, year), for per-year alignment
    pub fn sum_by_run_year(&self) -> BTreeMap<(usize, i32), f64> {
        let mut sums: BTreeMap<(usize, i32), f64> = BTreeMap::new();
        for row in &self.rows {
            let value = match self.kind {
                MetricKind::Share => row.value,
                MetricKind::Absolute => row.absolute_production.unwrap_or(row.value),
            };
            *sums.entry((row.run.ordinal, row.year)).or_default() += value;
        }
        sums
    }

    /// Whole-horizon observation per run ordinal, always the raw quantity:
    /// absolute_production where the file carries it, VALUE otherwise
    pub fn sum_by_run(&self) -> BTreeMap<usize, f64> {
        let mut sums: BTreeMap<usize, f64> = BTreeMap::new();
        for row in &self.rows {
            let value = row.absolute_production.unwrap_or(row.value);
            *sums.entry(row.run.ordinal).or_default() += value;
        }
        sums
    }
}

#[derive(Debug, Deserialize)]
struct RawObjectiveRow {
    #[serde(rename = "MODELRUN")]
    modelrun: String,
    #[serde(rename = "OBJECTIVE")]
    objective: f64,
}

/// One scalar objective value per completed model run
#[derive(Debug, Clone)]
pub struct ObjectiveResults {
    values: BTreeMap<usize, f64>,
}

impl ObjectiveResults {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ResultError> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|source| ResultError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let mut values = BTreeMap::new();
        for row in reader.deserialize::<RawObjectiveRow>() {
            let raw = row.map_err(|source| ResultError::Read {
                path: path.display().to_string(),
                source,
            })?;
            let run: RunId = raw.modelrun.parse()?;
            if values.insert(run.ordinal, raw.objective).is_some() {
                return Err(ResultError::DuplicateRun { label: run.label });
            }
        }
        if values.is_empty() {
            return Err(ResultError::Empty {
                path: path.display().to_string(),
            });
        }
        Ok(Self { values })
    }

    pub fn from_values(values: BTreeMap<usize, f64>) -> Self {
        Self { values }
    }

    pub fn get(&self, ordinal: usize) -> Option<f64> {
        self.values.get(&ordinal).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_run_id_parses_ordinal_suffix() {
        let run: RunId = "model_run_17".parse().unwrap();
        assert_eq!(run.ordinal, 17);
        assert_eq!(run.label, "model_run_17");
    }

    #[test]
    fn test_run_id_rejects_missing_suffix() {
        assert!(matches!(
            "modelrun".parse::<RunId>(),
            Err(ResultError::BadRunId { .. })
        ));
        assert!(matches!(
            "model_run_x".parse::<RunId>(),
            Err(ResultError::BadRunId { .. })
        ));
    }

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_variable_results_kind_from_columns() {
        let share = write_file(
            "REGION,TECHNOLOGY,YEAR,VALUE,absolute_production,MODELRUN\n\
             REGION1,DKBIOMASS,2015,0.5,10.0,model_run_0\n",
        );
        let results = VariableResults::load(share.path()).unwrap();
        assert_eq!(results.kind(), MetricKind::Share);

        let plain = write_file(
            "REGION,TECHNOLOGY,FUEL,YEAR,VALUE,MODELRUN\n\
             REGION1,DKFC00000,DKE1,2015,4.0,model_run_0\n",
        );
        let results = VariableResults::load(plain.path()).unwrap();
        assert_eq!(results.kind(), MetricKind::Absolute);
    }

    #[test]
    fn test_sum_by_run_year_groups_values() {
        let file = write_file(
            "REGION,TECHNOLOGY,FUEL,YEAR,VALUE,MODELRUN\n\
             REGION1,DKA,DKE1,2020,1.0,model_run_0\n\
             REGION1,SEA,SEE1,2020,2.0,model_run_0\n\
             REGION1,DKA,DKE1,2021,5.0,model_run_0\n\
             REGION1,DKA,DKE1,2020,7.0,model_run_3\n",
        );
        let results = VariableResults::load(file.path()).unwrap();
        let sums = results.sum_by_run_year();
        assert_eq!(sums[&(0, 2020)], 3.0);
        assert_eq!(sums[&(0, 2021)], 5.0);
        assert_eq!(sums[&(3, 2020)], 7.0);
        assert_eq!(results.years(), vec![2020, 2021]);
    }

    #[test]
    fn test_sum_by_run_year_follows_metric_kind() {
        let file = write_file(
            "REGION,TECHNOLOGY,YEAR,VALUE,absolute_production,MODELRUN\n\
             REGION1,DKBIOMASS,2015,0.5,10.0,model_run_0\n\
             REGION1,SEBIOMASS,2015,0.25,4.0,model_run_0\n",
        );
        // Inferred share metric sums the fractional VALUE column
        let results = VariableResults::load(file.path()).unwrap();
        assert_eq!(results.kind(), MetricKind::Share);
        assert_eq!(results.sum_by_run_year()[&(0, 2015)], 0.75);

        // Overridden to absolute, the raw quantity is taken instead
        let results = results.with_kind(MetricKind::Absolute);
        assert_eq!(results.sum_by_run_year()[&(0, 2015)], 14.0);
    }

    #[test]
    fn test_sum_by_run_uses_absolute_production_for_shares() {
        let file = write_file(
            "REGION,TECHNOLOGY,YEAR,VALUE,absolute_production,MODELRUN\n\
             REGION1,DKBIOMASS,2015,0.5,10.0,model_run_0\n\
             REGION1,DKBIOMASS,2016,0.25,4.0,model_run_0\n",
        );
        let results = VariableResults::load(file.path()).unwrap();
        let sums = results.sum_by_run();
        assert_eq!(sums[&0], 14.0);
    }

    #[test]
    fn test_duplicate_objective_run_rejected() {
        let file = write_file(
            "MODELRUN,OBJECTIVE\n\
             model_run_0,100.0\n\
             model_run_0,250.0\n",
        );
        let err = ObjectiveResults::load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ResultError::DuplicateRun { label } if label == "model_run_0"
        ));
    }

    #[test]
    fn test_objective_results_lookup() {
        let file = write_file(
            "MODELRUN,OBJECTIVE\n\
             model_run_1,200.0\n\
             model_run_0,100.0\n",
        );
        let objectives = ObjectiveResults::load(file.path()).unwrap();
        assert_eq!(objectives.get(0), Some(100.0));
        assert_eq!(objectives.get(1), Some(200.0));
        assert_eq!(objectives.get(2), None);
    }
}
