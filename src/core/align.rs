//! Run alignment - observation vectors ordered to match the design matrix
//!
//! The sensitivity analyzer pairs rows positionally: observation i must
//! belong to the run expanded from design-matrix row i. Runs absent from a
//! year degrade to zero observations (partial completion is expected when
//! runs execute out of order or fail), so alignment never blocks on missing
//! variable data. Scalar objectives have no such zero-fill: a declared run
//! without an objective is a dataset error.

use thiserror::Error;

use crate::core::results::{ObjectiveResults, VariableResults};

#[derive(Debug, Error)]
pub enum AlignError {
    #[error("result data names run ordinal {ordinal} but only {run_count} runs are declared")]
    RunOutOfRange { ordinal: usize, run_count: usize },

    #[error("no objective value for declared run {ordinal}")]
    MissingObjective { ordinal: usize },
}

/// Observation vector for one year, zero-filled to the declared run count
///
/// Returns exactly `run_count` values ordered by run ordinal. Runs with no
/// rows for `year` observe zero; a year entirely absent from the data yields
/// the all-zero vector.
pub fn align_year(
    results: &VariableResults,
    run_count: usize,
    year: i32,
) -> Result<Vec<f64>, AlignError> {
    let sums = results.sum_by_run_year();

    if let Some(&(ordinal, _)) = sums.keys().find(|(ordinal, _)| *ordinal >= run_count) {
        return Err(AlignError::RunOutOfRange { ordinal, run_count });
    }

    let mut aligned = vec![0.0; run_count];
    for ((ordinal, row_year), value) in &sums {
        if *row_year == year {
            aligned[*ordinal] = *value;
        }
    }
    Ok(aligned)
}

/// Whole-horizon observation vector, one summed value per run
pub fn align_total(results: &VariableResults, run_count: usize) -> Result<Vec<f64>, AlignError> {
    let sums = results.sum_by_run();

    if let Some(&ordinal) = sums.keys().find(|ordinal| **ordinal >= run_count) {
        return Err(AlignError::RunOutOfRange {
            ordinal,
            run_count,
        });
    }

    let mut aligned = vec![0.0; run_count];
    for (ordinal, value) in &sums {
        aligned[*ordinal] = *value;
    }
    Ok(aligned)
}

/// Scalar objective vector in run-ordinal order, no zero-fill
pub fn align_objectives(
    objectives: &ObjectiveResults,
    run_count: usize,
) -> Result<Vec<f64>, AlignError> {
    (0..run_count)
        .map(|ordinal| {
            objectives
                .get(ordinal)
                .ok_or(AlignError::MissingObjective { ordinal })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::results::{MetricKind, RunId, VariableRow};
    use std::collections::BTreeMap;

    fn row(ordinal: usize, year: i32, value: f64) -> VariableRow {
        VariableRow {
            run: RunId {
                label: format!("model_run_{ordinal}"),
                ordinal,
            },
            year,
            value,
            absolute_production: None,
        }
    }

    #[test]
    fn test_zero_fill_for_absent_runs() {
        // 5 declared runs, data only for runs 0, 2, 4 at 2020
        let results = VariableResults::from_rows(
            vec![row(0, 2020, 3.0), row(2, 2020, 5.0), row(4, 2020, 7.0)],
            MetricKind::Absolute,
        );

        let aligned = align_year(&results, 5, 2020).unwrap();
        assert_eq!(aligned, vec![3.0, 0.0, 5.0, 0.0, 7.0]);
    }

    #[test]
    fn test_absent_year_yields_zero_vector() {
        let results =
            VariableResults::from_rows(vec![row(0, 2020, 3.0)], MetricKind::Absolute);

        let aligned = align_year(&results, 3, 2055).unwrap();
        assert_eq!(aligned, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_out_of_range_ordinal_is_an_error() {
        let results =
            VariableResults::from_rows(vec![row(9, 2020, 3.0)], MetricKind::Absolute);

        let err = align_year(&results, 5, 2020).unwrap_err();
        assert!(matches!(
            err,
            AlignError::RunOutOfRange {
                ordinal: 9,
                run_count: 5
            }
        ));
    }

    #[test]
    fn test_align_total_sums_across_years() {
        let results = VariableResults::from_rows(
            vec![row(1, 2020, 3.0), row(1, 2021, 4.0), row(0, 2020, 1.0)],
            MetricKind::Absolute,
        );

        let aligned = align_total(&results, 2).unwrap();
        assert_eq!(aligned, vec![1.0, 7.0]);
    }

    #[test]
    fn test_objectives_in_ordinal_order() {
        let objectives = ObjectiveResults::from_values(BTreeMap::from([
            (1, 20.0),
            (0, 10.0),
            (2, 30.0),
        ]));

        let aligned = align_objectives(&objectives, 3).unwrap();
        assert_eq!(aligned, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_missing_objective_is_an_error() {
        let objectives =
            ObjectiveResults::from_values(BTreeMap::from([(0, 10.0), (2, 30.0)]));

        let err = align_objectives(&objectives, 3).unwrap_err();
        assert!(matches!(err, AlignError::MissingObjective { ordinal: 1 }));
    }
}
