//! Heatmap data shaping - parameter rows x year columns
//!
//! Only the data step lives here: transpose the year-major sensitivity
//! columns into a labeled parameter x year matrix with years ascending.
//! Color scales and image export belong to external plotting tools.

use std::path::Path;

use nalgebra::DMatrix;
use thiserror::Error;

use crate::core::sensitivity::YearlySensitivity;

#[derive(Debug, Error)]
pub enum HeatmapError {
    #[error("failed to write heatmap file {path}: {source}")]
    Write {
        path: String,
        source: csv::Error,
    },
}

/// Labeled statistic matrix: one row per parameter group, one column per year
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatrix {
    pub row_labels: Vec<String>,
    pub years: Vec<i32>,
    pub values: DMatrix<f64>,
}

/// Transpose year-major sensitivity columns into the labeled matrix
pub fn shape(yearly: &YearlySensitivity) -> LabeledMatrix {
    let mut order: Vec<usize> = (0..yearly.years.len()).collect();
    order.sort_by_key(|&i| yearly.years[i]);

    let rows = yearly.labels.len();
    let cols = order.len();
    let mut values = DMatrix::zeros(rows, cols);
    for (col, &i) in order.iter().enumerate() {
        for row in 0..rows {
            values[(row, col)] = yearly.columns[i][row];
        }
    }

    LabeledMatrix {
        row_labels: yearly.labels.clone(),
        years: order.iter().map(|&i| yearly.years[i]).collect(),
        values,
    }
}

/// Write the labeled matrix as CSV: header "parameter,<year>,..." then one
/// row per group label
pub fn write_csv(matrix: &LabeledMatrix, path: impl AsRef<Path>) -> Result<(), HeatmapError> {
    let path = path.as_ref();
    let write_err = |source: csv::Error| HeatmapError::Write {
        path: path.display().to_string(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(write_err)?;

    let mut header = vec!["parameter".to_string()];
    header.extend(matrix.years.iter().map(|y| y.to_string()));
    writer.write_record(&header).map_err(write_err)?;

    for (row, label) in matrix.row_labels.iter().enumerate() {
        let mut record = vec![label.clone()];
        record.extend((0..matrix.years.len()).map(|col| matrix.values[(row, col)].to_string()));
        writer.write_record(&record).map_err(write_err)?;
    }

    writer.flush().map_err(|source| HeatmapError::Write {
        path: path.display().to_string(),
        source: source.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sensitivity::YearlySensitivity;

    fn yearly() -> YearlySensitivity {
        YearlySensitivity {
            labels: vec!["capex".to_string(), "opex".to_string()],
            // Deliberately out of order; shape must sort ascending
            years: vec![2030, 2015],
            columns: vec![vec![0.3, 0.4], vec![0.1, 0.2]],
            failures: Vec::new(),
        }
    }

    #[test]
    fn test_shape_sorts_years_and_transposes() {
        let matrix = shape(&yearly());
        assert_eq!(matrix.years, vec![2015, 2030]);
        assert_eq!(matrix.row_labels, vec!["capex", "opex"]);
        // capex: 0.1 in 2015, 0.3 in 2030
        assert_eq!(matrix.values[(0, 0)], 0.1);
        assert_eq!(matrix.values[(0, 1)], 0.3);
        assert_eq!(matrix.values[(1, 0)], 0.2);
        assert_eq!(matrix.values[(1, 1)], 0.4);
    }

    #[test]
    fn test_write_csv_layout() {
        let matrix = shape(&yearly());
        let file = tempfile::NamedTempFile::new().unwrap();
        write_csv(&matrix, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), "parameter,2015,2030");
        assert_eq!(lines.next().unwrap(), "capex,0.1,0.3");
        assert_eq!(lines.next().unwrap(), "opex,0.2,0.4");
    }
}
