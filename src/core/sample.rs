//! Design matrix - the normalized Morris sample, one row per model run
//!
//! The sample file is a plain delimited numeric matrix with no header, as
//! produced by the external one-at-a-time sampler. Columns follow catalog
//! order; that pairing is positional and must not be disturbed.

use std::fs;
use std::path::Path;

use nalgebra::DMatrix;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("failed to read sample file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("sample line {line}: value '{value}' is not numeric")]
    InvalidValue { line: usize, value: String },

    #[error("sample line {line} has {found} columns, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("sample file contains no rows")]
    Empty,
}

/// Rectangular design matrix: rows = model runs, columns = catalog parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    matrix: DMatrix<f64>,
}

impl Sample {
    pub fn new(matrix: DMatrix<f64>) -> Self {
        Self { matrix }
    }

    /// Load a headerless comma-delimited matrix
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SampleError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SampleError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse delimited text into a rectangular matrix
    pub fn parse(contents: &str) -> Result<Self, SampleError> {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        let mut width: Option<usize> = None;

        for (idx, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let values = line
                .split(',')
                .map(|cell| {
                    cell.trim()
                        .parse::<f64>()
                        .map_err(|_| SampleError::InvalidValue {
                            line: idx + 1,
                            value: cell.trim().to_string(),
                        })
                })
                .collect::<Result<Vec<f64>, SampleError>>()?;

            match width {
                None => width = Some(values.len()),
                Some(expected) if expected != values.len() => {
                    return Err(SampleError::RaggedRow {
                        line: idx + 1,
                        expected,
                        found: values.len(),
                    });
                }
                Some(_) => {}
            }
            rows.push(values);
        }

        let ncols = width.ok_or(SampleError::Empty)?;
        let nrows = rows.len();
        let matrix = DMatrix::from_row_iterator(nrows, ncols, rows.into_iter().flatten());
        Ok(Self { matrix })
    }

    /// Number of model runs (matrix rows)
    pub fn run_count(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of parameters (matrix columns)
    pub fn parameter_count(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Normalized cell for one (run, parameter) pair
    pub fn cell(&self, run: usize, parameter: usize) -> f64 {
        self.matrix[(run, parameter)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rectangular() {
        let sample = Sample::parse("0.0,0.5,1.0\n1.0,0.25,0.0\n").unwrap();
        assert_eq!(sample.run_count(), 2);
        assert_eq!(sample.parameter_count(), 3);
        assert_eq!(sample.cell(0, 1), 0.5);
        assert_eq!(sample.cell(1, 0), 1.0);
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let sample = Sample::parse("0.0,1.0\n\n0.5,0.5\n").unwrap();
        assert_eq!(sample.run_count(), 2);
    }

    #[test]
    fn test_ragged_row_rejected() {
        let err = Sample::parse("0.0,1.0\n0.5\n").unwrap_err();
        assert!(matches!(
            err,
            SampleError::RaggedRow {
                line: 2,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_non_numeric_cell_rejected() {
        let err = Sample::parse("0.0,abc\n").unwrap_err();
        assert!(matches!(err, SampleError::InvalidValue { line: 1, .. }));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(Sample::parse("\n\n"), Err(SampleError::Empty)));
    }
}
