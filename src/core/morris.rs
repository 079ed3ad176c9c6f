//! Elementary effects (Morris method) estimator
//!
//! The one numerical routine in the pipeline, kept behind a fixed contract:
//! parameter metadata plus a trajectory design matrix and an observation
//! vector in, one (mu, mu_star, sigma) triple per parameter group out.
//! Nothing else in the crate depends on how the effects are computed.
//!
//! The design matrix is expected to come from a one-at-a-time trajectory
//! sampler: rows arrive in trajectories of `groups + 1` points where each
//! consecutive pair differs in exactly one group of columns. The elementary
//! effect of a step is the observation delta over the input delta; mu_star
//! averages absolute effects across trajectories and sigma is their sample
//! standard deviation.

use nalgebra::DMatrix;
use thiserror::Error;

use crate::core::catalog::ParameterCatalog;

/// Input deltas below this are treated as "column did not move"
const STEP_TOL: f64 = 1e-12;

#[derive(Debug, Error)]
pub enum MorrisError {
    #[error("design matrix has {columns} columns for {parameters} parameters")]
    DimensionMismatch { columns: usize, parameters: usize },

    #[error("observation vector has {observations} values for {rows} design rows")]
    ObservationMismatch { observations: usize, rows: usize },

    #[error("{rows} design rows do not divide into trajectories of {expected} points ({groups} groups + 1)")]
    NotTrajectories {
        rows: usize,
        groups: usize,
        expected: usize,
    },

    #[error("trajectory {trajectory} step {step} changes no parameter")]
    StalledStep { trajectory: usize, step: usize },

    #[error("trajectory {trajectory} step {step} changes parameters from more than one group")]
    AmbiguousStep { trajectory: usize, step: usize },
}

/// Parameter metadata for the estimator
#[derive(Debug, Clone)]
pub struct Problem {
    /// Parameter names, in design-matrix column order
    pub names: Vec<String>,
    /// Group label per parameter (same order as `names`)
    pub groups: Vec<String>,
    /// Physical bounds per parameter, used only to normalize scaled samples
    pub bounds: Vec<(f64, f64)>,
}

impl Problem {
    /// Distinct group labels in first-appearance order
    pub fn group_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for group in &self.groups {
            if !labels.iter().any(|g| g == group) {
                labels.push(group.clone());
            }
        }
        labels
    }
}

impl From<&ParameterCatalog> for Problem {
    fn from(catalog: &ParameterCatalog) -> Self {
        Self {
            names: catalog.iter().map(|p| p.name.clone()).collect(),
            groups: catalog.iter().map(|p| p.group.clone()).collect(),
            bounds: catalog
                .iter()
                .map(|p| (p.min_value_base_year, p.max_value_base_year))
                .collect(),
        }
    }
}

/// Per-group elementary-effects statistics
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub name: String,
    /// Mean effect (sign-preserving)
    pub mu: f64,
    /// Mean absolute effect
    pub mu_star: f64,
    /// Sample standard deviation of the effects
    pub sigma: f64,
}

/// Estimate elementary effects for every parameter group
///
/// `scaled` declares that `x` carries physical values; its columns are then
/// normalized into [0,1] with the problem bounds before effects are taken.
/// A constant observation vector is fine and yields all-zero statistics.
pub fn analyze(
    problem: &Problem,
    x: &DMatrix<f64>,
    y: &[f64],
    scaled: bool,
) -> Result<Vec<GroupStats>, MorrisError> {
    if x.ncols() != problem.names.len() {
        return Err(MorrisError::DimensionMismatch {
            columns: x.ncols(),
            parameters: problem.names.len(),
        });
    }
    if y.len() != x.nrows() {
        return Err(MorrisError::ObservationMismatch {
            observations: y.len(),
            rows: x.nrows(),
        });
    }

    let labels = problem.group_labels();
    let group_index: Vec<usize> = problem
        .groups
        .iter()
        .map(|g| labels.iter().position(|l| l == g).unwrap_or(0))
        .collect();

    let points = labels.len() + 1;
    if x.nrows() == 0 || x.nrows() % points != 0 {
        return Err(MorrisError::NotTrajectories {
            rows: x.nrows(),
            groups: labels.len(),
            expected: points,
        });
    }

    let x = if scaled { normalize(x, &problem.bounds) } else { x.clone() };

    let mut effects: Vec<Vec<f64>> = vec![Vec::new(); labels.len()];
    let trajectories = x.nrows() / points;
    for trajectory in 0..trajectories {
        let base = trajectory * points;
        for step in 0..points - 1 {
            let from = base + step;
            let to = from + 1;

            // Which group moved, and by how much
            let mut group: Option<usize> = None;
            let mut delta = 0.0_f64;
            for col in 0..x.ncols() {
                let dx = x[(to, col)] - x[(from, col)];
                if dx.abs() <= STEP_TOL {
                    continue;
                }
                match group {
                    None => group = Some(group_index[col]),
                    Some(g) if g != group_index[col] => {
                        return Err(MorrisError::AmbiguousStep { trajectory, step });
                    }
                    Some(_) => {}
                }
                if dx.abs() > delta.abs() {
                    delta = dx;
                }
            }
            let group = group.ok_or(MorrisError::StalledStep { trajectory, step })?;
            effects[group].push((y[to] - y[from]) / delta);
        }
    }

    Ok(labels
        .into_iter()
        .zip(effects)
        .map(|(name, group_effects)| summarize(name, &group_effects))
        .collect())
}

fn summarize(name: String, effects: &[f64]) -> GroupStats {
    if effects.is_empty() {
        return GroupStats {
            name,
            mu: 0.0,
            mu_star: 0.0,
            sigma: 0.0,
        };
    }
    let n = effects.len() as f64;
    let mu = effects.iter().sum::<f64>() / n;
    let mu_star = effects.iter().map(|e| e.abs()).sum::<f64>() / n;
    let sigma = if effects.len() > 1 {
        (effects.iter().map(|e| (e - mu).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    } else {
        0.0
    };
    GroupStats {
        name,
        mu,
        mu_star,
        sigma,
    }
}

/// Map physical columns back into [0,1]; degenerate bounds pin the column at 0
fn normalize(x: &DMatrix<f64>, bounds: &[(f64, f64)]) -> DMatrix<f64> {
    let mut normalized = x.clone();
    for col in 0..x.ncols() {
        let (min, max) = bounds.get(col).copied().unwrap_or((0.0, 1.0));
        let span = max - min;
        for row in 0..x.nrows() {
            normalized[(row, col)] = if span.abs() <= STEP_TOL {
                0.0
            } else {
                (x[(row, col)] - min) / span
            };
        }
    }
    normalized
}
