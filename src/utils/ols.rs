//! Ordinary least squares for regression-based forecasters.
//!
//! Regressors are passed by name so that the design used at fit time can be
//! rebuilt for the forecast horizon from a fresh covariate window.

use crate::error::{BacktestError, Result};
use std::collections::HashMap;

/// Fitted linear regression `y = intercept + sum(coef_i * x_i)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    /// One coefficient per regressor, in `regressor_names` order.
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Regressor names, sorted.
    pub regressor_names: Vec<String>,
}

impl LinearFit {
    /// Evaluate the regression on new regressor values.
    pub fn predict(&self, regressors: &HashMap<String, Vec<f64>>, n: usize) -> Result<Vec<f64>> {
        let mut predictions = vec![self.intercept; n];
        for (name, coef) in self.regressor_names.iter().zip(&self.coefficients) {
            let values = regressors
                .get(name)
                .ok_or_else(|| BacktestError::UnknownCovariate(name.clone()))?;
            if values.len() != n {
                return Err(BacktestError::DimensionMismatch {
                    expected: n,
                    got: values.len(),
                });
            }
            for (pred, x) in predictions.iter_mut().zip(values) {
                *pred += coef * x;
            }
        }
        Ok(predictions)
    }

    /// Contribution of the regressors alone (no intercept).
    pub fn regression_effect(
        &self,
        regressors: &HashMap<String, Vec<f64>>,
        n: usize,
    ) -> Result<Vec<f64>> {
        Ok(self
            .predict(regressors, n)?
            .into_iter()
            .map(|p| p - self.intercept)
            .collect())
    }

    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.regressor_names
            .iter()
            .position(|n| n == name)
            .map(|i| self.coefficients[i])
    }
}

/// Fit `y = intercept + X @ coefficients` by solving the normal equations.
pub fn fit_linear(y: &[f64], regressors: &HashMap<String, Vec<f64>>) -> Result<LinearFit> {
    let n = y.len();
    if n == 0 {
        return Err(BacktestError::InsufficientData { needed: 1, got: 0 });
    }

    let mut regressor_names: Vec<String> = regressors.keys().cloned().collect();
    regressor_names.sort();
    let k = regressor_names.len();

    if n < k + 1 {
        return Err(BacktestError::InsufficientData {
            needed: k + 1,
            got: n,
        });
    }

    let x_cols: Vec<&[f64]> = regressor_names
        .iter()
        .map(|name| regressors[name].as_slice())
        .collect();
    for col in &x_cols {
        if col.len() != n {
            return Err(BacktestError::DimensionMismatch {
                expected: n,
                got: col.len(),
            });
        }
    }

    // Design row is [1, x1, x2, ...]
    let p = k + 1;
    let mut xtx = vec![vec![0.0; p]; p];
    let mut xty = vec![0.0; p];
    let mut row = vec![0.0; p];

    for obs in 0..n {
        row[0] = 1.0;
        for (j, col) in x_cols.iter().enumerate() {
            row[j + 1] = col[obs];
        }
        for i in 0..p {
            xty[i] += row[i] * y[obs];
            for j in 0..p {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }

    // Small ridge keeps near-collinear designs solvable.
    for (i, r) in xtx.iter_mut().enumerate() {
        r[i] += 1e-8;
    }

    let beta = solve_symmetric(&xtx, &xty).ok_or_else(|| {
        BacktestError::ComputationError(
            "regression failed: design matrix not positive definite".to_string(),
        )
    })?;

    Ok(LinearFit {
        intercept: beta[0],
        coefficients: beta[1..].to_vec(),
        regressor_names,
    })
}

/// Solve a symmetric positive definite system via Cholesky decomposition.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // L' x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}
