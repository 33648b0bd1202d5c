//! Ordinary least squares of excess ticker return on excess benchmark return.
//!
//! Model: `R_ticker - R_f = alpha + beta * (R_benchmark - R_f) + epsilon`
//!
//! Two alphas come out of the fit and are kept apart:
//! - the regression intercept (average per-period outperformance), and
//! - the geometric alpha, the compounded mean of the per-row residuals
//!   `excess_ticker - beta * excess_benchmark` (realized outperformance).

use analysis_core::{AlignedRow, AnalysisError};
use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::annualize::annualize_compound;

/// Relative threshold below which the regressor is considered constant.
const SINGULARITY_TOLERANCE: f64 = 1e-12;

/// A fitted coefficient with its significance statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficient {
    pub estimate: f64,
    pub std_error: Option<f64>,
    pub t_stat: Option<f64>,
    /// Two-sided p-value against a Student t with `n - 2` degrees of freedom
    pub p_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    pub intercept: Coefficient,
    pub slope: Coefficient,
    /// `None` when the response is constant, since R² is then 0/0
    pub r_squared: Option<f64>,
    pub observations: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeometricAlpha {
    /// `excess_ticker - beta * excess_benchmark` for each row, in row order
    pub per_row: Vec<f64>,
    pub daily: f64,
    pub annualized: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlphaBetaFit {
    pub ols: OlsFit,
    pub alpha_regression_annualized: f64,
    pub geometric: GeometricAlpha,
}

impl AlphaBetaFit {
    pub fn beta(&self) -> f64 {
        self.ols.slope.estimate
    }

    pub fn alpha_regression_daily(&self) -> f64 {
        self.ols.intercept.estimate
    }
}

fn ensure_finite(label: &str, values: &[f64]) -> Result<(), AnalysisError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(AnalysisError::NonFiniteValue(format!(
            "regression input {} has {} at observation {}",
            label, values[i], i
        ))),
        None => Ok(()),
    }
}

/// Fit `y = a + b * x` with an intercept.
pub fn fit_ols(x: &[f64], y: &[f64]) -> Result<OlsFit, AnalysisError> {
    if x.len() != y.len() {
        return Err(AnalysisError::InsufficientData(format!(
            "regression needs paired observations, got {} x and {} y",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 2 {
        return Err(AnalysisError::InsufficientData(format!(
            "regression needs at least 2 observations, got {}",
            n
        )));
    }
    ensure_finite("benchmark excess return", x)?;
    ensure_finite("ticker excess return", y)?;

    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let ss_xx: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();
    let sum_sq_x: f64 = x.iter().map(|xi| xi * xi).sum();
    if ss_xx <= SINGULARITY_TOLERANCE * sum_sq_x {
        return Err(AnalysisError::SingularRegression(format!(
            "benchmark excess return is constant across {} observations",
            n
        )));
    }

    let design = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { x[i] });
    let response = DVector::from_column_slice(y);
    let design_t = design.transpose();
    let xtx_inv = (&design_t * &design).try_inverse().ok_or_else(|| {
        AnalysisError::SingularRegression("normal equations are not invertible".to_string())
    })?;
    let coefficients = &xtx_inv * (&design_t * &response);

    let residuals = &response - &design * &coefficients;
    let ss_res = residuals.norm_squared();
    let mean_y = y.iter().sum::<f64>() / nf;
    let ss_tot: f64 = y.iter().map(|yi| (yi - mean_y).powi(2)).sum();
    let r_squared = (ss_tot > 0.0).then(|| 1.0 - ss_res / ss_tot);

    let dof = n - 2;
    let t_dist = if dof > 0 && ss_res > 0.0 {
        Some(StudentsT::new(0.0, 1.0, dof as f64).map_err(|e| {
            AnalysisError::NonFiniteValue(format!("t distribution with {} dof: {}", dof, e))
        })?)
    } else {
        None
    };
    let sigma2 = if dof > 0 { ss_res / dof as f64 } else { f64::NAN };

    let coefficient = |idx: usize| -> Coefficient {
        let estimate = coefficients[idx];
        match &t_dist {
            Some(dist) => {
                let se = (sigma2 * xtx_inv[(idx, idx)]).sqrt();
                let t = estimate / se;
                let p = 2.0 * dist.sf(t.abs());
                Coefficient {
                    estimate,
                    std_error: Some(se),
                    t_stat: Some(t),
                    p_value: Some(p.clamp(0.0, 1.0)),
                }
            }
            None => Coefficient {
                estimate,
                std_error: None,
                t_stat: None,
                p_value: None,
            },
        }
    };

    Ok(OlsFit {
        intercept: coefficient(0),
        slope: coefficient(1),
        r_squared,
        observations: n,
    })
}

/// Compounded mean of the beta-adjusted excess returns.
pub fn geometric_alpha(rows: &[AlignedRow], beta: f64) -> Result<GeometricAlpha, AnalysisError> {
    if rows.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "geometric alpha needs at least one row".to_string(),
        ));
    }

    let per_row: Vec<f64> = rows
        .iter()
        .map(|r| r.ticker_return_excess_daily - beta * r.benchmark_return_excess_daily)
        .collect();
    let product: f64 = per_row.iter().map(|a| 1.0 + a).product();

    if !(product > 0.0) || !product.is_finite() {
        return Err(AnalysisError::NonFiniteValue(format!(
            "compounded beta-adjusted excess return is {} over {} rows",
            product,
            rows.len()
        )));
    }

    let daily = product.powf(1.0 / rows.len() as f64) - 1.0;
    Ok(GeometricAlpha {
        per_row,
        daily,
        annualized: annualize_compound(daily),
    })
}

/// Regression and geometric alpha/beta over already-filtered rows.
pub fn fit_alpha_beta(rows: &[AlignedRow]) -> Result<AlphaBetaFit, AnalysisError> {
    let x: Vec<f64> = rows.iter().map(|r| r.benchmark_return_excess_daily).collect();
    let y: Vec<f64> = rows.iter().map(|r| r.ticker_return_excess_daily).collect();

    let ols = fit_ols(&x, &y)?;
    let geometric = geometric_alpha(rows, ols.slope.estimate)?;

    Ok(AlphaBetaFit {
        alpha_regression_annualized: annualize_compound(ols.intercept.estimate),
        ols,
        geometric,
    })
}
