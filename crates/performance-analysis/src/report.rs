use analysis_core::{AlignedRow, AlphaRow, AnalysisError, PricePoint, RatePoint, RegressionReport};
use statrs::statistics::Statistics;

use crate::align::{align, series_records, treasury_records};
use crate::annualize::{annualized_return, annualized_volatility, sharpe_ratio, year_fraction};
use crate::filter::filter_for_fit;
use crate::regression::fit_alpha_beta;

/// Annualized return, volatility and Sharpe ratio of one side of the report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskReturn {
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub sharpe_ratio: f64,
}

/// Risk/return statistics over the filtered rows, using `price` and
/// `daily_return` to pick the ticker or benchmark columns.
fn risk_return(
    label: &str,
    rows: &[AlignedRow],
    mean_risk_free: f64,
    price: impl Fn(&AlignedRow) -> f64,
    daily_return: impl Fn(&AlignedRow) -> f64,
) -> Result<RiskReturn, AnalysisError> {
    let (first, last) = match (rows.first(), rows.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => {
            return Err(AnalysisError::InsufficientData(format!(
                "{} risk/return needs filtered rows",
                label
            )))
        }
    };

    let years = year_fraction(first.date, last.date);
    let annualized = annualized_return(price(first), price(last), years).map_err(|e| match e {
        AnalysisError::DegenerateTimeSpan(msg) => {
            AnalysisError::DegenerateTimeSpan(format!(
                "{} {} to {}: {}",
                label, first.date, last.date, msg
            ))
        }
        other => other,
    })?;

    let returns: Vec<f64> = rows.iter().map(daily_return).collect();
    let volatility = annualized_volatility(&returns)?;
    let sharpe = sharpe_ratio(annualized, mean_risk_free, volatility).map_err(|e| match e {
        AnalysisError::ZeroVolatility(msg) => {
            AnalysisError::ZeroVolatility(format!("{}: {}", label, msg))
        }
        other => other,
    })?;

    Ok(RiskReturn {
        annualized_return: annualized,
        annualized_volatility: volatility,
        sharpe_ratio: sharpe,
    })
}

/// Align, filter, fit and summarize a ticker against a benchmark and a
/// treasury risk-free series.
pub fn compute_alpha_beta(
    ticker_prices: &[PricePoint],
    benchmark_prices: &[PricePoint],
    treasury_rates: &[RatePoint],
) -> Result<RegressionReport, AnalysisError> {
    let ticker = series_records("ticker", ticker_prices)?;
    let benchmark = series_records("benchmark", benchmark_prices)?;
    let treasury = treasury_records(treasury_rates)?;

    let aligned = align(&ticker, &benchmark, &treasury);
    tracing::debug!(
        "Aligned {} ticker, {} benchmark and {} treasury dates into {} rows",
        ticker.len(),
        benchmark.len(),
        treasury.len(),
        aligned.len()
    );

    let rows = filter_for_fit(&aligned)?;
    let fit = fit_alpha_beta(&rows)?;

    let mean_risk_free = rows.iter().map(|r| r.risk_free_rate_annualized).mean();
    let ticker_stats = risk_return(
        "ticker",
        &rows,
        mean_risk_free,
        |r| r.ticker_price,
        |r| r.ticker_return_daily,
    )?;
    let benchmark_stats = risk_return(
        "benchmark",
        &rows,
        mean_risk_free,
        |r| r.benchmark_price,
        |r| r.benchmark_return_daily,
    )?;

    tracing::debug!(
        "Fit over {} rows: beta={:.4} alpha_daily={:.6} r2={:?}",
        fit.ols.observations,
        fit.beta(),
        fit.alpha_regression_daily(),
        fit.ols.r_squared
    );

    let data = rows
        .iter()
        .zip(fit.geometric.per_row.iter())
        .map(|(row, alpha)| AlphaRow {
            row: *row,
            alpha_daily: *alpha,
        })
        .collect();

    Ok(RegressionReport {
        alpha_regression_daily: fit.alpha_regression_daily(),
        alpha_regression_annualized: fit.alpha_regression_annualized,
        alpha_geom_daily: fit.geometric.daily,
        alpha_geom_annualized: fit.geometric.annualized,
        beta: fit.beta(),
        r_squared: fit.ols.r_squared,
        alpha_se: fit.ols.intercept.std_error,
        beta_se: fit.ols.slope.std_error,
        alpha_t: fit.ols.intercept.t_stat,
        beta_t: fit.ols.slope.t_stat,
        alpha_pvalue: fit.ols.intercept.p_value,
        beta_pvalue: fit.ols.slope.p_value,
        ticker_annualized_return: ticker_stats.annualized_return,
        benchmark_annualized_return: benchmark_stats.annualized_return,
        ticker_annualized_volatility: ticker_stats.annualized_volatility,
        benchmark_annualized_volatility: benchmark_stats.annualized_volatility,
        ticker_sharpe_ratio: ticker_stats.sharpe_ratio,
        benchmark_sharpe_ratio: benchmark_stats.sharpe_ratio,
        data,
    })
}
