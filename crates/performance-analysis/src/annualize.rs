//! Annualization and risk-adjusted return primitives.
//!
//! Daily statistics are scaled with a 252-trading-day year; calendar spans
//! (first to last observation) use a 365-day year.

use analysis_core::AnalysisError;
use chrono::NaiveDate;
use statrs::statistics::Statistics;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const CALENDAR_DAYS_PER_YEAR: f64 = 365.0;

/// Compound a daily rate over a trading year: `(1 + d)^252 - 1`
pub fn annualize_compound(daily_rate: f64) -> f64 {
    (1.0 + daily_rate).powf(TRADING_DAYS_PER_YEAR) - 1.0
}

/// Inverse of [`annualize_compound`]: `(1 + y)^(1/252) - 1`
pub fn deannualize(annual_rate: f64) -> f64 {
    (1.0 + annual_rate).powf(1.0 / TRADING_DAYS_PER_YEAR) - 1.0
}

/// Convert a treasury quote in percent to `(annual fraction, daily return)`.
pub fn treasury_rates(quoted_percent: f64) -> (f64, f64) {
    let rate = quoted_percent / 100.0;
    (rate, deannualize(rate))
}

/// Calendar years between two dates (may be zero or negative).
pub fn year_fraction(first: NaiveDate, last: NaiveDate) -> f64 {
    (last - first).num_days() as f64 / CALENDAR_DAYS_PER_YEAR
}

/// Geometric annualized return between two values `year_fraction` years apart.
pub fn annualized_return(
    first_value: f64,
    last_value: f64,
    year_fraction: f64,
) -> Result<f64, AnalysisError> {
    if !(year_fraction > 0.0) {
        return Err(AnalysisError::DegenerateTimeSpan(format!(
            "annualized return needs a positive span, got {:.6} years",
            year_fraction
        )));
    }
    if !(first_value > 0.0) || !last_value.is_finite() {
        return Err(AnalysisError::InvalidPriceData(format!(
            "annualized return endpoints must be positive, got {} -> {}",
            first_value, last_value
        )));
    }

    let annualized = (last_value / first_value).powf(1.0 / year_fraction) - 1.0;
    if !annualized.is_finite() {
        return Err(AnalysisError::NonFiniteValue(format!(
            "annualized return overflowed for {} -> {} over {:.6} years",
            first_value, last_value, year_fraction
        )));
    }
    Ok(annualized)
}

/// Sample standard deviation of daily returns scaled by `sqrt(252)`.
pub fn annualized_volatility(daily_returns: &[f64]) -> Result<f64, AnalysisError> {
    if daily_returns.len() < 2 {
        return Err(AnalysisError::InsufficientData(format!(
            "volatility needs at least 2 returns, got {}",
            daily_returns.len()
        )));
    }
    let std_dev = daily_returns.std_dev();
    if !std_dev.is_finite() {
        return Err(AnalysisError::NonFiniteValue(
            "volatility of a series containing NaN/Inf".to_string(),
        ));
    }
    Ok(std_dev * TRADING_DAYS_PER_YEAR.sqrt())
}

pub fn sharpe_ratio(
    annualized_return: f64,
    mean_annualized_risk_free_rate: f64,
    annualized_volatility: f64,
) -> Result<f64, AnalysisError> {
    if annualized_volatility == 0.0 {
        return Err(AnalysisError::ZeroVolatility(
            "Sharpe ratio is undefined for a series with zero volatility".to_string(),
        ));
    }
    Ok((annualized_return - mean_annualized_risk_free_rate) / annualized_volatility)
}
