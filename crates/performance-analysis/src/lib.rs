//! Risk/return analytics for a security against a benchmark and a risk-free rate.
//!
//! The engine is pure and synchronous: callers hand it already-fetched daily
//! series and get back freshly allocated results. Two entry points:
//! - [`compute_returns`]: simple daily returns, most recent first;
//! - [`compute_alpha_beta`]: aligned, filtered, regression-based performance report.

pub mod align;
pub mod annualize;
pub mod filter;
pub mod regression;
pub mod report;
pub mod returns;

use analysis_core::{AnalysisError, DailyReturn, PricePoint, RatePoint, RegressionReport};

pub use annualize::{
    annualize_compound, annualized_return, annualized_volatility, deannualize, sharpe_ratio,
};
pub use report::compute_alpha_beta;
pub use returns::compute_returns;

/// Stateless handle over the analytics entry points, for callers that hold
/// engines as fields.
#[derive(Debug, Clone, Copy)]
pub struct PerformanceAnalysisEngine;

impl PerformanceAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn daily_returns(&self, prices: &[PricePoint]) -> Result<Vec<DailyReturn>, AnalysisError> {
        compute_returns(prices)
    }

    pub fn alpha_beta(
        &self,
        ticker_prices: &[PricePoint],
        benchmark_prices: &[PricePoint],
        treasury_rates: &[RatePoint],
    ) -> Result<RegressionReport, AnalysisError> {
        compute_alpha_beta(ticker_prices, benchmark_prices, treasury_rates)
    }
}

impl Default for PerformanceAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}
