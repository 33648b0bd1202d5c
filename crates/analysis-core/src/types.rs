use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{dates, AnalysisError};

/// Daily closing price for a security
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(alias = "priceDate")]
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Treasury observation date as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    /// Milliseconds since the Unix epoch
    Millis(i64),
    Text(String),
}

/// Treasury quote as delivered by the provider (some feeds quote numbers as strings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

/// Treasury record before date normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRatePoint {
    pub date: RawDate,
    pub value: RawValue,
}

impl RawRatePoint {
    /// Normalize the date to a calendar day and the value to a number.
    pub fn normalize(&self) -> Result<RatePoint, AnalysisError> {
        let date = match &self.date {
            RawDate::Millis(ms) => dates::date_from_millis(*ms)?,
            RawDate::Text(s) => dates::parse_date_str(s)?,
        };
        let value = match &self.value {
            RawValue::Number(v) => *v,
            RawValue::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                AnalysisError::NonFiniteValue(format!(
                    "treasury value '{}' on {} is not numeric",
                    s,
                    dates::canonical(date)
                ))
            })?,
        };
        Ok(RatePoint { date, value })
    }
}

/// Treasury yield, quoted in percent (4.25 means 4.25%)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl RatePoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Simple return between a close and the previous one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyReturn {
    pub date: NaiveDate,
    #[serde(rename = "return")]
    pub daily_return: f64,
    pub price: f64,
}

/// Per-date values derived from a ticker or benchmark price series.
///
/// `Default` is the neutral record used for dates the series does not cover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    pub daily_return: f64,
    pub annualized_daily_return: f64,
    pub price: f64,
    pub indexed_price: f64,
}

/// Per-date values derived from a treasury rate series.
///
/// `Default` is the neutral record used for dates without a treasury quote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TreasuryRecord {
    /// Annual rate as a fraction (0.0425 for 4.25%)
    pub rate: f64,
    /// Daily compounding equivalent of `rate`
    pub daily_return: f64,
}

/// One row of the outer-joined ticker/benchmark/treasury table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub risk_free_rate_annualized: f64,
    pub risk_free_rate_daily: f64,
    pub ticker_price: f64,
    pub benchmark_price: f64,
    pub ticker_indexed_price: f64,
    pub benchmark_indexed_price: f64,
    pub ticker_return_daily: f64,
    pub benchmark_return_daily: f64,
    pub ticker_return_excess_daily: f64,
    pub benchmark_return_excess_daily: f64,
}

impl AlignedRow {
    pub fn from_records(
        date: NaiveDate,
        ticker: SeriesRecord,
        benchmark: SeriesRecord,
        treasury: TreasuryRecord,
    ) -> Self {
        Self {
            date,
            risk_free_rate_annualized: treasury.rate,
            risk_free_rate_daily: treasury.daily_return,
            ticker_price: ticker.price,
            benchmark_price: benchmark.price,
            ticker_indexed_price: ticker.indexed_price,
            benchmark_indexed_price: benchmark.indexed_price,
            ticker_return_daily: ticker.daily_return,
            benchmark_return_daily: benchmark.daily_return,
            ticker_return_excess_daily: ticker.daily_return - treasury.daily_return,
            benchmark_return_excess_daily: benchmark.daily_return - treasury.daily_return,
        }
    }
}

/// Aligned row augmented with its beta-adjusted excess return
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaRow {
    #[serde(flatten)]
    pub row: AlignedRow,
    pub alpha_daily: f64,
}

/// Regression-based alpha/beta performance report.
///
/// Significance statistics (`*_se`, `*_t`, `*_pvalue`) are `None` when they are
/// undefined: two observations leave no residual degrees of freedom, and an
/// exact fit has zero residual variance. `r_squared` is `None` when the ticker
/// excess series is constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionReport {
    pub alpha_regression_daily: f64,
    pub alpha_regression_annualized: f64,
    pub alpha_geom_daily: f64,
    pub alpha_geom_annualized: f64,
    pub beta: f64,
    pub r_squared: Option<f64>,
    pub alpha_se: Option<f64>,
    pub beta_se: Option<f64>,
    pub alpha_t: Option<f64>,
    pub beta_t: Option<f64>,
    pub alpha_pvalue: Option<f64>,
    pub beta_pvalue: Option<f64>,
    pub ticker_annualized_return: f64,
    pub benchmark_annualized_return: f64,
    pub ticker_annualized_volatility: f64,
    pub benchmark_annualized_volatility: f64,
    pub ticker_sharpe_ratio: f64,
    pub benchmark_sharpe_ratio: f64,
    pub data: Vec<AlphaRow>,
}
