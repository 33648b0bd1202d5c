//! Outer join of ticker, benchmark and treasury series on calendar date.
//!
//! Dates missing from a series take that series' neutral (all-zero) record.
//! No forward-fill: the filtering stage drops those rows before fitting.

use std::collections::{BTreeMap, BTreeSet};

use analysis_core::{AlignedRow, AnalysisError, PricePoint, RatePoint, SeriesRecord, TreasuryRecord};
use chrono::NaiveDate;

use crate::annualize::{annualize_compound, treasury_rates};
use crate::returns::{sorted_by_date, validate_prices};

/// Per-date return records for a price series.
///
/// Indexed prices are relative to the earliest close in `prices`, before any
/// filtering happens downstream.
pub fn series_records(
    label: &str,
    prices: &[PricePoint],
) -> Result<BTreeMap<NaiveDate, SeriesRecord>, AnalysisError> {
    if prices.is_empty() {
        return Err(AnalysisError::InsufficientData(format!("{} price series is empty", label)));
    }
    validate_prices(label, prices)?;

    let sorted = sorted_by_date(prices);
    let first_price = sorted[0].close;

    Ok(sorted
        .windows(2)
        .map(|w| {
            let daily_return = (w[1].close - w[0].close) / w[0].close;
            let record = SeriesRecord {
                daily_return,
                annualized_daily_return: annualize_compound(daily_return),
                price: w[1].close,
                indexed_price: w[1].close / first_price * 100.0,
            };
            (w[1].date, record)
        })
        .collect())
}

/// Per-date risk-free records for a normalized treasury series.
pub fn treasury_records(
    rates: &[RatePoint],
) -> Result<BTreeMap<NaiveDate, TreasuryRecord>, AnalysisError> {
    if rates.is_empty() {
        return Err(AnalysisError::InsufficientData("treasury rate series is empty".to_string()));
    }
    if let Some(bad) = rates.iter().find(|r| !r.value.is_finite()) {
        return Err(AnalysisError::NonFiniteValue(format!(
            "treasury rate on {} is {}",
            bad.date, bad.value
        )));
    }

    let mut sorted = rates.to_vec();
    sorted.sort_by_key(|r| r.date);

    Ok(sorted
        .into_iter()
        .map(|r| {
            let (rate, daily_return) = treasury_rates(r.value);
            (r.date, TreasuryRecord { rate, daily_return })
        })
        .collect())
}

/// Join the three record maps over the sorted union of their dates.
pub fn align(
    ticker: &BTreeMap<NaiveDate, SeriesRecord>,
    benchmark: &BTreeMap<NaiveDate, SeriesRecord>,
    treasury: &BTreeMap<NaiveDate, TreasuryRecord>,
) -> Vec<AlignedRow> {
    let dates: BTreeSet<NaiveDate> = ticker
        .keys()
        .chain(benchmark.keys())
        .chain(treasury.keys())
        .copied()
        .collect();

    dates
        .into_iter()
        .map(|date| {
            AlignedRow::from_records(
                date,
                ticker.get(&date).copied().unwrap_or_default(),
                benchmark.get(&date).copied().unwrap_or_default(),
                treasury.get(&date).copied().unwrap_or_default(),
            )
        })
        .collect()
}
