use analysis_core::{AlignedRow, AnalysisError};

/// Daily moves beyond ±50% are treated as bad ticks or unadjusted corporate actions.
pub const MAX_ABS_DAILY_RETURN: f64 = 0.50;

/// Minimum rows for a regression fit and a first/last annualization pair.
pub const MIN_FILTERED_ROWS: usize = 2;

/// False for rows that exist only because one of the three series has the date.
pub fn passes_zero_guard(row: &AlignedRow) -> bool {
    row.ticker_price != 0.0 && row.benchmark_price != 0.0 && row.risk_free_rate_daily != 0.0
}

pub fn passes_outlier_guard(row: &AlignedRow) -> bool {
    row.ticker_return_daily.abs() <= MAX_ABS_DAILY_RETURN
        && row.benchmark_return_daily.abs() <= MAX_ABS_DAILY_RETURN
}

/// Apply the zero-guard then the outlier-guard, keeping row order.
pub fn filter_rows(rows: &[AlignedRow]) -> Vec<AlignedRow> {
    rows.iter()
        .filter(|r| passes_zero_guard(r))
        .filter(|r| passes_outlier_guard(r))
        .copied()
        .collect()
}

/// [`filter_rows`], failing when too few rows survive for fitting.
pub fn filter_for_fit(rows: &[AlignedRow]) -> Result<Vec<AlignedRow>, AnalysisError> {
    let filtered = filter_rows(rows);
    tracing::debug!(
        "Filtering kept {} of {} aligned rows",
        filtered.len(),
        rows.len()
    );

    if filtered.len() < MIN_FILTERED_ROWS {
        return Err(AnalysisError::EmptyAfterFiltering(format!(
            "{} of {} aligned rows survived the zero and outlier guards, need at least {}",
            filtered.len(),
            rows.len(),
            MIN_FILTERED_ROWS
        )));
    }
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(
        d: u32,
        ticker_price: f64,
        ticker_ret: f64,
        bench_ret: f64,
        rf_daily: f64,
    ) -> AlignedRow {
        AlignedRow {
            date: NaiveDate::from_ymd_opt(2024, 5, d).unwrap(),
            risk_free_rate_annualized: 0.04,
            risk_free_rate_daily: rf_daily,
            ticker_price,
            benchmark_price: 400.0,
            ticker_indexed_price: 100.0,
            benchmark_indexed_price: 100.0,
            ticker_return_daily: ticker_ret,
            benchmark_return_daily: bench_ret,
            ticker_return_excess_daily: ticker_ret - rf_daily,
            benchmark_return_excess_daily: bench_ret - rf_daily,
        }
    }

    fn sample() -> Vec<AlignedRow> {
        vec![
            row(1, 10.0, 0.01, 0.005, 0.0001),
            row(2, 0.0, 0.0, 0.004, 0.0001),   // ticker missing
            row(3, 10.5, 0.02, 0.01, 0.0),     // treasury missing
            row(4, 16.0, 0.55, 0.01, 0.0001),  // split artifact
            row(5, 16.2, 0.01, -0.51, 0.0001), // bad benchmark tick
            row(6, 16.4, -0.5, 0.5, 0.0001),   // exactly at the bound, kept
            row(7, 16.6, 0.012, 0.008, 0.0001),
        ]
    }

    #[test]
    fn test_guards_drop_degenerate_rows() {
        let kept: Vec<u32> = filter_rows(&sample())
            .iter()
            .map(|r| chrono::Datelike::day(&r.date))
            .collect();
        assert_eq!(kept, vec![1, 6, 7]);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let once = filter_rows(&sample());
        let twice = filter_rows(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_single_surviving_row_fails() {
        let rows = vec![row(1, 10.0, 0.01, 0.005, 0.0001), row(2, 0.0, 0.0, 0.0, 0.0001)];
        assert!(matches!(
            filter_for_fit(&rows),
            Err(AnalysisError::EmptyAfterFiltering(_))
        ));
    }

    #[test]
    fn test_two_rows_are_enough() {
        let rows = vec![row(1, 10.0, 0.01, 0.005, 0.0001), row(2, 10.1, 0.01, 0.002, 0.0001)];
        assert_eq!(filter_for_fit(&rows).unwrap().len(), 2);
    }
}
