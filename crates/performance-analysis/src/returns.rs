use analysis_core::{AnalysisError, DailyReturn, PricePoint};

/// Closes at or below this are treated as missing quotes rather than prices.
pub const MIN_VALID_PRICE: f64 = 1e-12;

/// Sort a copy of the series by date, oldest first.
///
/// Repeated dates collapse to the observation that came last in `prices`.
pub fn sorted_by_date(prices: &[PricePoint]) -> Vec<PricePoint> {
    let mut sorted = prices.to_vec();
    // stable: same-date points keep input order, so the last one wins below
    sorted.sort_by_key(|p| p.date);
    sorted.reverse();
    sorted.dedup_by_key(|p| p.date);
    sorted.reverse();
    sorted
}

/// Reject closes that cannot serve as a return denominator.
pub(crate) fn validate_prices(label: &str, prices: &[PricePoint]) -> Result<(), AnalysisError> {
    match prices
        .iter()
        .find(|p| !p.close.is_finite() || p.close <= MIN_VALID_PRICE)
    {
        Some(bad) => Err(AnalysisError::InvalidPriceData(format!(
            "{} close on {} is {}, expected a positive finite price",
            label, bad.date, bad.close
        ))),
        None => Ok(()),
    }
}

/// Simple daily returns, most recent date first.
///
/// One entry per distinct date after the earliest; the earliest date has no
/// prior close.
pub fn compute_returns(prices: &[PricePoint]) -> Result<Vec<DailyReturn>, AnalysisError> {
    validate_prices("price", prices)?;

    let sorted = sorted_by_date(prices);
    if sorted.len() < 2 {
        return Err(AnalysisError::InsufficientData(format!(
            "returns need prices on at least 2 dates, got {}",
            sorted.len()
        )));
    }
    let mut returns: Vec<DailyReturn> = sorted
        .windows(2)
        .map(|w| DailyReturn {
            date: w[1].date,
            daily_return: (w[1].close - w[0].close) / w[0].close,
            price: w[1].close,
        })
        .collect();
    returns.reverse();

    Ok(returns)
}
