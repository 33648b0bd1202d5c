use analysis_core::{DailyReturn, RatePoint, RawRatePoint, RegressionReport, SeriesProvider};
use chrono::{NaiveDate, Utc};
use performance_analysis::PerformanceAnalysisEngine;

pub mod config;
pub mod error;
pub mod range;

pub use config::OrchestratorConfig;
pub use error::{OrchestratorError, RangeError};
pub use range::DateRange;

/// Fetches the raw series for a request and hands them to the analytics engine.
///
/// All fetches for a request complete before the engine runs; if any of them
/// fails the other results are dropped and the engine is never invoked.
pub struct PerformanceOrchestrator<P: SeriesProvider> {
    provider: P,
    engine: PerformanceAnalysisEngine,
    config: OrchestratorConfig,
}

impl<P: SeriesProvider> PerformanceOrchestrator<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, OrchestratorConfig::default())
    }

    pub fn with_config(provider: P, config: OrchestratorConfig) -> Self {
        Self {
            provider,
            engine: PerformanceAnalysisEngine::new(),
            config,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Resolve request bounds against today's UTC date.
    pub fn resolve_range(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<DateRange, OrchestratorError> {
        self.resolve_range_on(from, to, Utc::now().date_naive())
    }

    pub fn resolve_range_on(
        &self,
        from: Option<&str>,
        to: Option<&str>,
        today: NaiveDate,
    ) -> Result<DateRange, OrchestratorError> {
        Ok(DateRange::resolve(from, to, today, self.config.max_window_days)?)
    }

    /// Daily returns for `symbol`, most recent first.
    pub async fn daily_returns(
        &self,
        symbol: &str,
        range: DateRange,
    ) -> Result<Vec<DailyReturn>, OrchestratorError> {
        tracing::info!("Computing daily returns for {} ({} to {})", symbol, range.from, range.to);

        let prices = self
            .provider
            .fetch_daily_series(symbol, range.from, range.to)
            .await
            .map_err(|e| OrchestratorError::fetch(symbol, e))?;
        tracing::debug!("Fetched {} prices for {}", prices.len(), symbol);

        Ok(self.engine.daily_returns(&prices)?)
    }

    /// Alpha/beta report for `ticker` against `benchmark` over `range`.
    pub async fn alpha_beta(
        &self,
        ticker: &str,
        benchmark: &str,
        range: DateRange,
    ) -> Result<RegressionReport, OrchestratorError> {
        let treasury_series = self.config.treasury_series.as_str();
        tracing::info!(
            "Computing alpha/beta for {} vs {} (risk-free: {}, {} to {})",
            ticker,
            benchmark,
            treasury_series,
            range.from,
            range.to
        );

        let (ticker_result, benchmark_result, treasury_result) = tokio::join!(
            self.provider.fetch_daily_series(ticker, range.from, range.to),
            self.provider.fetch_daily_series(benchmark, range.from, range.to),
            self.provider.fetch_treasury_series(treasury_series, range.from, range.to),
        );

        let ticker_prices = ticker_result.map_err(|e| OrchestratorError::fetch(ticker, e))?;
        let benchmark_prices =
            benchmark_result.map_err(|e| OrchestratorError::fetch(benchmark, e))?;
        let raw_rates = treasury_result.map_err(|e| OrchestratorError::fetch(treasury_series, e))?;

        let mut rates = raw_rates
            .iter()
            .map(RawRatePoint::normalize)
            .collect::<Result<Vec<RatePoint>, _>>()?;
        rates.sort_by_key(|r| r.date);

        tracing::debug!(
            "Fetched {} {} prices, {} {} prices, {} {} rates",
            ticker_prices.len(),
            ticker,
            benchmark_prices.len(),
            benchmark,
            rates.len(),
            treasury_series
        );

        let report = self.engine.alpha_beta(&ticker_prices, &benchmark_prices, &rates)?;
        tracing::info!(
            "{} vs {}: beta {:.3}, regression alpha {:.4}/yr, geometric alpha {:.4}/yr, {} days",
            ticker,
            benchmark,
            report.beta,
            report.alpha_regression_annualized,
            report.alpha_geom_annualized,
            report.data.len()
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{AnalysisError, FetchError, PricePoint, RawDate, RawValue};
    use async_trait::async_trait;
    use chrono::Duration;
    use std::collections::HashMap;

    /// In-memory provider keyed by symbol / treasury series id.
    #[derive(Default)]
    struct MockProvider {
        prices: HashMap<String, Vec<PricePoint>>,
        rates: HashMap<String, Vec<RawRatePoint>>,
        failures: HashMap<String, FetchError>,
    }

    #[async_trait]
    impl SeriesProvider for MockProvider {
        async fn fetch_daily_series(
            &self,
            symbol: &str,
            from: NaiveDate,
            to: NaiveDate,
        ) -> Result<Vec<PricePoint>, FetchError> {
            if let Some(err) = self.failures.get(symbol) {
                return Err(err.clone());
            }
            let range = DateRange { from, to };
            self.prices
                .get(symbol)
                .map(|p| p.iter().filter(|x| range.contains(x.date)).copied().collect())
                .ok_or_else(|| FetchError::NotFound(symbol.to_string()))
        }

        async fn fetch_treasury_series(
            &self,
            series: &str,
            _from: NaiveDate,
            _to: NaiveDate,
        ) -> Result<Vec<RawRatePoint>, FetchError> {
            if let Some(err) = self.failures.get(series) {
                return Err(err.clone());
            }
            self.rates
                .get(series)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(series.to_string()))
        }
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    }

    fn range() -> DateRange {
        DateRange {
            from: start(),
            to: start() + Duration::days(60),
        }
    }

    /// Provider with 40 consecutive days of data; treasury dates as epoch millis,
    /// reversed, with string values.
    fn provider() -> MockProvider {
        let days: Vec<NaiveDate> = (0..40).map(|i| start() + Duration::days(i)).collect();
        let bench: Vec<PricePoint> = days
            .iter()
            .enumerate()
            .map(|(i, d)| PricePoint::new(*d, 400.0 * (1.0 + 0.01 * ((i as f64) * 1.3).sin())))
            .collect();
        let ticker: Vec<PricePoint> = days
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let drift = 0.015 * ((i as f64) * 1.3).sin() + 0.001 * i as f64;
                PricePoint::new(*d, 50.0 * (1.0 + drift))
            })
            .rev()
            .collect();
        let rates: Vec<RawRatePoint> = days
            .iter()
            .rev()
            .map(|d| RawRatePoint {
                date: RawDate::Millis(d.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_millis()),
                value: RawValue::Text("4.10".to_string()),
            })
            .collect();

        let mut p = MockProvider::default();
        p.prices.insert("AAPL".to_string(), ticker);
        p.prices.insert("SPY".to_string(), bench);
        p.rates.insert("DGS5".to_string(), rates);
        p
    }

    #[tokio::test]
    async fn test_alpha_beta_end_to_end() {
        let orchestrator = PerformanceOrchestrator::new(provider());
        let report = orchestrator.alpha_beta("AAPL", "SPY", range()).await.unwrap();

        assert_eq!(report.data.len(), 39);
        assert!(report.beta > 1.0 && report.beta < 2.0);
        assert!(report.beta_pvalue.unwrap() < 0.05);
        assert!(report
            .data
            .iter()
            .all(|r| (r.row.risk_free_rate_annualized - 0.041).abs() < 1e-12));
    }

    #[tokio::test]
    async fn test_daily_returns_sorted_descending() {
        let orchestrator = PerformanceOrchestrator::new(provider());
        let returns = orchestrator.daily_returns("AAPL", range()).await.unwrap();

        assert_eq!(returns.len(), 39);
        assert!(returns.windows(2).all(|w| w[0].date > w[1].date));
    }

    #[tokio::test]
    async fn test_fetch_failure_short_circuits() {
        let mut p = provider();
        p.failures
            .insert("DGS5".to_string(), FetchError::RateLimited("slow down".to_string()));
        let orchestrator = PerformanceOrchestrator::new(p);

        let err = orchestrator.alpha_beta("AAPL", "SPY", range()).await.unwrap_err();
        assert_eq!(err.status_code(), 429);
        assert!(matches!(
            err,
            OrchestratorError::Fetch { ref source_name, .. } if source_name == "DGS5"
        ));
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_not_found() {
        let orchestrator = PerformanceOrchestrator::new(provider());
        let err = orchestrator.alpha_beta("NOPE", "SPY", range()).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_malformed_treasury_date() {
        let mut p = provider();
        p.rates.insert(
            "DGS5".to_string(),
            vec![RawRatePoint {
                date: RawDate::Text("last tuesday".to_string()),
                value: RawValue::Number(4.0),
            }],
        );
        let orchestrator = PerformanceOrchestrator::new(p);

        let err = orchestrator.alpha_beta("AAPL", "SPY", range()).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::Analysis(AnalysisError::MalformedDate(_))));
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_configured_treasury_series() {
        let mut p = provider();
        let rates = p.rates.remove("DGS5").unwrap();
        p.rates.insert("DGS10".to_string(), rates);
        let config = OrchestratorConfig {
            treasury_series: "DGS10".to_string(),
            ..OrchestratorConfig::default()
        };
        let orchestrator = PerformanceOrchestrator::with_config(p, config);

        assert_eq!(orchestrator.config().treasury_series, "DGS10");
        assert!(orchestrator.alpha_beta("AAPL", "SPY", range()).await.is_ok());
    }

    #[test]
    fn test_range_error_maps_to_bad_request() {
        let orchestrator = PerformanceOrchestrator::new(MockProvider::default());
        let err = orchestrator
            .resolve_range_on(Some("2001-01-01"), Some("2024-01-01"), start())
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
