//! Series provider backed by JSON files on disk.
//!
//! Layout under the data directory:
//!   <SYMBOL>.json             [{"priceDate": "2024-01-02", "close": 185.64}, ...]
//!   treasury/<SERIES>.json    [{"date": 1704153600000, "value": 3.93}, ...]

use std::path::{Path, PathBuf};

use analysis_core::{FetchError, PricePoint, RawRatePoint, SeriesProvider};
use analysis_orchestrator::DateRange;
use async_trait::async_trait;
use chrono::NaiveDate;

pub struct FileSeriesProvider {
    root: PathBuf,
}

impl FileSeriesProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn read(&self, path: &Path) -> Result<String, FetchError> {
        tokio::fs::read_to_string(path).await.map_err(|e| {
            let shown = path.display();
            match e.kind() {
                std::io::ErrorKind::NotFound => FetchError::NotFound(shown.to_string()),
                std::io::ErrorKind::PermissionDenied => FetchError::Unauthorized(shown.to_string()),
                _ => FetchError::Transient(format!("{}: {}", shown, e)),
            }
        })
    }
}

fn parse<T: serde::de::DeserializeOwned>(path: &Path, body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body)
        .map_err(|e| FetchError::Transient(format!("{}: {}", path.display(), e)))
}

#[async_trait]
impl SeriesProvider for FileSeriesProvider {
    async fn fetch_daily_series(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, FetchError> {
        let path = self.root.join(format!("{}.json", symbol.to_uppercase()));
        let prices: Vec<PricePoint> = parse(&path, &self.read(&path).await?)?;
        tracing::debug!("Loaded {} prices from {}", prices.len(), path.display());

        let range = DateRange { from, to };
        Ok(prices.into_iter().filter(|p| range.contains(p.date)).collect())
    }

    async fn fetch_treasury_series(
        &self,
        series: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RawRatePoint>, FetchError> {
        let path = self.root.join("treasury").join(format!("{}.json", series));
        let rates: Vec<RawRatePoint> = parse(&path, &self.read(&path).await?)?;

        // Unparseable dates are passed through so the engine can report them.
        let range = DateRange { from, to };
        Ok(rates
            .into_iter()
            .filter(|r| match r.normalize() {
                Ok(point) => range.contains(point.date),
                Err(_) => true,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("perf-cli-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(dir.join("treasury")).unwrap();
        dir
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_reads_and_filters_prices() {
        let dir = scratch_dir("prices");
        std::fs::write(
            dir.join("MSFT.json"),
            r#"[{"priceDate": "2024-01-02", "close": 370.87},
                {"priceDate": "2024-01-03", "close": 370.60},
                {"priceDate": "2024-02-01", "close": 403.78}]"#,
        )
        .unwrap();

        let provider = FileSeriesProvider::new(&dir);
        let prices = provider
            .fetch_daily_series("msft", date("2024-01-01"), date("2024-01-31"))
            .await
            .unwrap();
        assert_eq!(prices.len(), 2);

        // both bounds are inclusive
        let prices = provider
            .fetch_daily_series("MSFT", date("2024-01-03"), date("2024-02-01"))
            .await
            .unwrap();
        let dates: Vec<NaiveDate> = prices.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date("2024-01-03"), date("2024-02-01")]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_treasury_keeps_malformed_dates() {
        let dir = scratch_dir("treasury");
        std::fs::write(
            dir.join("treasury").join("DGS5.json"),
            r#"[{"date": "2024-01-02", "value": 3.93},
                {"date": "2023-06-01", "value": 3.90},
                {"date": "not a date", "value": 3.95}]"#,
        )
        .unwrap();

        let provider = FileSeriesProvider::new(&dir);
        let rates = provider
            .fetch_treasury_series("DGS5", date("2024-01-01"), date("2024-01-31"))
            .await
            .unwrap();
        assert_eq!(rates.len(), 2);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let missing = std::env::temp_dir().join("perf-cli-does-not-exist");
        let provider = FileSeriesProvider::new(missing);
        let err = provider
            .fetch_daily_series("ZZZZ", date("2024-01-01"), date("2024-01-31"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
