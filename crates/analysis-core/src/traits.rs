use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::{PricePoint, RawRatePoint};

/// Classification of a failed fetch from a market-data provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Transient failure: {0}")]
    Transient(String),
}

impl FetchError {
    /// HTTP status a boundary layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            FetchError::NotFound(_) => 404,
            FetchError::Unauthorized(_) => 401,
            FetchError::RateLimited(_) => 429,
            FetchError::Transient(_) => 503,
        }
    }
}

/// Trait for sources of daily price and treasury series
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Daily closes for `symbol` between `from` and `to` (inclusive), in any order.
    async fn fetch_daily_series(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, FetchError>;

    /// Raw treasury observations for `series` (e.g. "DGS5") between `from` and `to`.
    async fn fetch_treasury_series(
        &self,
        series: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RawRatePoint>, FetchError>;
}
