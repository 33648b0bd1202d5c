use crate::range::DEFAULT_MAX_WINDOW_DAYS;

/// 5-Year Treasury Constant Maturity rate
pub const DEFAULT_TREASURY_SERIES: &str = "DGS5";

#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    /// Treasury series used as the risk-free rate
    pub treasury_series: String,
    pub max_window_days: i64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            treasury_series: DEFAULT_TREASURY_SERIES.to_string(),
            max_window_days: DEFAULT_MAX_WINDOW_DAYS,
        }
    }
}

impl OrchestratorConfig {
    /// Read `TREASURY_SERIES` and `MAX_WINDOW_DAYS` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let treasury_series = lookup("TREASURY_SERIES")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.treasury_series);

        let max_window_days = match lookup("MAX_WINDOW_DAYS") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(days) if days > 0 => days,
                _ => {
                    tracing::warn!(
                        "Ignoring MAX_WINDOW_DAYS={:?}, using default of {} days",
                        raw,
                        defaults.max_window_days
                    );
                    defaults.max_window_days
                }
            },
            None => defaults.max_window_days,
        };

        Self {
            treasury_series,
            max_window_days,
        }
    }
}
