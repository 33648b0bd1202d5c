use thiserror::Error;

/// Failures raised by the performance analytics engine.
///
/// Every variant is terminal for the computation that raised it. The message
/// names the stage and the input that failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid price data: {0}")]
    InvalidPriceData(String),

    #[error("Empty after filtering: {0}")]
    EmptyAfterFiltering(String),

    #[error("Singular regression: {0}")]
    SingularRegression(String),

    #[error("Degenerate time span: {0}")]
    DegenerateTimeSpan(String),

    #[error("Zero volatility: {0}")]
    ZeroVolatility(String),

    #[error("Malformed date: {0}")]
    MalformedDate(String),

    #[error("Non-finite value: {0}")]
    NonFiniteValue(String),
}

impl AnalysisError {
    /// Whether the error was caused by the caller's input rather than by the
    /// shape of the data after alignment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidPriceData(_)
                | AnalysisError::MalformedDate(_)
                | AnalysisError::NonFiniteValue(_)
        )
    }
}
