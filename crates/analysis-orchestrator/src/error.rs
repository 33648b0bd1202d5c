use analysis_core::{AnalysisError, FetchError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("Invalid date format '{0}'. Use 'YYYY-MM-DD'")]
    InvalidDate(String),

    #[error("from_date {from} is after to_date {to}")]
    InvalidRange { from: String, to: String },

    #[error("Date range of {days} days exceeds the {max_days}-day limit")]
    WindowTooLarge { days: i64, max_days: i64 },
}

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Invalid date range: {0}")]
    Range(#[from] RangeError),

    #[error("Failed to fetch {source_name}: {error}")]
    Fetch {
        source_name: String,
        #[source]
        error: FetchError,
    },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl OrchestratorError {
    pub fn fetch(source_name: &str, error: FetchError) -> Self {
        OrchestratorError::Fetch {
            source_name: source_name.to_string(),
            error,
        }
    }

    /// HTTP status a boundary layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            OrchestratorError::Range(_) => 400,
            OrchestratorError::Fetch { error, .. } => error.status_code(),
            OrchestratorError::Analysis(e) if e.is_input_error() => 400,
            OrchestratorError::Analysis(_) => 422,
        }
    }
}
