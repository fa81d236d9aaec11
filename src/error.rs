//! Error type for input parsing and validation
//!
//! The calculation core never fails; only loading and validating user input does.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("invalid start month '{0}', expected YYYY-MM")]
    InvalidStartMonth(String),

    #[error("unknown investment option '{0}'")]
    UnknownInvestment(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdvisorError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        AdvisorError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
