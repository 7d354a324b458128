use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoanError {
    #[error("invalid input: {field} ({reason})")]
    InvalidInput { field: String, reason: String },

    #[error("unknown payment frequency '{0}' (expected daily, weekly, biweekly or monthly)")]
    UnknownFrequency(String),

    #[error("unknown currency code '{0}'")]
    UnknownCurrency(String),

    #[error("computation error: {0}")]
    Computation(String),

    #[error("no due date follows {0}")]
    DateOutOfRange(chrono::NaiveDate),
}

pub type LoanResult<T> = Result<T, LoanError>;

impl LoanError {
    pub(crate) fn invalid(field: &str, reason: &str) -> Self {
        LoanError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
