use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error("Invalid input for {symbol}: {reason}")]
    InvalidInput { symbol: String, reason: String },

    #[error("Invalid payout frequency: {0} (expected 1, 2, 4 or 12)")]
    InvalidFrequency(u32),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl PlannerError {
    pub fn invalid_input(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }
}

pub type PlannerResult<T> = Result<T, PlannerError>;
