//! Error type shared by the schedule engine and the contract boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContractError {
    /// Values the schedule cannot be computed from, such as a zero period or
    /// amounts that overflow.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A form field holding text that is not a valid value.
    #[error("cannot parse field `{field}` from {value:?}")]
    Parse { field: &'static str, value: String },

    /// A due date beyond the supported calendar.
    #[error("date out of range")]
    DateOutOfRange,

    /// Malformed form JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ContractError>;
