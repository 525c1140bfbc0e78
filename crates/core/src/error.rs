use thiserror::Error;

use crate::record::FieldType;

/// Raised while binding an action to its results field. Never raised mid-stream.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("missing results field: {field}")]
    MissingResultField { field: String },
    #[error("results field {field} holds {found} values, expected {expected}")]
    FieldTypeMismatch {
        field: String,
        expected: FieldType,
        found: FieldType,
    },
}
