use thiserror::Error;

use crate::schema::Field;

/// A positional input that does not fit the feature schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("expected {expected} feature values, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("{field} must be numeric, got category '{value}'")]
    ExpectedNumber { field: Field, value: String },

    #[error("{field} must be a category, got number {value}")]
    ExpectedCategory { field: Field, value: f64 },

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: Field, value: f64 },
}
