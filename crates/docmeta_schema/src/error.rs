//! Schema error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchemaError>;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Metadata table mismatch: expected '{expected}', got '{found}'")]
    TableIdentityMismatch { expected: &'static str, found: String },

    #[error("Row is missing required field '{field}'")]
    MissingField { field: String },

    #[error("Field '{field}' has an invalid value: expected {expected}, got {found}")]
    InvalidField {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("Column '{column}' of table '{table_id}' has {found} values, expected {expected}")]
    ColumnLengthMismatch {
        table_id: String,
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Map key '{key}' does not match {field} '{id}'")]
    KeyMismatch {
        field: &'static str,
        key: String,
        id: String,
    },

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchemaError {
    pub(crate) fn missing(field: &str) -> Self {
        SchemaError::MissingField {
            field: field.to_string(),
        }
    }

    pub(crate) fn check_key(field: &'static str, key: &str, id: &str) -> Result<()> {
        if key == id {
            Ok(())
        } else {
            Err(SchemaError::KeyMismatch {
                field,
                key: key.to_string(),
                id: id.to_string(),
            })
        }
    }

    pub(crate) fn invalid(field: &str, expected: &'static str, found: &serde_json::Value) -> Self {
        SchemaError::InvalidField {
            field: field.to_string(),
            expected,
            found: found.to_string(),
        }
    }
}
