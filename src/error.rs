//! Error types for the intake crate.
//!
//! Header mapping, coercion, and validation are total and never fail;
//! these errors cover configuration loading, document import/export,
//! and explicit fix application.

use thiserror::Error;

use crate::schema::{CanonicalField, EntityKind};

/// Errors returned by fallible intake operations.
#[derive(Error, Debug)]
pub enum IntakeError {
    /// Configuration text could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Export document could not be serialized or parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A canonical field name was not recognized.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A field was addressed on a collection of another entity kind.
    #[error("Field {field} does not belong to {kind} records")]
    FieldKindMismatch {
        field: CanonicalField,
        kind: EntityKind,
    },

    /// A diagnostic addressed a row outside the collection.
    #[error("Row {row} is out of range for {kind} ({len} rows)")]
    RowOutOfRange {
        kind: EntityKind,
        row: usize,
        len: usize,
    },
}

/// Result alias for intake operations.
pub type Result<T> = std::result::Result<T, IntakeError>;
