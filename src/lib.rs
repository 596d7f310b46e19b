//! Data intake and validation for resource-allocation spreadsheets.
//!
//! Takes already-decoded tabular rows for three entity kinds (clients,
//! workers and tasks), reconciles arbitrary column headers onto a
//! canonical schema, coerces raw cells into typed values, and reports
//! structural errors and quality warnings per entity and across entities.
//!
//! # Modules
//!
//! - **`schema`**: `EntityKind`, `CanonicalField`, alternative header names
//! - **`mapping`**: Similarity scoring and one-to-one header reconciliation
//! - **`coercion`**: Raw cell → `CellValue` (total, never fails)
//! - **`models`**: Typed `Client`, `Worker`, `Task` records, `Records`, `Dataset`
//! - **`ingest`**: Decoded rows → typed records with passthrough columns
//! - **`validation`**: Entity and cross-entity rules, `ValidationResult`
//! - **`export`**: JSON export document (`metadata` + `data`)
//! - **`config`**: `IntakeConfig` with TOML loading
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use u_intake::{ingest, Client, Dataset, IntakeConfig, Records, Validator};
//!
//! let headers = vec!["client_id".to_string(), "Name".to_string(), "priority".to_string()];
//! let row: HashMap<String, String> = [("client_id", "C1"), ("Name", "Acme"), ("priority", "9")]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v.to_string()))
//!     .collect();
//!
//! let config = IntakeConfig::default();
//! let ingested = ingest::ingest::<Client>(&headers, &[row], &config);
//! let records = Records::from(ingested.records);
//!
//! let result = Validator::new(config).validate(&records, &Dataset::new());
//! assert!(!result.is_valid);
//! assert_eq!(result.confidence, 0);
//! ```
//!
//! The engine validates and reports. It does not read files, persist
//! anything, or allocate tasks to workers.

pub mod coercion;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod mapping;
pub mod models;
pub mod schema;
pub mod validation;

pub use config::IntakeConfig;
pub use error::{IntakeError, Result};
pub use export::ExportDocument;
pub use models::{CellValue, Client, Dataset, Field, Records, Task, Worker};
pub use schema::{CanonicalField, EntityKind};
pub use validation::{Diagnostic, Severity, ValidationResult, Validator};
