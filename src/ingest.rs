//! Row ingestion: decoded rows → typed records.
//!
//! # Pipeline
//!
//! 1. Reconcile the header row against the entity kind's schema.
//! 2. For every row, coerce each mapped cell and write it into the typed record.
//! 3. Attach unclaimed columns as passthrough extras, in header order.
//!
//! A non-blank cell that coerces to `Null` (e.g. `"high"` for a number) is
//! stored as an invalid field holding the raw text, so validation can say
//! *what* was wrong instead of reporting a missing value.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::coercion::coerce;
use crate::config::IntakeConfig;
use crate::mapping::{HeaderMapper, HeaderReconciliation};
use crate::models::{CellValue, Entity};

/// One decoded row: raw header → raw cell text.
pub type RawRow = HashMap<String, String>;

/// Typed records plus the header reconciliation that produced them.
#[derive(Debug, Clone)]
pub struct Ingested<E> {
    /// Records in row order.
    pub records: Vec<E>,
    /// How headers were mapped.
    pub reconciliation: HeaderReconciliation,
}

/// Reconciles `headers` and converts every row into a typed record.
pub fn ingest<E: Entity>(headers: &[String], rows: &[RawRow], config: &IntakeConfig) -> Ingested<E> {
    let reconciliation = HeaderMapper::from_config(config).reconcile(headers, E::KIND);
    let records: Vec<E> = rows
        .iter()
        .map(|row| build_record(row, &reconciliation))
        .collect();

    info!(
        kind = %E::KIND,
        rows = records.len(),
        missing_required = reconciliation.missing_required().len(),
        "Ingested rows"
    );

    Ingested {
        records,
        reconciliation,
    }
}

/// Builds one record from a decoded row using an existing reconciliation.
pub fn build_record<E: Entity>(row: &RawRow, reconciliation: &HeaderReconciliation) -> E {
    let mut record = E::default();

    for (field, header) in reconciliation.mapping.iter() {
        let raw = row.get(header).map(String::as_str);
        let mut cell = coerce(raw, field);
        if cell.is_null() {
            if let Some(raw) = raw.filter(|r| !r.trim().is_empty()) {
                debug!(field = %field, raw, "Cell did not coerce; keeping raw text");
                cell = CellValue::Text(raw.to_string());
            }
        }
        if !record.set(field, cell) {
            warn!(field = %field, kind = %E::KIND, "Field does not belong to this entity kind; ignored");
        }
    }

    for header in &reconciliation.passthrough_headers {
        if let Some(value) = row.get(header) {
            record.extras_mut().insert(header.clone(), value.clone());
        }
    }

    record
}
