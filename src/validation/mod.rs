//! Validation of intake records.
//!
//! Checks per-entity structure and ranges, then consistency across the
//! three collections. Detects:
//! - Missing required fields
//! - Duplicate IDs
//! - Out-of-range numbers and wrongly shaped lists
//! - Malformed embedded JSON
//! - Unknown task references, uncovered skills, unreachable phases
//! - Aggregate demand above estimated capacity
//!
//! Every check runs over the whole input; a bad record never stops the
//! pass. Diagnostics are created fresh on each call and never mutated.
//!
//! # Confidence
//! `round(100 × rows_without_errors / total_rows)`, 100 for no rows.
//! Warnings do not lower confidence.

mod cross;
mod entity;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use tracing::info;
use uuid::Uuid;

use crate::config::IntakeConfig;
use crate::models::{Client, Dataset, Records, Task, Worker};
use crate::schema::{CanonicalField, EntityKind};

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Structural problem; the record is not valid.
    Error,
    /// Quality concern; validity is unaffected.
    Warning,
}

/// Categories of diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A required field has no value.
    MissingField,
    /// Two records share the same ID.
    DuplicateId,
    /// A value lies outside its domain.
    OutOfRange,
    /// A numeric field holds something that is not a number.
    InvalidNumber,
    /// A list field holds something that is not a list.
    InvalidShape,
    /// Embedded JSON could not be parsed as an object.
    MalformedJson,
    /// A list that should have content is empty.
    EmptyList,
    /// A name is suspiciously short.
    ShortName,
    /// An open-enum field has an unrecognized value.
    UnknownValue,
    /// A client requests a task that does not exist.
    BrokenReference,
    /// No worker holds a skill a task needs.
    UncoveredSkill,
    /// A task prefers a phase no worker is available in.
    UnreachablePhase,
    /// Total task duration exceeds estimated worker capacity.
    CapacityShortfall,
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Generated identifier, unique per diagnostic.
    pub id: String,
    /// Error or warning.
    pub severity: Severity,
    /// Finding category.
    pub kind: DiagnosticKind,
    /// Entity kind the finding is located in.
    pub entity: EntityKind,
    /// Zero-based row index (0 for collection-wide findings).
    pub row: usize,
    /// Canonical column name.
    pub column: String,
    /// Human-readable description.
    pub message: String,
    /// Offending value.
    pub value: Value,
    /// Suggested replacement or guidance.
    pub suggestion: Option<Value>,
    /// Whether `suggestion` can be written back as-is.
    pub auto_fixable: bool,
}

impl Diagnostic {
    /// Creates a diagnostic without a suggestion.
    pub fn new(
        severity: Severity,
        kind: DiagnosticKind,
        entity: EntityKind,
        row: usize,
        column: CanonicalField,
        message: impl Into<String>,
        value: Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            severity,
            kind,
            entity,
            row,
            column: column.name().to_string(),
            message: message.into(),
            value,
            suggestion: None,
            auto_fixable: false,
        }
    }

    /// Creates an error-severity diagnostic.
    pub fn error(
        kind: DiagnosticKind,
        entity: EntityKind,
        row: usize,
        column: CanonicalField,
        message: impl Into<String>,
        value: Value,
    ) -> Self {
        Self::new(Severity::Error, kind, entity, row, column, message, value)
    }

    /// Creates a warning-severity diagnostic.
    pub fn warning(
        kind: DiagnosticKind,
        entity: EntityKind,
        row: usize,
        column: CanonicalField,
        message: impl Into<String>,
        value: Value,
    ) -> Self {
        Self::new(Severity::Warning, kind, entity, row, column, message, value)
    }

    /// Attaches a suggestion.
    pub fn with_suggestion(mut self, suggestion: Value, auto_fixable: bool) -> Self {
        self.suggestion = Some(suggestion);
        self.auto_fixable = auto_fixable;
        self
    }

    /// Whether this is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// The canonical field this diagnostic points at.
    pub fn field(&self) -> Option<CanonicalField> {
        CanonicalField::from_name(&self.column)
    }

    /// Equality ignoring the generated identifier.
    pub fn same_content(&self, other: &Diagnostic) -> bool {
        self.severity == other.severity
            && self.kind == other.kind
            && self.entity == other.entity
            && self.row == other.row
            && self.column == other.column
            && self.message == other.message
            && self.value == other.value
            && self.suggestion == other.suggestion
            && self.auto_fixable == other.auto_fixable
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(
            f,
            "{level}: {}[{}].{}: {}",
            self.entity, self.row, self.column, self.message
        )
    }
}

/// Outcome of one validation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// All findings, in check order.
    pub diagnostics: Vec<Diagnostic>,
    /// Percentage of scored rows with no error (0..=100).
    pub confidence: u8,
    /// True when no error-severity diagnostic exists.
    pub is_valid: bool,
}

impl ValidationResult {
    fn new(diagnostics: Vec<Diagnostic>, scored: &[(EntityKind, usize)]) -> Self {
        let confidence = confidence(&diagnostics, scored);
        let is_valid = !diagnostics.iter().any(Diagnostic::is_error);
        Self {
            diagnostics,
            confidence,
            is_valid,
        }
    }

    /// Error diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Warning diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Diagnostics located on one row.
    pub fn for_row(&self, entity: EntityKind, row: usize) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.entity == entity && d.row == row)
            .collect()
    }
}

/// `round(100 × rows_without_errors / total_rows)` over the scored collections.
fn confidence(diagnostics: &[Diagnostic], scored: &[(EntityKind, usize)]) -> u8 {
    let total: usize = scored.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return 100;
    }
    let rows_with_errors: HashSet<(EntityKind, usize)> = diagnostics
        .iter()
        .filter(|d| d.is_error())
        .filter(|d| scored.iter().any(|(k, n)| *k == d.entity && d.row < *n))
        .map(|d| (d.entity, d.row))
        .collect();
    let clean = total - rows_with_errors.len();
    (100.0 * clean as f64 / total as f64).round() as u8
}

/// Per-call diagnostic accumulator.
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    diagnostics: Vec<Diagnostic>,
}

impl Accumulator {
    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn into_inner(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Stateless validator; all state lives in the call.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: IntakeConfig,
}

impl Validator {
    /// Creates a validator with the given configuration.
    pub fn new(config: IntakeConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    /// Runs per-entity rules over one collection.
    pub fn validate_entity(&self, records: &Records) -> Vec<Diagnostic> {
        let mut acc = Accumulator::default();
        self.entity_pass(records, &mut acc);
        acc.into_inner()
    }

    /// Runs cross-entity rules. Each check runs only when the collections
    /// it spans are present (supplied and non-empty).
    pub fn validate_cross_entity(
        &self,
        clients: Option<&[Client]>,
        workers: Option<&[Worker]>,
        tasks: Option<&[Task]>,
    ) -> Vec<Diagnostic> {
        let mut acc = Accumulator::default();
        cross::check(clients, workers, tasks, &mut acc);
        acc.into_inner()
    }

    /// Validates one collection, with sibling collections for the
    /// cross-entity pass.
    ///
    /// `records` stands in for the sibling of the same kind. Confidence is
    /// scored over the rows of `records` only.
    pub fn validate(&self, records: &Records, siblings: &Dataset) -> ValidationResult {
        let mut acc = Accumulator::default();
        self.entity_pass(records, &mut acc);

        let clients = match records {
            Records::Clients(v) => Some(v.as_slice()).filter(|s| !s.is_empty()),
            _ => siblings.present_clients(),
        };
        let workers = match records {
            Records::Workers(v) => Some(v.as_slice()).filter(|s| !s.is_empty()),
            _ => siblings.present_workers(),
        };
        let tasks = match records {
            Records::Tasks(v) => Some(v.as_slice()).filter(|s| !s.is_empty()),
            _ => siblings.present_tasks(),
        };
        cross::check(clients, workers, tasks, &mut acc);

        let result = ValidationResult::new(acc.into_inner(), &[(records.kind(), records.len())]);
        info!(
            kind = %records.kind(),
            rows = records.len(),
            errors = result.error_count(),
            warnings = result.warning_count(),
            confidence = result.confidence,
            "Validated collection"
        );
        result
    }

    /// Full report: every present collection, then the cross-entity pass.
    /// Confidence is scored over all rows of all present collections.
    pub fn validate_dataset(&self, data: &Dataset) -> ValidationResult {
        let mut acc = Accumulator::default();
        let mut scored = Vec::new();

        if let Some(clients) = data.present_clients() {
            entity::check_records(clients, &self.config, &mut acc);
            scored.push((EntityKind::Client, clients.len()));
        }
        if let Some(workers) = data.present_workers() {
            entity::check_records(workers, &self.config, &mut acc);
            scored.push((EntityKind::Worker, workers.len()));
        }
        if let Some(tasks) = data.present_tasks() {
            entity::check_records(tasks, &self.config, &mut acc);
            scored.push((EntityKind::Task, tasks.len()));
        }
        cross::check(
            data.present_clients(),
            data.present_workers(),
            data.present_tasks(),
            &mut acc,
        );

        let result = ValidationResult::new(acc.into_inner(), &scored);
        info!(
            collections = scored.len(),
            errors = result.error_count(),
            warnings = result.warning_count(),
            confidence = result.confidence,
            "Validated dataset"
        );
        result
    }

    fn entity_pass(&self, records: &Records, acc: &mut Accumulator) {
        match records {
            Records::Clients(v) => entity::check_records(v, &self.config, acc),
            Records::Workers(v) => entity::check_records(v, &self.config, acc),
            Records::Tasks(v) => entity::check_records(v, &self.config, acc),
        }
    }
}
