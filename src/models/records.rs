//! Record collections.
//!
//! `Records` tags one homogeneous collection with its entity kind;
//! `Dataset` holds up to three sibling collections for cross-entity
//! checks and export.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CellValue, Client, Entity, Task, Worker};
use crate::error::{IntakeError, Result};
use crate::schema::{CanonicalField, EntityKind};
use crate::validation::Diagnostic;

/// A collection of records of one entity kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Records {
    Clients(Vec<Client>),
    Workers(Vec<Worker>),
    Tasks(Vec<Task>),
}

impl Records {
    /// Kind tag of the collection.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Clients(_) => EntityKind::Client,
            Self::Workers(_) => EntityKind::Worker,
            Self::Tasks(_) => EntityKind::Task,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Self::Clients(v) => v.len(),
            Self::Workers(v) => v.len(),
            Self::Tasks(v) => v.len(),
        }
    }

    /// Whether the collection has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads one cell; `None` when the row does not exist.
    pub fn get(&self, row: usize, field: CanonicalField) -> Option<CellValue> {
        match self {
            Self::Clients(v) => v.get(row).map(|r| r.get(field)),
            Self::Workers(v) => v.get(row).map(|r| r.get(field)),
            Self::Tasks(v) => v.get(row).map(|r| r.get(field)),
        }
    }

    /// Writes one cell, as a grid edit would.
    pub fn set(&mut self, row: usize, field: CanonicalField, value: CellValue) -> Result<()> {
        let kind = self.kind();
        if field.kind() != kind {
            return Err(IntakeError::FieldKindMismatch { field, kind });
        }
        let len = self.len();
        let out_of_range = IntakeError::RowOutOfRange { kind, row, len };
        let applied = match self {
            Self::Clients(v) => v.get_mut(row).map(|r| r.set(field, value)),
            Self::Workers(v) => v.get_mut(row).map(|r| r.set(field, value)),
            Self::Tasks(v) => v.get_mut(row).map(|r| r.set(field, value)),
        };
        applied.map(|_| ()).ok_or(out_of_range)
    }

    /// Writes an auto-fixable diagnostic's suggestion into the addressed cell.
    ///
    /// Returns `Ok(false)` when the diagnostic offers no automatic fix.
    /// The diagnostic itself is not changed; re-validate afterwards.
    pub fn apply_fix(&mut self, diagnostic: &Diagnostic) -> Result<bool> {
        let suggestion = match (&diagnostic.suggestion, diagnostic.auto_fixable) {
            (Some(s), true) => s.clone(),
            _ => return Ok(false),
        };
        let field = diagnostic
            .field()
            .ok_or_else(|| IntakeError::UnknownField(diagnostic.column.clone()))?;
        if diagnostic.entity != self.kind() {
            return Err(IntakeError::FieldKindMismatch {
                field,
                kind: self.kind(),
            });
        }
        self.set(diagnostic.row, field, CellValue::from_json(suggestion))?;
        debug!(
            kind = %self.kind(),
            row = diagnostic.row,
            column = %diagnostic.column,
            "Applied suggested fix"
        );
        Ok(true)
    }
}

impl From<Vec<Client>> for Records {
    fn from(v: Vec<Client>) -> Self {
        Self::Clients(v)
    }
}

impl From<Vec<Worker>> for Records {
    fn from(v: Vec<Worker>) -> Self {
        Self::Workers(v)
    }
}

impl From<Vec<Task>> for Records {
    fn from(v: Vec<Task>) -> Self {
        Self::Tasks(v)
    }
}

/// Up to three sibling collections.
///
/// A collection is *present* when it was supplied and has at least one row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub clients: Option<Vec<Client>>,
    #[serde(default)]
    pub workers: Option<Vec<Worker>>,
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
}

impl Dataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the client collection.
    pub fn with_clients(mut self, clients: Vec<Client>) -> Self {
        self.clients = Some(clients);
        self
    }

    /// Sets the worker collection.
    pub fn with_workers(mut self, workers: Vec<Worker>) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Sets the task collection.
    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = Some(tasks);
        self
    }

    /// Replaces the collection of the same kind.
    pub fn insert(&mut self, records: Records) {
        match records {
            Records::Clients(v) => self.clients = Some(v),
            Records::Workers(v) => self.workers = Some(v),
            Records::Tasks(v) => self.tasks = Some(v),
        }
    }

    /// Present clients (supplied and non-empty).
    pub fn present_clients(&self) -> Option<&[Client]> {
        present(&self.clients)
    }

    /// Present workers (supplied and non-empty).
    pub fn present_workers(&self) -> Option<&[Worker]> {
        present(&self.workers)
    }

    /// Present tasks (supplied and non-empty).
    pub fn present_tasks(&self) -> Option<&[Task]> {
        present(&self.tasks)
    }

    /// Row count of a present collection.
    pub fn row_count(&self, kind: EntityKind) -> Option<usize> {
        match kind {
            EntityKind::Client => self.present_clients().map(<[_]>::len),
            EntityKind::Worker => self.present_workers().map(<[_]>::len),
            EntityKind::Task => self.present_tasks().map(<[_]>::len),
        }
    }
}

fn present<T>(v: &Option<Vec<T>>) -> Option<&[T]> {
    v.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Field;
    use crate::schema::EntityKind;
    use crate::validation::{DiagnosticKind, Severity};
    use serde_json::json;

    fn priority_diagnostic(row: usize, auto_fixable: bool) -> Diagnostic {
        Diagnostic::new(
            Severity::Error,
            DiagnosticKind::OutOfRange,
            EntityKind::Client,
            row,
            CanonicalField::PriorityLevel,
            "PriorityLevel must be between 1 and 5",
            json!(7),
        )
        .with_suggestion(json!(5), auto_fixable)
    }

    #[test]
    fn test_records_kind_and_len() {
        let records: Records = vec![Task::new("T1"), Task::new("T2")].into();
        assert_eq!(records.kind(), EntityKind::Task);
        assert_eq!(records.len(), 2);
        assert!(!records.is_empty());
    }

    #[test]
    fn test_set_rejects_foreign_field() {
        let mut records: Records = vec![Client::new("C1")].into();
        let err = records
            .set(0, CanonicalField::Skills, CellValue::Null)
            .unwrap_err();
        assert!(matches!(err, IntakeError::FieldKindMismatch { .. }));

        let err = records
            .set(3, CanonicalField::ClientName, CellValue::Null)
            .unwrap_err();
        assert!(matches!(err, IntakeError::RowOutOfRange { row: 3, len: 1, .. }));
    }

    #[test]
    fn test_apply_fix_writes_suggestion() {
        let mut records: Records = vec![Client::new("C1").with_priority(7.0)].into();
        let applied = records.apply_fix(&priority_diagnostic(0, true)).unwrap();
        assert!(applied);

        match &records {
            Records::Clients(v) => assert_eq!(v[0].priority_level, Field::Value(5.0)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_apply_fix_skips_manual_diagnostics() {
        let mut records: Records = vec![Client::new("C1").with_priority(7.0)].into();
        let applied = records.apply_fix(&priority_diagnostic(0, false)).unwrap();
        assert!(!applied);
        assert_eq!(
            records.get(0, CanonicalField::PriorityLevel),
            Some(CellValue::Number(7.0))
        );
    }

    #[test]
    fn test_apply_fix_rejects_unknown_column() {
        let mut records: Records = vec![Client::new("C1").with_priority(7.0)].into();
        let mut diagnostic = priority_diagnostic(0, true);
        diagnostic.column = "Priority".into();
        let err = records.apply_fix(&diagnostic).unwrap_err();
        assert!(matches!(err, IntakeError::UnknownField(c) if c == "Priority"));
    }

    #[test]
    fn test_dataset_insert_replaces_same_kind() {
        let mut data = Dataset::new().with_tasks(vec![Task::new("T1")]);
        data.insert(vec![Task::new("T2"), Task::new("T3")].into());
        data.insert(vec![Worker::new("W1")].into());

        assert_eq!(data.row_count(EntityKind::Task), Some(2));
        assert_eq!(data.row_count(EntityKind::Worker), Some(1));
        assert_eq!(data.row_count(EntityKind::Client), None);
        assert_eq!(data.present_tasks().unwrap()[0].id(), Some("T2"));
    }

    #[test]
    fn test_dataset_presence() {
        let data = Dataset::new()
            .with_clients(vec![])
            .with_tasks(vec![Task::new("T1")]);
        assert!(data.present_clients().is_none());
        assert!(data.present_workers().is_none());
        assert_eq!(data.row_count(EntityKind::Task), Some(1));
    }
}
