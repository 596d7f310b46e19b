//! Per-entity rules.
//!
//! Shared checks (required fields, duplicate IDs, short names) run for
//! every kind; each kind then adds its own range and shape checks.
//!
//! Workers differ on purpose: an empty or absent skill list is an error
//! for a worker but only a warning for a task.

use serde_json::{json, Value};
use std::collections::HashSet;
use tracing::debug;

use super::{Accumulator, Diagnostic, DiagnosticKind};
use crate::config::IntakeConfig;
use crate::mapping::similarity;
use crate::models::{CellValue, Client, Entity, Field, Task, Worker};
use crate::schema::{CanonicalField, EntityKind};

const JSON_HINT: &str = r#"Use a JSON object, e.g. {"key": "value"}"#;

/// Kind-specific checks for one record.
pub(crate) trait RecordRules: Entity {
    fn check(&self, row: usize, config: &IntakeConfig, acc: &mut Accumulator);
}

/// Runs shared and kind-specific rules over a collection, in row order.
pub(crate) fn check_records<E: RecordRules>(
    records: &[E],
    config: &IntakeConfig,
    acc: &mut Accumulator,
) {
    let kind = E::KIND;
    let id_field = kind.id_field();
    let mut seen: HashSet<&str> = HashSet::new();

    for (row, record) in records.iter().enumerate() {
        for &field in kind.required_fields() {
            if record.get(field).is_null() {
                acc.push(Diagnostic::error(
                    DiagnosticKind::MissingField,
                    kind,
                    row,
                    field,
                    format!("Missing required field {field}"),
                    Value::Null,
                ));
            }
        }

        if let Some(id) = record.id() {
            if !seen.insert(id) {
                acc.push(Diagnostic::error(
                    DiagnosticKind::DuplicateId,
                    kind,
                    row,
                    id_field,
                    format!("Duplicate {id_field}: {id}"),
                    Value::from(id),
                ));
            }
        }

        if let Some(name) = record.name() {
            if name.chars().count() < config.min_name_length {
                acc.push(Diagnostic::warning(
                    DiagnosticKind::ShortName,
                    kind,
                    row,
                    kind.name_field(),
                    format!("Name '{name}' is very short"),
                    Value::from(name),
                ));
            }
        }

        record.check(row, config, acc);
    }

    debug!(kind = %kind, rows = records.len(), "Entity rules applied");
}

impl RecordRules for Client {
    fn check(&self, row: usize, config: &IntakeConfig, acc: &mut Accumulator) {
        let kind = EntityKind::Client;

        match &self.priority_level {
            Field::Value(p) if !(1.0..=5.0).contains(p) || p.fract() != 0.0 => {
                let fixed = p.round().clamp(1.0, 5.0) as i64;
                acc.push(
                    Diagnostic::error(
                        DiagnosticKind::OutOfRange,
                        kind,
                        row,
                        CanonicalField::PriorityLevel,
                        "PriorityLevel must be an integer from 1 to 5",
                        json!(p),
                    )
                    .with_suggestion(json!(fixed), true),
                );
            }
            Field::Invalid(cell) => {
                invalid_number(acc, kind, row, CanonicalField::PriorityLevel, cell)
            }
            _ => {}
        }

        match &self.requested_task_ids {
            Field::Value(ids) if ids.is_empty() => acc.push(empty_list_warning(
                kind,
                row,
                CanonicalField::RequestedTaskIds,
                "No tasks requested",
            )),
            Field::Invalid(cell) => {
                invalid_list(acc, kind, row, CanonicalField::RequestedTaskIds, cell)
            }
            _ => {}
        }

        if let Some(tag) = &self.group_tag {
            unknown_group(acc, config, kind, row, CanonicalField::GroupTag, tag);
        }

        if let Field::Invalid(cell) = &self.attributes {
            acc.push(
                Diagnostic::error(
                    DiagnosticKind::MalformedJson,
                    kind,
                    row,
                    CanonicalField::AttributesJson,
                    "AttributesJSON is not a valid JSON object",
                    cell.to_json(),
                )
                .with_suggestion(Value::from(JSON_HINT), false),
            );
        }
    }
}

impl RecordRules for Worker {
    fn check(&self, row: usize, config: &IntakeConfig, acc: &mut Accumulator) {
        let kind = EntityKind::Worker;

        match &self.skills {
            Field::Value(skills) if skills.is_empty() => acc.push(Diagnostic::error(
                DiagnosticKind::EmptyList,
                kind,
                row,
                CanonicalField::Skills,
                "Worker must have at least one skill",
                json!([]),
            )),
            Field::Invalid(cell) => invalid_list(acc, kind, row, CanonicalField::Skills, cell),
            _ => {}
        }

        match &self.available_slots {
            Field::Value(slots) if slots.is_empty() => acc.push(empty_list_warning(
                kind,
                row,
                CanonicalField::AvailableSlots,
                "Worker has no available slots",
            )),
            Field::Value(slots) if slots.iter().any(|s| *s < 0) => {
                let kept: Vec<i64> = slots.iter().copied().filter(|s| *s >= 0).collect();
                acc.push(
                    Diagnostic::error(
                        DiagnosticKind::OutOfRange,
                        kind,
                        row,
                        CanonicalField::AvailableSlots,
                        "AvailableSlots must not contain negative phases",
                        json!(slots),
                    )
                    .with_suggestion(json!(kept), true),
                );
            }
            Field::Invalid(cell) => {
                invalid_list(acc, kind, row, CanonicalField::AvailableSlots, cell)
            }
            _ => {}
        }

        match &self.max_load_per_phase {
            Field::Value(load) if *load <= 0.0 => acc.push(
                Diagnostic::error(
                    DiagnosticKind::OutOfRange,
                    kind,
                    row,
                    CanonicalField::MaxLoadPerPhase,
                    "MaxLoadPerPhase must be greater than 0",
                    json!(load),
                )
                .with_suggestion(json!(1), true),
            ),
            Field::Invalid(cell) => {
                invalid_number(acc, kind, row, CanonicalField::MaxLoadPerPhase, cell)
            }
            _ => {}
        }

        if let Some(group) = &self.group {
            unknown_group(acc, config, kind, row, CanonicalField::WorkerGroup, group);
        }

        let (lo, hi) = config.qualification_range;
        match &self.qualification_level {
            Field::Value(q) if *q < lo || *q > hi => acc.push(
                Diagnostic::warning(
                    DiagnosticKind::OutOfRange,
                    kind,
                    row,
                    CanonicalField::QualificationLevel,
                    format!("QualificationLevel is usually between {lo} and {hi}"),
                    json!(q),
                )
                .with_suggestion(json!(q.clamp(lo, hi)), true),
            ),
            Field::Invalid(cell) => {
                invalid_number(acc, kind, row, CanonicalField::QualificationLevel, cell)
            }
            _ => {}
        }
    }
}

impl RecordRules for Task {
    fn check(&self, row: usize, _config: &IntakeConfig, acc: &mut Accumulator) {
        let kind = EntityKind::Task;

        match &self.duration {
            Field::Value(d) if *d <= 0.0 => acc.push(
                Diagnostic::error(
                    DiagnosticKind::OutOfRange,
                    kind,
                    row,
                    CanonicalField::Duration,
                    "Duration must be greater than 0",
                    json!(d),
                )
                .with_suggestion(json!(1), true),
            ),
            Field::Invalid(cell) => invalid_number(acc, kind, row, CanonicalField::Duration, cell),
            _ => {}
        }

        match &self.required_skills {
            Field::Value(skills) if skills.is_empty() => acc.push(empty_list_warning(
                kind,
                row,
                CanonicalField::RequiredSkills,
                "Task lists no required skills",
            )),
            Field::Invalid(cell) => {
                invalid_list(acc, kind, row, CanonicalField::RequiredSkills, cell)
            }
            _ => {}
        }

        match &self.preferred_phases {
            Field::Value(phases) if phases.iter().any(|p| *p < 1) => {
                let kept: Vec<i64> = phases.iter().copied().filter(|p| *p >= 1).collect();
                acc.push(
                    Diagnostic::error(
                        DiagnosticKind::OutOfRange,
                        kind,
                        row,
                        CanonicalField::PreferredPhases,
                        "PreferredPhases must be positive phase numbers",
                        json!(phases),
                    )
                    .with_suggestion(json!(kept), true),
                );
            }
            Field::Invalid(cell) => {
                invalid_list(acc, kind, row, CanonicalField::PreferredPhases, cell)
            }
            _ => {}
        }

        match &self.max_concurrent {
            Field::Value(m) if *m < 1.0 || m.fract() != 0.0 => {
                let fixed = m.round().max(1.0) as i64;
                acc.push(
                    Diagnostic::error(
                        DiagnosticKind::OutOfRange,
                        kind,
                        row,
                        CanonicalField::MaxConcurrent,
                        "MaxConcurrent must be a positive integer",
                        json!(m),
                    )
                    .with_suggestion(json!(fixed), true),
                );
            }
            Field::Invalid(cell) => {
                invalid_number(acc, kind, row, CanonicalField::MaxConcurrent, cell)
            }
            _ => {}
        }
    }
}

fn invalid_number(
    acc: &mut Accumulator,
    kind: EntityKind,
    row: usize,
    field: CanonicalField,
    cell: &CellValue,
) {
    acc.push(Diagnostic::error(
        DiagnosticKind::InvalidNumber,
        kind,
        row,
        field,
        format!("{field} must be a number"),
        cell.to_json(),
    ));
}

fn invalid_list(
    acc: &mut Accumulator,
    kind: EntityKind,
    row: usize,
    field: CanonicalField,
    cell: &CellValue,
) {
    acc.push(Diagnostic::error(
        DiagnosticKind::InvalidShape,
        kind,
        row,
        field,
        format!("{field} must be a list"),
        cell.to_json(),
    ));
}

fn empty_list_warning(
    kind: EntityKind,
    row: usize,
    field: CanonicalField,
    message: &str,
) -> Diagnostic {
    Diagnostic::warning(DiagnosticKind::EmptyList, kind, row, field, message, json!([]))
}

/// Warns on a group tag outside the recommended set, suggesting the
/// closest recommended tag when one is similar enough.
fn unknown_group(
    acc: &mut Accumulator,
    config: &IntakeConfig,
    kind: EntityKind,
    row: usize,
    field: CanonicalField,
    value: &str,
) {
    if config.recommended_groups.is_empty()
        || config.recommended_groups.iter().any(|g| g == value)
    {
        return;
    }
    let mut diagnostic = Diagnostic::warning(
        DiagnosticKind::UnknownValue,
        kind,
        row,
        field,
        format!(
            "Unrecognized {field} '{value}' (expected one of: {})",
            config.recommended_groups.join(", ")
        ),
        Value::from(value),
    );

    let mut best: Option<(&str, f64)> = None;
    for group in &config.recommended_groups {
        let score = similarity(value, group);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((group.as_str(), score));
        }
    }
    if let Some((group, score)) = best {
        if score > config.match_threshold {
            diagnostic = diagnostic.with_suggestion(Value::from(group), true);
        }
    }
    acc.push(diagnostic);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Records;
    use crate::validation::{Severity, Validator};

    fn run(records: impl Into<Records>) -> Vec<Diagnostic> {
        Validator::default().validate_entity(&records.into())
    }

    fn good_client(id: &str) -> Client {
        Client::new(id).with_name("Acme").with_priority(3.0)
    }

    fn good_worker(id: &str) -> Worker {
        Worker::new(id)
            .with_name("Dana")
            .with_skill("sql")
            .with_slots([1, 2])
            .with_max_load(2.0)
    }

    fn good_task(id: &str) -> Task {
        Task::new(id).with_name("Load").with_duration(2.0)
    }

    #[test]
    fn test_clean_records_produce_nothing() {
        assert!(run(vec![good_client("C1"), good_client("C2")]).is_empty());
        assert!(run(vec![good_worker("W1")]).is_empty());
        assert!(run(vec![good_task("T1")]).is_empty());
    }

    #[test]
    fn test_missing_required_field() {
        let diags = run(vec![Client::new("C1").with_priority(2.0)]);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::MissingField);
        assert_eq!(diags[0].column, "ClientName");
        assert_eq!(diags[0].suggestion, None);
        assert!(!diags[0].auto_fixable);
    }

    #[test]
    fn test_duplicate_id_flagged_at_second_occurrence() {
        let diags = run(vec![good_client("C1"), good_client("C1")]);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::DuplicateId);
        assert_eq!(diags[0].row, 1);
        assert!(diags[0].message.contains("C1"));
    }

    #[test]
    fn test_every_later_duplicate_is_flagged() {
        let diags = run(vec![good_task("T1"), good_task("T1"), good_task("T2"), good_task("T1")]);
        let rows: Vec<usize> = diags.iter().map(|d| d.row).collect();
        assert_eq!(rows, vec![1, 3]);
    }

    #[test]
    fn test_priority_clamped_suggestions() {
        let diags = run(vec![
            good_client("C1").with_priority(7.0),
            good_client("C2").with_priority(-3.0),
            good_client("C3").with_priority(2.6),
        ]);
        let suggestions: Vec<_> = diags.iter().map(|d| d.suggestion.clone()).collect();
        assert_eq!(suggestions, vec![Some(json!(5)), Some(json!(1)), Some(json!(3))]);
        assert!(diags.iter().all(|d| d.auto_fixable && d.is_error()));
    }

    #[test]
    fn test_malformed_attributes_json() {
        let mut client = good_client("C1");
        client.attributes = Field::Invalid(CellValue::Text("{bad json".into()));
        let diags = run(vec![client]);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::MalformedJson);
        assert_eq!(diags[0].value, json!("{bad json"));
        assert_eq!(diags[0].suggestion, Some(Value::from(JSON_HINT)));
        assert!(!diags[0].auto_fixable);
    }

    #[test]
    fn test_list_field_with_wrong_shape() {
        let mut client = good_client("C1");
        client.requested_task_ids = Field::Invalid(CellValue::Number(4.0));
        let diags = run(vec![client]);
        assert_eq!(diags[0].kind, DiagnosticKind::InvalidShape);
        assert_eq!(diags[0].severity, Severity::Error);
    }

    #[test]
    fn test_empty_worker_skills_is_error_but_task_skills_warning() {
        let mut worker = good_worker("W1");
        worker.skills = Field::Value(vec![]);
        let diags = run(vec![worker]);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::EmptyList);
        assert!(diags[0].is_error());

        let mut task = good_task("T1");
        task.required_skills = Field::Value(vec![]);
        let diags = run(vec![task]);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
    }

    #[test]
    fn test_absent_worker_skills_is_error() {
        let mut worker = good_worker("W1");
        worker.skills = Field::Missing;
        let diags = run(vec![worker]);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::MissingField);
        assert!(diags[0].is_error());
    }

    #[test]
    fn test_worker_ranges() {
        let worker = good_worker("W1")
            .with_slots([-1, 2])
            .with_max_load(0.0)
            .with_qualification(12.0);
        let diags = run(vec![worker]);
        assert_eq!(diags.len(), 3);

        assert_eq!(diags[0].column, "AvailableSlots");
        assert_eq!(diags[0].suggestion, Some(json!([2])));
        assert_eq!(diags[1].column, "MaxLoadPerPhase");
        assert_eq!(diags[1].suggestion, Some(json!(1)));
        assert_eq!(diags[2].column, "QualificationLevel");
        assert_eq!(diags[2].severity, Severity::Warning);
        assert_eq!(diags[2].suggestion, Some(json!(10.0)));
    }

    #[test]
    fn test_task_ranges() {
        let task = Task::new("T1")
            .with_name("Load")
            .with_duration(-2.0)
            .with_preferred_phases([0, 2])
            .with_max_concurrent(0.4);
        let diags = run(vec![task]);
        let columns: Vec<&str> = diags.iter().map(|d| d.column.as_str()).collect();
        assert_eq!(columns, vec!["Duration", "PreferredPhases", "MaxConcurrent"]);
        assert_eq!(diags[2].suggestion, Some(json!(1)));
        assert!(diags.iter().all(|d| d.is_error()));
    }

    #[test]
    fn test_unparseable_number_reported() {
        let mut task = good_task("T1");
        task.duration = Field::Invalid(CellValue::Text("long".into()));
        let diags = run(vec![task]);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::InvalidNumber);
        assert_eq!(diags[0].value, json!("long"));
    }

    #[test]
    fn test_short_name_and_unknown_group_are_warnings() {
        let client = good_client("C1").with_name("A").with_group("GroupD");
        let diags = run(vec![client]);
        assert_eq!(diags.len(), 2);
        assert!(diags.iter().all(|d| d.severity == Severity::Warning));
        assert_eq!(diags[0].kind, DiagnosticKind::ShortName);
        assert_eq!(diags[1].kind, DiagnosticKind::UnknownValue);
        // "groupd" vs "groupa": one edit over six characters
        assert_eq!(diags[1].suggestion, Some(json!("GroupA")));
    }

    #[test]
    fn test_configured_group_tags() {
        let config = IntakeConfig::default().with_recommended_groups(["Ops", "Sales"]);
        let validator = Validator::new(config);
        assert_eq!(validator.config().recommended_groups, vec!["Ops", "Sales"]);

        let records: Records = vec![
            good_worker("W1").with_group("Sales"),
            good_worker("W2").with_group("Opps"),
            good_worker("W3").with_group("GroupA"),
        ]
        .into();
        let diags = validator.validate_entity(&records);
        let rows: Vec<usize> = diags.iter().map(|d| d.row).collect();
        assert_eq!(rows, vec![1, 2]);
        assert_eq!(diags[0].suggestion, Some(json!("Ops")));
        assert_eq!(diags[1].suggestion, None);
    }

    #[test]
    fn test_unknown_group_without_close_match() {
        let worker = good_worker("W1").with_group("Night Shift");
        let diags = run(vec![worker]);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].suggestion, None);
    }
}
