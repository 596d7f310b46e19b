//! Cross-entity rules.
//!
//! Four independent checks; all run, none short-circuits another:
//! 1. Client task requests must resolve to task IDs (one error per client row).
//! 2. Task skills must be held by some worker (one warning per task row).
//! 3. Preferred phases must not exceed the last phase any worker covers.
//! 4. Total task duration vs. total worker capacity (one global warning).
//!
//! Check 4 is a coarse heuristic: capacity is `MaxLoadPerPhase ×
//! max(slot count, 1)` summed over workers. It ignores skill matching and
//! concurrency limits and is not a feasibility proof.

use serde_json::json;
use std::collections::HashSet;
use tracing::debug;

use super::{Accumulator, Diagnostic, DiagnosticKind};
use crate::models::{Client, Task, Worker};
use crate::schema::{CanonicalField, EntityKind};

/// Runs every check whose collections are present.
pub(crate) fn check(
    clients: Option<&[Client]>,
    workers: Option<&[Worker]>,
    tasks: Option<&[Task]>,
    acc: &mut Accumulator,
) {
    if let (Some(clients), Some(tasks)) = (clients, tasks) {
        check_task_references(clients, tasks, acc);
    }
    if let (Some(workers), Some(tasks)) = (workers, tasks) {
        check_skill_coverage(workers, tasks, acc);
        check_phase_reach(workers, tasks, acc);
        check_capacity(workers, tasks, acc);
    }
}

fn check_task_references(clients: &[Client], tasks: &[Task], acc: &mut Accumulator) {
    let task_ids: HashSet<&str> = tasks.iter().filter_map(|t| t.id.as_deref()).collect();

    for (row, client) in clients.iter().enumerate() {
        let requested = client.requested_tasks();
        let unresolved: Vec<&str> = requested
            .iter()
            .map(String::as_str)
            .filter(|id| !task_ids.contains(id))
            .collect();
        if unresolved.is_empty() {
            continue;
        }
        let resolved: Vec<&str> = requested
            .iter()
            .map(String::as_str)
            .filter(|id| task_ids.contains(id))
            .collect();
        acc.push(
            Diagnostic::error(
                DiagnosticKind::BrokenReference,
                EntityKind::Client,
                row,
                CanonicalField::RequestedTaskIds,
                format!("Unknown task IDs: {}", unresolved.join(", ")),
                json!(unresolved),
            )
            .with_suggestion(json!(resolved), true),
        );
    }
}

fn check_skill_coverage(workers: &[Worker], tasks: &[Task], acc: &mut Accumulator) {
    let available: HashSet<&str> = workers
        .iter()
        .flat_map(|w| w.skill_list())
        .map(String::as_str)
        .collect();

    for (row, task) in tasks.iter().enumerate() {
        let mut uncovered: Vec<&str> = Vec::new();
        for skill in task.skills_needed() {
            if !available.contains(skill.as_str()) && !uncovered.contains(&skill.as_str()) {
                uncovered.push(skill);
            }
        }
        if uncovered.is_empty() {
            continue;
        }
        acc.push(Diagnostic::warning(
            DiagnosticKind::UncoveredSkill,
            EntityKind::Task,
            row,
            CanonicalField::RequiredSkills,
            format!("No worker has skills: {}", uncovered.join(", ")),
            json!(uncovered),
        ));
    }
}

fn check_phase_reach(workers: &[Worker], tasks: &[Task], acc: &mut Accumulator) {
    let Some(last_phase) = workers.iter().flat_map(|w| w.slots()).copied().max() else {
        debug!("No worker slots; skipping phase reach check");
        return;
    };

    for (row, task) in tasks.iter().enumerate() {
        let phases = task.phases();
        let beyond: Vec<i64> = phases.iter().copied().filter(|p| *p > last_phase).collect();
        if beyond.is_empty() {
            continue;
        }
        let reachable: Vec<i64> = phases.iter().copied().filter(|p| *p <= last_phase).collect();
        acc.push(
            Diagnostic::warning(
                DiagnosticKind::UnreachablePhase,
                EntityKind::Task,
                row,
                CanonicalField::PreferredPhases,
                format!(
                    "Preferred phases {beyond:?} exceed the last worker phase ({last_phase})"
                ),
                json!(beyond),
            )
            .with_suggestion(json!(reachable), false),
        );
    }
}

fn check_capacity(workers: &[Worker], tasks: &[Task], acc: &mut Accumulator) {
    let demand: f64 = tasks.iter().filter_map(|t| t.duration.value()).sum();
    let capacity: f64 = workers.iter().map(Worker::capacity).sum();
    debug!(demand, capacity, "Aggregate capacity check");

    if demand > capacity {
        acc.push(Diagnostic::warning(
            DiagnosticKind::CapacityShortfall,
            EntityKind::Task,
            0,
            CanonicalField::Duration,
            format!(
                "Total task duration ({demand}) exceeds estimated worker capacity ({capacity})"
            ),
            json!({ "demand": demand, "capacity": capacity }),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Severity, Validator};

    fn worker(id: &str, skills: &[&str], slots: &[i64], load: f64) -> Worker {
        let mut w = Worker::new(id).with_name("Worker").with_slots(slots.iter().copied());
        for s in skills {
            w = w.with_skill(*s);
        }
        w.with_max_load(load)
    }

    fn task(id: &str, duration: f64) -> Task {
        Task::new(id).with_name("Task").with_duration(duration)
    }

    fn run(clients: &[Client], workers: &[Worker], tasks: &[Task]) -> Vec<Diagnostic> {
        Validator::default().validate_cross_entity(
            Some(clients).filter(|c| !c.is_empty()),
            Some(workers).filter(|w| !w.is_empty()),
            Some(tasks).filter(|t| !t.is_empty()),
        )
    }

    #[test]
    fn test_unknown_task_reference() {
        let clients = vec![Client::new("C1").with_requested_tasks(["T9"])];
        let tasks = vec![task("T1", 1.0)];
        let diags = run(&clients, &[], &tasks);

        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(diags[0].entity, EntityKind::Client);
        assert_eq!(diags[0].row, 0);
        assert!(diags[0].message.contains("T9"));
    }

    #[test]
    fn test_unresolved_ids_batched_per_client() {
        let clients = vec![
            Client::new("C1").with_requested_tasks(["T1"]),
            Client::new("C2").with_requested_tasks(["T1", "T8", "T9"]),
        ];
        let tasks = vec![task("T1", 1.0)];
        let diags = run(&clients, &[], &tasks);

        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].row, 1);
        assert_eq!(diags[0].value, json!(["T8", "T9"]));
        assert_eq!(diags[0].suggestion, Some(json!(["T1"])));
    }

    #[test]
    fn test_references_skipped_without_tasks() {
        let clients = vec![Client::new("C1").with_requested_tasks(["T9"])];
        assert!(run(&clients, &[], &[]).is_empty());
    }

    #[test]
    fn test_uncovered_skills_single_warning_per_task() {
        let workers = vec![worker("W1", &["sql"], &[1, 2], 5.0)];
        let tasks = vec![task("T1", 1.0)
            .with_required_skill("sql")
            .with_required_skill("rust")
            .with_required_skill("go")
            .with_required_skill("rust")];
        let diags = run(&[], &workers, &tasks);

        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UncoveredSkill);
        assert_eq!(diags[0].severity, Severity::Warning);
        assert_eq!(diags[0].value, json!(["rust", "go"]));
    }

    #[test]
    fn test_phase_beyond_worker_reach() {
        let workers = vec![worker("W1", &["sql"], &[1, 2, 3], 5.0)];
        let tasks = vec![task("T1", 1.0).with_preferred_phases([2, 4, 6])];
        let diags = run(&[], &workers, &tasks);

        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnreachablePhase);
        assert_eq!(diags[0].value, json!([4, 6]));
        assert_eq!(diags[0].suggestion, Some(json!([2])));
    }

    #[test]
    fn test_phase_reach_skipped_without_worker_slots() {
        let workers = vec![worker("W1", &["sql"], &[], 5.0), worker("W2", &["sql"], &[], 5.0)];
        let tasks = vec![task("T1", 1.0).with_preferred_phases([9])];
        let diags = run(&[], &workers, &tasks);
        assert!(diags.iter().all(|d| d.kind != DiagnosticKind::UnreachablePhase));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_capacity_shortfall_is_single_global_warning() {
        // capacity: 1 × 2 slots + 2 × max(0, 1) = 4; demand 5
        let workers = vec![
            worker("W1", &["sql"], &[1, 2], 1.0),
            worker("W2", &["sql"], &[], 2.0),
        ];
        let tasks = vec![task("T1", 3.0), task("T2", 2.0)];
        let diags = run(&[], &workers, &tasks);

        assert_eq!(diags.len(), 1);
        let d = &diags[0];
        assert_eq!(d.kind, DiagnosticKind::CapacityShortfall);
        assert_eq!(d.row, 0);
        assert_eq!(d.value, json!({"demand": 5.0, "capacity": 4.0}));
    }

    #[test]
    fn test_capacity_within_limits() {
        let workers = vec![worker("W1", &["sql"], &[1, 2], 3.0)];
        let tasks = vec![task("T1", 6.0)];
        assert!(run(&[], &workers, &tasks).is_empty());
    }
}
