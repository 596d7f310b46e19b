//! Worker model.
//!
//! Workers are the resources tasks are assigned to. Each worker holds a
//! skill set, a list of phases it is available in, and a per-phase load
//! limit.

use serde::{Deserialize, Serialize};

use super::cell::{text_from_cell, CellValue, Field, FromCell};
use super::client::text_cell;
use super::{Entity, Extras};
use crate::schema::{CanonicalField, EntityKind};

/// A worker record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique worker identifier.
    #[serde(rename = "WorkerID", default)]
    pub id: Option<String>,
    /// Display name.
    #[serde(rename = "WorkerName", default)]
    pub name: Option<String>,
    /// Skills held, in display order.
    #[serde(rename = "Skills", default)]
    pub skills: Field<Vec<String>>,
    /// Phase indices the worker is available in.
    #[serde(rename = "AvailableSlots", default)]
    pub available_slots: Field<Vec<i64>>,
    /// Maximum tasks per phase.
    #[serde(rename = "MaxLoadPerPhase", default)]
    pub max_load_per_phase: Field<f64>,
    /// Worker group.
    #[serde(rename = "WorkerGroup", default)]
    pub group: Option<String>,
    /// Qualification level (informally 1 to 10).
    #[serde(rename = "QualificationLevel", default)]
    pub qualification_level: Field<f64>,
    /// Unmapped columns.
    #[serde(flatten)]
    pub extras: Extras,
}

impl Worker {
    /// Creates a new worker with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Sets the worker name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        let mut skills = match self.skills {
            Field::Value(skills) => skills,
            _ => Vec::new(),
        };
        skills.push(skill.into());
        self.skills = Field::Value(skills);
        self
    }

    /// Sets the available phase slots.
    pub fn with_slots(mut self, slots: impl IntoIterator<Item = i64>) -> Self {
        self.available_slots = Field::Value(slots.into_iter().collect());
        self
    }

    /// Sets the per-phase load limit.
    pub fn with_max_load(mut self, max_load: f64) -> Self {
        self.max_load_per_phase = Field::Value(max_load);
        self
    }

    /// Sets the worker group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Sets the qualification level.
    pub fn with_qualification(mut self, level: f64) -> Self {
        self.qualification_level = Field::Value(level);
        self
    }

    /// Whether this worker holds a given skill (exact, case-sensitive).
    pub fn has_skill(&self, name: &str) -> bool {
        self.skill_list().iter().any(|s| s == name)
    }

    /// Skills, empty when missing or malformed.
    pub fn skill_list(&self) -> &[String] {
        self.skills.value().map(Vec::as_slice).unwrap_or_default()
    }

    /// Available slots, empty when missing or malformed.
    pub fn slots(&self) -> &[i64] {
        self.available_slots.value().map(Vec::as_slice).unwrap_or_default()
    }

    /// Rough capacity over the planning horizon:
    /// `MaxLoadPerPhase × max(slot count, 1)`; zero without a load limit.
    pub fn capacity(&self) -> f64 {
        let load = self.max_load_per_phase.value().copied().unwrap_or(0.0);
        load * self.slots().len().max(1) as f64
    }
}

impl Entity for Worker {
    const KIND: EntityKind = EntityKind::Worker;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn get(&self, field: CanonicalField) -> CellValue {
        match field {
            CanonicalField::WorkerId => text_cell(&self.id),
            CanonicalField::WorkerName => text_cell(&self.name),
            CanonicalField::Skills => self.skills.to_cell(),
            CanonicalField::AvailableSlots => self.available_slots.to_cell(),
            CanonicalField::MaxLoadPerPhase => self.max_load_per_phase.to_cell(),
            CanonicalField::WorkerGroup => text_cell(&self.group),
            CanonicalField::QualificationLevel => self.qualification_level.to_cell(),
            _ => CellValue::Null,
        }
    }

    fn set(&mut self, field: CanonicalField, value: CellValue) -> bool {
        match field {
            CanonicalField::WorkerId => self.id = text_from_cell(value),
            CanonicalField::WorkerName => self.name = text_from_cell(value),
            CanonicalField::Skills => self.skills = FromCell::from_cell(value),
            CanonicalField::AvailableSlots => self.available_slots = FromCell::from_cell(value),
            CanonicalField::MaxLoadPerPhase => {
                self.max_load_per_phase = FromCell::from_cell(value)
            }
            CanonicalField::WorkerGroup => self.group = text_from_cell(value),
            CanonicalField::QualificationLevel => {
                self.qualification_level = FromCell::from_cell(value)
            }
            _ => return false,
        }
        true
    }

    fn extras(&self) -> &Extras {
        &self.extras
    }

    fn extras_mut(&mut self) -> &mut Extras {
        &mut self.extras
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_builder() {
        let w = Worker::new("W1")
            .with_name("Dana")
            .with_skill("welding")
            .with_skill("painting")
            .with_slots([1, 2, 3])
            .with_max_load(2.0)
            .with_group("GroupB")
            .with_qualification(7.0);

        assert_eq!(w.id(), Some("W1"));
        assert!(w.has_skill("welding"));
        assert!(!w.has_skill("Welding"));
        assert_eq!(w.slots(), &[1, 2, 3]);
        assert!((w.capacity() - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_capacity_counts_at_least_one_slot() {
        let w = Worker::new("W1").with_max_load(3.0);
        assert!((w.capacity() - 3.0).abs() < 1e-10);

        let no_load = Worker::new("W2").with_slots([1, 2]);
        assert_eq!(no_load.capacity(), 0.0);
    }

    #[test]
    fn test_malformed_slots_are_kept_invalid() {
        let mut w = Worker::new("W1");
        w.set(CanonicalField::AvailableSlots, CellValue::Text("soon".into()));
        assert_eq!(w.available_slots, Field::Invalid(CellValue::Text("soon".into())));
        assert!(w.slots().is_empty());
    }
}
