//! Task model.
//!
//! A task is a unit of work requested by clients. It lasts a number of
//! phases, needs a set of skills, and may prefer specific phases.

use serde::{Deserialize, Serialize};

use super::cell::{text_from_cell, CellValue, Field, FromCell};
use super::client::text_cell;
use super::{Entity, Extras};
use crate::schema::{CanonicalField, EntityKind};

/// A task record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    #[serde(rename = "TaskID", default)]
    pub id: Option<String>,
    /// Human-readable name.
    #[serde(rename = "TaskName", default)]
    pub name: Option<String>,
    /// Task category (for grouping).
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    /// Duration in phases.
    #[serde(rename = "Duration", default)]
    pub duration: Field<f64>,
    /// Skills a worker needs to take this task.
    #[serde(rename = "RequiredSkills", default)]
    pub required_skills: Field<Vec<String>>,
    /// Phases the task should run in (1-based).
    #[serde(rename = "PreferredPhases", default)]
    pub preferred_phases: Field<Vec<i64>>,
    /// Maximum number of workers on this task at once.
    #[serde(rename = "MaxConcurrent", default)]
    pub max_concurrent: Field<f64>,
    /// Unmapped columns.
    #[serde(flatten)]
    pub extras: Extras,
}

impl Task {
    /// Creates a new task with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Sets the task name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the task category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the duration in phases.
    pub fn with_duration(mut self, phases: f64) -> Self {
        self.duration = Field::Value(phases);
        self
    }

    /// Adds a required skill.
    pub fn with_required_skill(mut self, skill: impl Into<String>) -> Self {
        let mut skills = match self.required_skills {
            Field::Value(skills) => skills,
            _ => Vec::new(),
        };
        skills.push(skill.into());
        self.required_skills = Field::Value(skills);
        self
    }

    /// Sets the preferred phases.
    pub fn with_preferred_phases(mut self, phases: impl IntoIterator<Item = i64>) -> Self {
        self.preferred_phases = Field::Value(phases.into_iter().collect());
        self
    }

    /// Sets the concurrency limit.
    pub fn with_max_concurrent(mut self, max: f64) -> Self {
        self.max_concurrent = Field::Value(max);
        self
    }

    /// Required skills, empty when missing or malformed.
    pub fn skills_needed(&self) -> &[String] {
        self.required_skills.value().map(Vec::as_slice).unwrap_or_default()
    }

    /// Preferred phases, empty when missing or malformed.
    pub fn phases(&self) -> &[i64] {
        self.preferred_phases.value().map(Vec::as_slice).unwrap_or_default()
    }
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn get(&self, field: CanonicalField) -> CellValue {
        match field {
            CanonicalField::TaskId => text_cell(&self.id),
            CanonicalField::TaskName => text_cell(&self.name),
            CanonicalField::Category => text_cell(&self.category),
            CanonicalField::Duration => self.duration.to_cell(),
            CanonicalField::RequiredSkills => self.required_skills.to_cell(),
            CanonicalField::PreferredPhases => self.preferred_phases.to_cell(),
            CanonicalField::MaxConcurrent => self.max_concurrent.to_cell(),
            _ => CellValue::Null,
        }
    }

    fn set(&mut self, field: CanonicalField, value: CellValue) -> bool {
        match field {
            CanonicalField::TaskId => self.id = text_from_cell(value),
            CanonicalField::TaskName => self.name = text_from_cell(value),
            CanonicalField::Category => self.category = text_from_cell(value),
            CanonicalField::Duration => self.duration = FromCell::from_cell(value),
            CanonicalField::RequiredSkills => self.required_skills = FromCell::from_cell(value),
            CanonicalField::PreferredPhases => {
                self.preferred_phases = FromCell::from_cell(value)
            }
            CanonicalField::MaxConcurrent => self.max_concurrent = FromCell::from_cell(value),
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
