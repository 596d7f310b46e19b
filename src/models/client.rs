//! Client model.
//!
//! A client requests tasks and carries a priority level used to rank
//! competing requests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::cell::{text_from_cell, CellValue, Field, FromCell};
use super::{Entity, Extras};
use crate::schema::{CanonicalField, EntityKind};

/// A client record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Unique client identifier.
    #[serde(rename = "ClientID", default)]
    pub id: Option<String>,
    /// Display name.
    #[serde(rename = "ClientName", default)]
    pub name: Option<String>,
    /// Priority level, 1 (lowest) to 5 (highest).
    #[serde(rename = "PriorityLevel", default)]
    pub priority_level: Field<f64>,
    /// Task IDs requested by this client, in request order.
    #[serde(rename = "RequestedTaskIDs", default)]
    pub requested_task_ids: Field<Vec<String>>,
    /// Group tag (open enum).
    #[serde(rename = "GroupTag", default)]
    pub group_tag: Option<String>,
    /// Free-form attributes parsed from embedded JSON.
    #[serde(rename = "AttributesJSON", default)]
    pub attributes: Field<Map<String, Value>>,
    /// Unmapped columns.
    #[serde(flatten)]
    pub extras: Extras,
}

impl Client {
    /// Creates a new client with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Sets the client name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the priority level.
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority_level = Field::Value(priority);
        self
    }

    /// Sets the requested task IDs.
    pub fn with_requested_tasks<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requested_task_ids = Field::Value(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the group tag.
    pub fn with_group(mut self, tag: impl Into<String>) -> Self {
        self.group_tag = Some(tag.into());
        self
    }

    /// Sets one attribute key.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut map = match self.attributes {
            Field::Value(map) => map,
            _ => Map::new(),
        };
        map.insert(key.into(), value.into());
        self.attributes = Field::Value(map);
        self
    }

    /// Requested task IDs, empty when missing or malformed.
    pub fn requested_tasks(&self) -> &[String] {
        self.requested_task_ids.value().map(Vec::as_slice).unwrap_or_default()
    }
}

impl Entity for Client {
    const KIND: EntityKind = EntityKind::Client;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn get(&self, field: CanonicalField) -> CellValue {
        match field {
            CanonicalField::ClientId => text_cell(&self.id),
            CanonicalField::ClientName => text_cell(&self.name),
            CanonicalField::PriorityLevel => self.priority_level.to_cell(),
            CanonicalField::RequestedTaskIds => self.requested_task_ids.to_cell(),
            CanonicalField::GroupTag => text_cell(&self.group_tag),
            CanonicalField::AttributesJson => self.attributes.to_cell(),
            _ => CellValue::Null,
        }
    }

    fn set(&mut self, field: CanonicalField, value: CellValue) -> bool {
        match field {
            CanonicalField::ClientId => self.id = text_from_cell(value),
            CanonicalField::ClientName => self.name = text_from_cell(value),
            CanonicalField::PriorityLevel => self.priority_level = FromCell::from_cell(value),
            CanonicalField::RequestedTaskIds => {
                self.requested_task_ids = FromCell::from_cell(value)
            }
            CanonicalField::GroupTag => self.group_tag = text_from_cell(value),
            CanonicalField::AttributesJson => self.attributes = FromCell::from_cell(value),
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

pub(crate) fn text_cell(value: &Option<String>) -> CellValue {
    value
        .as_ref()
        .map_or(CellValue::Null, |s| CellValue::Text(s.clone()))
}
