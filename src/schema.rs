//! Canonical schema for scheduling input tables.
//!
//! Three entity kinds (clients, workers, tasks) each own a fixed,
//! ordered list of canonical fields. The order matters: header
//! reconciliation visits fields in this order, so an earlier field
//! wins a header that two fields would both accept.
//!
//! Every field carries its coercion kind, resolved here once instead
//! of being re-derived from the field name on every cell.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Requesting party with a priority and requested tasks.
    Client,
    /// Resource holding skills and phase availability.
    Worker,
    /// Unit of work with duration and skill requirements.
    Task,
}

/// How a raw cell is converted for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionKind {
    /// Multi-valued string list (bracketed JSON array or comma separated).
    List,
    /// Embedded JSON object.
    JsonObject,
    /// Floating-point magnitude.
    Number,
    /// Integer phase/slot list.
    IntegerList,
    /// Trimmed text.
    Text,
}

/// A canonical field of the target schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalField {
    #[serde(rename = "ClientID")]
    ClientId,
    ClientName,
    PriorityLevel,
    #[serde(rename = "RequestedTaskIDs")]
    RequestedTaskIds,
    GroupTag,
    #[serde(rename = "AttributesJSON")]
    AttributesJson,
    #[serde(rename = "WorkerID")]
    WorkerId,
    WorkerName,
    Skills,
    AvailableSlots,
    MaxLoadPerPhase,
    WorkerGroup,
    QualificationLevel,
    #[serde(rename = "TaskID")]
    TaskId,
    TaskName,
    Category,
    Duration,
    RequiredSkills,
    PreferredPhases,
    MaxConcurrent,
}

use CanonicalField as F;

const CLIENT_FIELDS: &[CanonicalField] = &[
    F::ClientId,
    F::ClientName,
    F::PriorityLevel,
    F::RequestedTaskIds,
    F::GroupTag,
    F::AttributesJson,
];

const WORKER_FIELDS: &[CanonicalField] = &[
    F::WorkerId,
    F::WorkerName,
    F::Skills,
    F::AvailableSlots,
    F::MaxLoadPerPhase,
    F::WorkerGroup,
    F::QualificationLevel,
];

const TASK_FIELDS: &[CanonicalField] = &[
    F::TaskId,
    F::TaskName,
    F::Category,
    F::Duration,
    F::RequiredSkills,
    F::PreferredPhases,
    F::MaxConcurrent,
];

impl EntityKind {
    /// All kinds, in reporting order.
    pub const ALL: [EntityKind; 3] = [EntityKind::Client, EntityKind::Worker, EntityKind::Task];

    /// Collection key used in export documents ("clients", "workers", "tasks").
    pub fn collection_name(&self) -> &'static str {
        match self {
            Self::Client => "clients",
            Self::Worker => "workers",
            Self::Task => "tasks",
        }
    }

    /// Canonical fields in schema order.
    pub fn fields(&self) -> &'static [CanonicalField] {
        match self {
            Self::Client => CLIENT_FIELDS,
            Self::Worker => WORKER_FIELDS,
            Self::Task => TASK_FIELDS,
        }
    }

    /// The unique-key field.
    pub fn id_field(&self) -> CanonicalField {
        match self {
            Self::Client => F::ClientId,
            Self::Worker => F::WorkerId,
            Self::Task => F::TaskId,
        }
    }

    /// The display-name field.
    pub fn name_field(&self) -> CanonicalField {
        match self {
            Self::Client => F::ClientName,
            Self::Worker => F::WorkerName,
            Self::Task => F::TaskName,
        }
    }

    /// Fields whose absence is a structural error.
    pub fn required_fields(&self) -> &'static [CanonicalField] {
        match self {
            Self::Client => &[F::ClientId, F::ClientName, F::PriorityLevel],
            Self::Worker => &[
                F::WorkerId,
                F::WorkerName,
                F::Skills,
                F::AvailableSlots,
                F::MaxLoadPerPhase,
            ],
            Self::Task => &[F::TaskId, F::TaskName, F::Duration],
        }
    }

    /// Guesses the kind from an uploaded file name (`clients.csv`, `Worker_Data.xlsx`).
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem = name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(name)
            .to_lowercase();
        if stem.contains("client") {
            Some(Self::Client)
        } else if stem.contains("worker") {
            Some(Self::Worker)
        } else if stem.contains("task") {
            Some(Self::Task)
        } else {
            None
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection_name())
    }
}

impl CanonicalField {
    /// Canonical column name as it appears in the target schema.
    pub fn name(&self) -> &'static str {
        match self {
            F::ClientId => "ClientID",
            F::ClientName => "ClientName",
            F::PriorityLevel => "PriorityLevel",
            F::RequestedTaskIds => "RequestedTaskIDs",
            F::GroupTag => "GroupTag",
            F::AttributesJson => "AttributesJSON",
            F::WorkerId => "WorkerID",
            F::WorkerName => "WorkerName",
            F::Skills => "Skills",
            F::AvailableSlots => "AvailableSlots",
            F::MaxLoadPerPhase => "MaxLoadPerPhase",
            F::WorkerGroup => "WorkerGroup",
            F::QualificationLevel => "QualificationLevel",
            F::TaskId => "TaskID",
            F::TaskName => "TaskName",
            F::Category => "Category",
            F::Duration => "Duration",
            F::RequiredSkills => "RequiredSkills",
            F::PreferredPhases => "PreferredPhases",
            F::MaxConcurrent => "MaxConcurrent",
        }
    }

    /// Looks up a field by its canonical column name (exact match).
    pub fn from_name(name: &str) -> Option<Self> {
        EntityKind::ALL
            .iter()
            .flat_map(|k| k.fields())
            .copied()
            .find(|f| f.name() == name)
    }

    /// Entity kind owning this field.
    pub fn kind(&self) -> EntityKind {
        match self {
            F::ClientId
            | F::ClientName
            | F::PriorityLevel
            | F::RequestedTaskIds
            | F::GroupTag
            | F::AttributesJson => EntityKind::Client,
            F::WorkerId
            | F::WorkerName
            | F::Skills
            | F::AvailableSlots
            | F::MaxLoadPerPhase
            | F::WorkerGroup
            | F::QualificationLevel => EntityKind::Worker,
            F::TaskId
            | F::TaskName
            | F::Category
            | F::Duration
            | F::RequiredSkills
            | F::PreferredPhases
            | F::MaxConcurrent => EntityKind::Task,
        }
    }

    /// Coercion applied to raw cells of this field.
    pub fn coercion(&self) -> CoercionKind {
        match self {
            F::RequestedTaskIds | F::Skills | F::RequiredSkills => CoercionKind::List,
            F::AttributesJson => CoercionKind::JsonObject,
            F::PriorityLevel
            | F::MaxLoadPerPhase
            | F::QualificationLevel
            | F::Duration
            | F::MaxConcurrent => CoercionKind::Number,
            F::AvailableSlots | F::PreferredPhases => CoercionKind::IntegerList,
            _ => CoercionKind::Text,
        }
    }

    /// Alternative header spellings, already in normalized form
    /// (lowercase alphanumerics).
    ///
    /// ID spellings stay compound and short: a bare `id` or entity word
    /// would score containment against every name or ID-list column, and
    /// ID fields are resolved before name fields.
    pub fn alternatives(&self) -> &'static [&'static str] {
        match self {
            F::ClientId => &["clientid", "custid", "clientref"],
            F::ClientName => &["clientname", "name", "customername", "client", "fullname"],
            F::PriorityLevel => &["prioritylevel", "priority", "prio", "level", "importance"],
            F::RequestedTaskIds => &[
                "requestedtaskids",
                "requestedtasks",
                "taskids",
                "tasks",
                "requested",
                "taskrequests",
            ],
            F::GroupTag => &["grouptag", "group", "tag", "clientgroup", "segment"],
            F::AttributesJson => &[
                "attributesjson",
                "attributes",
                "metadata",
                "meta",
                "json",
                "properties",
            ],
            F::WorkerId => &["workerid", "empid", "staffid"],
            F::WorkerName => &["workername", "name", "employeename", "staffname", "fullname"],
            F::Skills => &["skills", "skill", "skillset", "abilities", "competencies"],
            F::AvailableSlots => &[
                "availableslots",
                "slots",
                "availability",
                "available",
                "availablephases",
                "phases",
            ],
            F::MaxLoadPerPhase => &[
                "maxloadperphase",
                "maxload",
                "load",
                "capacity",
                "loadlimit",
            ],
            F::WorkerGroup => &["workergroup", "group", "team", "department"],
            F::QualificationLevel => &[
                "qualificationlevel",
                "qualification",
                "level",
                "grade",
                "seniority",
            ],
            F::TaskId => &["taskid", "jobid", "taskref"],
            F::TaskName => &["taskname", "name", "title", "jobname", "description"],
            F::Category => &["category", "type", "kind", "taskcategory"],
            F::Duration => &["duration", "length", "phasesneeded", "time", "span"],
            F::RequiredSkills => &[
                "requiredskills",
                "skills",
                "skillsrequired",
                "requirements",
                "needs",
            ],
            F::PreferredPhases => &[
                "preferredphases",
                "phases",
                "preferred",
                "phasewindow",
                "window",
            ],
            F::MaxConcurrent => &[
                "maxconcurrent",
                "concurrent",
                "concurrency",
                "parallel",
                "maxparallel",
            ],
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
