//! Header reconciliation.
//!
//! # Algorithm
//!
//! 1. Visit canonical fields in schema order.
//! 2. For each field, score every unclaimed incoming header: 1.0 when the
//!    normalized header equals an alternative name, otherwise the best
//!    similarity against any alternative.
//! 3. Claim the best-scoring header only when its score is strictly above
//!    the threshold; the first header wins an exact tie.
//! 4. A claimed header is never offered to a later field.
//!
//! # Complexity
//! O(f * h * a) similarity evaluations for f fields, h headers, a alternatives.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::similarity::{normalize, similarity_normalized};
use crate::config::IntakeConfig;
use crate::schema::{CanonicalField, EntityKind};

/// One claimed header: the field, the header's position in the input row,
/// and the header text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedHeader {
    pub field: CanonicalField,
    pub index: usize,
    pub header: String,
}

/// Canonical field → chosen incoming header, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderMapping {
    entries: Vec<MappedHeader>,
}

impl HeaderMapping {
    /// Header chosen for `field`, if any.
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.header.as_str())
    }

    /// Input position of the header chosen for `field`, if any.
    pub fn index_of(&self, field: CanonicalField) -> Option<usize> {
        self.entries.iter().find(|e| e.field == field).map(|e| e.index)
    }

    /// Whether any field claimed a header with this text.
    pub fn is_claimed(&self, header: &str) -> bool {
        self.entries.iter().any(|e| e.header == header)
    }

    /// Whether any field claimed the header at input position `index`.
    pub fn is_claimed_at(&self, index: usize) -> bool {
        self.entries.iter().any(|e| e.index == index)
    }

    /// Iterates mapped pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        self.entries.iter().map(|e| (e.field, e.header.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of reconciling one file's headers against one entity kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderReconciliation {
    /// Entity kind the headers were reconciled against.
    pub kind: EntityKind,
    /// Canonical field → chosen header.
    pub mapping: HeaderMapping,
    /// Canonical fields no header was confident enough for, in schema order.
    pub unmapped_fields: Vec<CanonicalField>,
    /// Incoming headers no field claimed, in input order.
    pub passthrough_headers: Vec<String>,
}

impl HeaderReconciliation {
    /// Required fields left unmapped (missing-column conditions).
    pub fn missing_required(&self) -> Vec<CanonicalField> {
        self.kind
            .required_fields()
            .iter()
            .copied()
            .filter(|f| self.unmapped_fields.contains(f))
            .collect()
    }
}

/// Maps incoming headers onto canonical fields.
///
/// `table` lists each canonical field with its alternative names, in the
/// order fields should be resolved. Headers compete one-to-one: once a
/// field claims a header, no later field can.
pub fn map_headers<S, A>(
    headers: &[S],
    table: &[(CanonicalField, &[A])],
    threshold: f64,
) -> HeaderMapping
where
    S: AsRef<str>,
    A: AsRef<str>,
{
    let normalized: Vec<String> = headers.iter().map(|h| normalize(h.as_ref())).collect();
    let mut claimed = vec![false; headers.len()];
    let mut mapping = HeaderMapping::default();

    for (field, alternatives) in table {
        let alternatives: Vec<String> =
            alternatives.iter().map(|a| normalize(a.as_ref())).collect();

        let mut best: Option<(usize, f64)> = None;
        for (idx, header) in normalized.iter().enumerate() {
            if claimed[idx] {
                continue;
            }
            let score = score_header(header, &alternatives);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((idx, score));
            }
        }

        match best {
            Some((idx, score)) if score > threshold => {
                claimed[idx] = true;
                let header = headers[idx].as_ref().to_string();
                debug!(field = %field, header = %header, score, "Mapped header");
                mapping.entries.push(MappedHeader {
                    field: *field,
                    index: idx,
                    header,
                });
            }
            Some((idx, score)) => {
                debug!(
                    field = %field,
                    best = headers[idx].as_ref(),
                    score,
                    "No confident header match"
                );
            }
            None => {}
        }
    }

    mapping
}

fn score_header(header: &str, alternatives: &[String]) -> f64 {
    if alternatives.iter().any(|a| a == header) {
        return 1.0;
    }
    alternatives
        .iter()
        .map(|a| similarity_normalized(header, a))
        .fold(0.0, f64::max)
}

/// Alternatives table for an entity kind: the canonical name first,
/// then the field's alternative spellings.
pub fn alternatives_table(kind: EntityKind) -> Vec<(CanonicalField, Vec<&'static str>)> {
    kind.fields()
        .iter()
        .map(|&f| {
            let mut names = vec![f.name()];
            names.extend_from_slice(f.alternatives());
            (f, names)
        })
        .collect()
}

/// Header reconciliation with a configured threshold.
#[derive(Debug, Clone)]
pub struct HeaderMapper {
    threshold: f64,
}

impl Default for HeaderMapper {
    fn default() -> Self {
        Self::from_config(&IntakeConfig::default())
    }
}

impl HeaderMapper {
    /// Creates a mapper using the configured match threshold.
    pub fn from_config(config: &IntakeConfig) -> Self {
        Self {
            threshold: config.match_threshold,
        }
    }

    /// Reconciles raw headers against the schema of `kind`.
    pub fn reconcile<S: AsRef<str>>(&self, headers: &[S], kind: EntityKind) -> HeaderReconciliation {
        let owned = alternatives_table(kind);
        let table: Vec<(CanonicalField, &[&str])> =
            owned.iter().map(|(f, names)| (*f, names.as_slice())).collect();
        let mapping = map_headers(headers, &table, self.threshold);

        let unmapped_fields: Vec<CanonicalField> = kind
            .fields()
            .iter()
            .copied()
            .filter(|f| mapping.get(*f).is_none())
            .collect();
        let passthrough_headers: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| !mapping.is_claimed_at(*idx))
            .map(|(_, h)| h.as_ref().to_string())
            .collect();

        info!(
            kind = %kind,
            mapped = mapping.len(),
            unmapped = unmapped_fields.len(),
            passthrough = passthrough_headers.len(),
            "Reconciled headers"
        );

        HeaderReconciliation {
            kind,
            mapping,
            unmapped_fields,
            passthrough_headers,
        }
    }

    /// Picks the entity kind whose schema maps the most headers.
    ///
    /// Ties resolve in `Client, Worker, Task` order; `None` when no
    /// header maps to any kind.
    pub fn detect_kind<S: AsRef<str>>(&self, headers: &[S]) -> Option<EntityKind> {
        let mut best: Option<(EntityKind, usize)> = None;
        for kind in EntityKind::ALL {
            let mapped = self.reconcile(headers, kind).mapping.len();
            if mapped > 0 && best.map_or(true, |(_, n)| mapped > n) {
                best = Some((kind, mapped));
            }
        }
        best.map(|(kind, _)| kind)
    }
}

/// Reconciles headers with the default configuration.
pub fn reconcile_headers<S: AsRef<str>>(headers: &[S], kind: EntityKind) -> HeaderReconciliation {
    HeaderMapper::default().reconcile(headers, kind)
}

/// Detects the entity kind of a header row with the default configuration.
pub fn detect_kind<S: AsRef<str>>(headers: &[S]) -> Option<EntityKind> {
    HeaderMapper::default().detect_kind(headers)
}
