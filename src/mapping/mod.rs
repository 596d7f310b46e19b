//! Header reconciliation: fuzzy matching of incoming column names onto
//! canonical fields.
//!
//! # Usage
//!
//! ```
//! use u_intake::mapping::reconcile_headers;
//! use u_intake::schema::{CanonicalField, EntityKind};
//!
//! let result = reconcile_headers(&["client_id", "Name", "priority"], EntityKind::Client);
//! assert_eq!(result.mapping.get(CanonicalField::ClientId), Some("client_id"));
//! ```

mod mapper;
mod similarity;

pub use mapper::{
    alternatives_table, detect_kind, map_headers, reconcile_headers, HeaderMapper, HeaderMapping,
    HeaderReconciliation, MappedHeader,
};
pub use similarity::{normalize, similarity, CONTAINMENT_SCORE};
