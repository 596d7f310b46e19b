//! Intake domain models.
//!
//! Typed records for the three entity kinds, the cell/field value types
//! they are built from, and the collection wrappers handed to the
//! validator.
//!
//! # Domain Mappings
//!
//! | u-intake | Staffing | Manufacturing | Services |
//! |----------|----------|---------------|----------|
//! | Client | Account | Order Owner | Customer |
//! | Worker | Employee | Machine/Operator | Consultant |
//! | Task | Shift Duty | Operation | Engagement |

mod cell;
mod client;
mod extras;
mod records;
mod task;
mod worker;

pub use cell::{CellValue, Field, FromCell, IntoCell};
pub use client::Client;
pub use extras::Extras;
pub use records::{Dataset, Records};
pub use task::Task;
pub use worker::Worker;

use crate::schema::{CanonicalField, EntityKind};

/// Shared surface of the three typed record kinds.
pub trait Entity: Clone + Default {
    /// Kind tag of this record type.
    const KIND: EntityKind;

    /// Unique identifier, if present.
    fn id(&self) -> Option<&str>;

    /// Display name, if present.
    fn name(&self) -> Option<&str>;

    /// Reads a canonical field as a cell value (`Null` for fields of other kinds).
    fn get(&self, field: CanonicalField) -> CellValue;

    /// Writes a canonical field from a cell value.
    ///
    /// Returns `false` (and leaves the record untouched) when the field
    /// belongs to another entity kind.
    fn set(&mut self, field: CanonicalField, value: CellValue) -> bool;

    /// Passthrough columns.
    fn extras(&self) -> &Extras;

    /// Mutable passthrough columns.
    fn extras_mut(&mut self) -> &mut Extras;
}
