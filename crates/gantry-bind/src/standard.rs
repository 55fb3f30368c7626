//! Stock paging and filtering parameters.
//!
//! Most listing endpoints accept the same handful of query controls.
//! [`StandardQuery`] packages them as a ready-made group: embed it in
//! a binding target, expose it through `group_mut`, and `$Top`,
//! `$Skip`, `$Count`, `$OrderBy`, `Filter`, and the UTC time window
//! all bind alongside the endpoint's own fields.

use chrono::{DateTime, Duration, Utc};

use crate::bindable::{AssignError, Bindable, BoundValue};
use crate::coerce::{DateKind, EnumTable, ScalarKind};
use crate::descriptor::FieldDescriptor;

const BOOLEANS: EnumTable = EnumTable {
    type_name: "Boolean",
    variants: &["False", "True"],
};

const STANDARD_QUERY_FIELDS: [FieldDescriptor; 7] = [
    FieldDescriptor::query("Top", ScalarKind::Int32).renamed("$Top"),
    FieldDescriptor::query("Skip", ScalarKind::Int32).renamed("$Skip"),
    FieldDescriptor::query("Count", ScalarKind::Enum(&BOOLEANS)).renamed("$Count"),
    FieldDescriptor::query_array("OrderBy", ScalarKind::Text).renamed("$OrderBy"),
    FieldDescriptor::query("Filter", ScalarKind::Text),
    FieldDescriptor::query("StartTimeUtc", ScalarKind::DateTime(DateKind::Utc)),
    FieldDescriptor::query("EndTimeUtc", ScalarKind::DateTime(DateKind::Utc)),
];

/// Common listing controls, with sensible defaults.
///
/// Defaults: page size 100 from offset 0, no count, no ordering, no
/// filter, and a time window covering the last 30 days.
#[derive(Debug, Clone)]
pub struct StandardQuery {
    /// Maximum number of items to return (`$Top`).
    pub top: i32,
    /// Number of items to skip (`$Skip`).
    pub skip: i32,
    /// Whether to return a total count instead of items (`$Count`).
    pub count: bool,
    /// Ordering clauses (`$OrderBy`), comma-separated on the wire.
    pub order_by: Vec<String>,
    /// Free-form filter expression.
    pub filter: Option<String>,
    /// Window start, inclusive.
    pub start_time_utc: DateTime<Utc>,
    /// Window end, inclusive.
    pub end_time_utc: DateTime<Utc>,
}

impl Default for StandardQuery {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            top: 100,
            skip: 0,
            count: false,
            order_by: Vec::new(),
            filter: None,
            start_time_utc: now - Duration::days(30),
            end_time_utc: now,
        }
    }
}

impl Bindable for StandardQuery {
    fn descriptors(&self) -> &'static [FieldDescriptor] {
        &STANDARD_QUERY_FIELDS
    }

    fn assign(&mut self, field: usize, value: BoundValue<'_>) -> Result<(), AssignError> {
        match field {
            0 => self.top = value.scalar_into()?,
            1 => self.skip = value.scalar_into()?,
            2 => self.count = value.scalar()?.enum_index()? == 1,
            3 => self.order_by = value.array_into()?,
            4 => self.filter = Some(value.scalar_into()?),
            5 => self.start_time_utc = value.scalar_into()?,
            6 => self.end_time_utc = value.scalar_into()?,
            _ => return Err(AssignError::Shape),
        }
        Ok(())
    }
}

impl StandardQuery {
    /// Descriptor table for embedding as a group field.
    ///
    /// ```
    /// use gantry_bind::{FieldDescriptor, StandardQuery};
    ///
    /// static FIELDS: [FieldDescriptor; 1] =
    ///     [FieldDescriptor::group("Query", StandardQuery::fields())];
    /// ```
    #[must_use]
    pub const fn fields() -> &'static [FieldDescriptor] {
        &STANDARD_QUERY_FIELDS
    }
}
