//! Metadata-driven request binding.
//!
//! This crate turns one buffered HTTP request into one populated
//! parameter struct, reporting every problem at once instead of
//! failing on the first. Binding is driven entirely by static
//! [`FieldDescriptor`] tables, so a type's full schema is inspectable
//! before any request arrives.
//!
//! # Pipeline
//!
//! | Stage | Type |
//! |---|---|
//! | request access | [`RequestSource`], [`BufferedRequest`] |
//! | schema | [`FieldDescriptor`], [`FieldKind`], [`DocumentShape`] |
//! | coercion | [`coerce`], [`ScalarKind`], [`ScalarValue`] |
//! | population | [`Bindable`], [`BoundValue`] |
//! | driver | [`bind`], [`BindError`], [`BindFailure`] |
//!
//! # Example
//!
//! ```
//! use gantry_bind::{
//!     bind, AssignError, Bindable, BoundValue, BufferedRequest, FieldDescriptor, ScalarKind,
//! };
//!
//! #[derive(Default)]
//! struct ListParams {
//!     name: Option<String>,
//!     limit: i32,
//! }
//!
//! static LIST_FIELDS: [FieldDescriptor; 2] = [
//!     FieldDescriptor::query("Name", ScalarKind::Text).required(),
//!     FieldDescriptor::query("Limit", ScalarKind::Int32),
//! ];
//!
//! impl Bindable for ListParams {
//!     fn descriptors(&self) -> &'static [FieldDescriptor] {
//!         &LIST_FIELDS
//!     }
//!
//!     fn assign(&mut self, field: usize, value: BoundValue<'_>) -> Result<(), AssignError> {
//!         match field {
//!             0 => self.name = Some(value.scalar_into()?),
//!             1 => self.limit = value.scalar_into()?,
//!             _ => return Err(AssignError::Shape),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let request = BufferedRequest::builder()
//!     .path("/list")
//!     .query_pair("name", "rocket")
//!     .query_pair("limit", "25")
//!     .build();
//!
//! let params: ListParams = bind(&request).unwrap();
//! assert_eq!(params.name.as_deref(), Some("rocket"));
//! assert_eq!(params.limit, 25);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bindable;
mod binder;
mod coerce;
mod descriptor;
mod source;
mod standard;

pub use bindable::{AssignError, Bindable, BoundValue};
pub use binder::{bind, BindError, BindFailure, Problem, SchemaError};
pub use coerce::{coerce, CoerceError, DateKind, EnumTable, ScalarKind, ScalarValue};
pub use descriptor::{DocumentShape, FieldDescriptor, FieldKind, ParameterSource};
pub use source::{BufferedRequest, BufferedRequestBuilder, RequestSource};
pub use standard::StandardQuery;
