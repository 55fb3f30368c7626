//! The contract between the binder and the types it fills in.
//!
//! A binding target implements [`Bindable`]: it publishes its
//! descriptor table and accepts coerced values by field index. The
//! trait is object safe so nested groups can be reached through
//! `&mut dyn Bindable` without the binder knowing the concrete type.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use crate::coerce::ScalarValue;
use crate::descriptor::FieldDescriptor;

/// Why an [`assign`](Bindable::assign) call was rejected.
#[derive(Debug, Error)]
pub enum AssignError {
    /// The delivered value shape (scalar vs array vs document) does
    /// not match the field.
    #[error("value shape does not match the field")]
    Shape,
    /// The scalar carried a different kind than the field stores.
    #[error("scalar kind does not match the field type")]
    Kind,
    /// Deserializing a body document failed.
    #[error("{0}")]
    Document(#[from] serde_json::Error),
}

/// A value ready to be stored into a field.
///
/// Scalars and arrays arrive already coerced. Body documents arrive as
/// the raw JSON text so the implementation can deserialize straight
/// into its own typed shape via [`BoundValue::document`].
#[derive(Debug)]
pub enum BoundValue<'a> {
    /// One coerced scalar.
    Scalar(ScalarValue),
    /// Coerced elements of a comma-separated list.
    Array(Vec<ScalarValue>),
    /// Raw JSON text of the request body.
    Document(&'a str),
}

impl BoundValue<'_> {
    /// Unwraps the scalar variant.
    pub fn scalar(self) -> Result<ScalarValue, AssignError> {
        match self {
            Self::Scalar(value) => Ok(value),
            _ => Err(AssignError::Shape),
        }
    }

    /// Unwraps the scalar variant and converts it to a concrete type.
    pub fn scalar_into<T>(self) -> Result<T, AssignError>
    where
        T: TryFrom<ScalarValue, Error = AssignError>,
    {
        T::try_from(self.scalar()?)
    }

    /// Unwraps the array variant, converting every element.
    pub fn array_into<T>(self) -> Result<Vec<T>, AssignError>
    where
        T: TryFrom<ScalarValue, Error = AssignError>,
    {
        match self {
            Self::Array(values) => values.into_iter().map(T::try_from).collect(),
            _ => Err(AssignError::Shape),
        }
    }

    /// Deserializes a body document into the implementation's shape.
    pub fn document<T: DeserializeOwned>(self) -> Result<T, AssignError> {
        match self {
            Self::Document(text) => Ok(serde_json::from_str(text)?),
            _ => Err(AssignError::Shape),
        }
    }
}

macro_rules! scalar_try_from {
    ($target:ty, $variant:ident) => {
        impl TryFrom<ScalarValue> for $target {
            type Error = AssignError;

            fn try_from(value: ScalarValue) -> Result<Self, AssignError> {
                match value {
                    ScalarValue::$variant(inner) => Ok(inner),
                    _ => Err(AssignError::Kind),
                }
            }
        }
    };
}

scalar_try_from!(String, Text);
scalar_try_from!(Uuid, Uuid);
scalar_try_from!(char, Char);
scalar_try_from!(u8, Byte);
scalar_try_from!(i16, Int16);
scalar_try_from!(i32, Int32);
scalar_try_from!(i64, Int64);
scalar_try_from!(f64, Double);

impl TryFrom<ScalarValue> for NaiveDateTime {
    type Error = AssignError;

    fn try_from(value: ScalarValue) -> Result<Self, AssignError> {
        match value {
            ScalarValue::DateTime(stamp, _) => Ok(stamp),
            _ => Err(AssignError::Kind),
        }
    }
}

impl TryFrom<ScalarValue> for DateTime<Utc> {
    type Error = AssignError;

    fn try_from(value: ScalarValue) -> Result<Self, AssignError> {
        match value {
            ScalarValue::DateTime(stamp, _) => Ok(stamp.and_utc()),
            _ => Err(AssignError::Kind),
        }
    }
}

impl ScalarValue {
    /// Returns the table index of an enum scalar.
    pub fn enum_index(self) -> Result<usize, AssignError> {
        match self {
            Self::Enum(index) => Ok(index),
            _ => Err(AssignError::Kind),
        }
    }
}

/// A type the binder can populate from a request.
///
/// Implementations are plain data structs. `assign` receives the index
/// of the field inside [`descriptors`](Bindable::descriptors) together
/// with the ready value; `group_mut` exposes nested groups so their
/// fields join the same binding pass.
pub trait Bindable: Send {
    /// The static descriptor table for this type.
    fn descriptors(&self) -> &'static [FieldDescriptor];

    /// Stores a bound value into the field at `field`.
    fn assign(&mut self, field: usize, value: BoundValue<'_>) -> Result<(), AssignError>;

    /// Mutable access to a nested group field, if `field` is one.
    fn group_mut(&mut self, _field: usize) -> Option<&mut dyn Bindable> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::DateKind;
    use serde::Deserialize;

    #[test]
    fn test_scalar_into_matches_kind() {
        let value = BoundValue::Scalar(ScalarValue::Int32(7));
        let n: i32 = value.scalar_into().unwrap();
        assert_eq!(n, 7);

        let value = BoundValue::Scalar(ScalarValue::Int32(7));
        assert!(value.scalar_into::<i64>().is_err());
    }

    #[test]
    fn test_array_into() {
        let value = BoundValue::Array(vec![ScalarValue::Int32(1), ScalarValue::Int32(2)]);
        let items: Vec<i32> = value.array_into().unwrap();
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn test_date_time_conversions() {
        let stamp = chrono::NaiveDate::from_ymd_opt(2021, 5, 4)
            .unwrap()
            .and_hms_opt(1, 2, 3)
            .unwrap();
        let value = BoundValue::Scalar(ScalarValue::DateTime(stamp, DateKind::Utc));
        let utc: DateTime<Utc> = value.scalar_into().unwrap();
        assert_eq!(utc, stamp.and_utc());
    }

    #[test]
    fn test_document_deserializes() {
        #[derive(Deserialize)]
        struct Doc {
            name: String,
        }

        let value = BoundValue::Document(r#"{"name":"zork"}"#);
        let doc: Doc = value.document().unwrap();
        assert_eq!(doc.name, "zork");
    }

    #[test]
    fn test_shape_mismatch() {
        let value = BoundValue::Scalar(ScalarValue::Int32(1));
        assert!(matches!(
            value.array_into::<i32>().unwrap_err(),
            AssignError::Shape
        ));
    }
}
