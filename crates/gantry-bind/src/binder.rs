//! The binder: one pass from request to populated target.
//!
//! [`bind`] partitions the target's descriptor table by source, walks
//! the request's query pairs, headers, and body against it, and either
//! returns the populated value or every problem it found, in discovery
//! order. Nothing short-circuits; a request with three bad parameters
//! reports three lines.
//!
//! Problem lines have a fixed shape. Clients parse them, so the text
//! is part of the contract:
//!
//! | Problem | Line |
//! |---|---|
//! | coercion or prefix failure | `Error on (<TypeName>) property '<Field>': <detail>` |
//! | required never satisfied | `Missing required parameter '<Field>'` |
//! | unmatched query pair | `Unknown URI parameter: '<name>'` |
//! | body absent | `The POST body response is missing` |
//! | array item incomplete | `Item <N>: missing required parameter '<Field>'` |

use std::fmt;

use thiserror::Error;

use crate::bindable::{Bindable, BoundValue};
use crate::coerce::coerce;
use crate::descriptor::{DocumentShape, FieldDescriptor, FieldKind, ParameterSource};
use crate::source::RequestSource;

/// One problem discovered while binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// A value arrived for the field but could not be applied.
    Field {
        /// Wire-facing type name of the field.
        type_name: &'static str,
        /// External field name.
        field: &'static str,
        /// Kind-specific detail text.
        detail: String,
    },
    /// A required field never received a value.
    MissingRequired {
        /// External field name.
        field: &'static str,
    },
    /// A query pair matched no field.
    Unknown {
        /// The pair's name, as it appeared on the wire.
        name: String,
    },
    /// A body field was declared but the request carried no body.
    MissingBody,
    /// An element of a body array lacks a required field.
    ItemMissingRequired {
        /// One-based position of the element.
        item: usize,
        /// External field name.
        field: &'static str,
    },
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field {
                type_name,
                field,
                detail,
            } => write!(f, "Error on ({type_name}) property '{field}': {detail}"),
            Self::MissingRequired { field } => {
                write!(f, "Missing required parameter '{field}'")
            }
            Self::Unknown { name } => write!(f, "Unknown URI parameter: '{name}'"),
            Self::MissingBody => write!(f, "The POST body response is missing"),
            Self::ItemMissingRequired { item, field } => {
                write!(f, "Item {item}: missing required parameter '{field}'")
            }
        }
    }
}

/// Every problem from one binding pass, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindFailure {
    problems: Vec<Problem>,
}

impl BindFailure {
    /// The individual problems.
    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }
}

impl fmt::Display for BindFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, problem) in self.problems.iter().enumerate() {
            if position > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{problem}")?;
        }
        Ok(())
    }
}

/// A flaw in the target's descriptor table itself, independent of any
/// request. Surfacing it as a distinct variant keeps configuration
/// mistakes from masquerading as caller errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// More than one field claims the request body.
    #[error("only one parameter may come from the body; body parameters: {names}")]
    MultipleBodyFields {
        /// Comma-joined external names of the offending fields.
        names: String,
    },
}

/// Why [`bind`] failed.
#[derive(Debug, Error)]
pub enum BindError {
    /// The request did not satisfy the target's contract.
    #[error("{0}")]
    Parameters(BindFailure),
    /// The target's own descriptor table is invalid.
    #[error("{0}")]
    Schema(SchemaError),
}

struct BindState<'r> {
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<&'r str>,
    required: Vec<&'static FieldDescriptor>,
    problems: Vec<Problem>,
}

/// Binds a request onto a fresh `T`.
///
/// The pass never stops early: every query pair, header, and body
/// check runs, and the returned [`BindFailure`] carries all problems
/// in the order they were found. Query pairs that match no field
/// become `Unknown URI parameter` problems; headers that match no
/// field are ignored.
///
/// # Errors
///
/// [`BindError::Schema`] if the descriptor table declares more than
/// one body field, [`BindError::Parameters`] if the request did not
/// satisfy the table.
pub fn bind<T>(request: &dyn RequestSource) -> Result<T, BindError>
where
    T: Bindable + Default,
{
    let mut output = T::default();
    check_body_arity(output.descriptors())?;

    let mut state = BindState {
        query: request.query_pairs().to_vec(),
        headers: request.header_pairs().to_vec(),
        body: request.body_text(),
        required: Vec::new(),
        problems: Vec::new(),
    };

    walk(&mut output, &mut state);

    let leftover_query = std::mem::take(&mut state.query);
    for (name, _) in leftover_query {
        state.problems.push(Problem::Unknown { name });
    }
    for field in &state.required {
        state.problems.push(Problem::MissingRequired {
            field: field.public_name(),
        });
    }

    if state.problems.is_empty() {
        Ok(output)
    } else {
        Err(BindError::Parameters(BindFailure {
            problems: state.problems,
        }))
    }
}

fn check_body_arity(fields: &'static [FieldDescriptor]) -> Result<(), BindError> {
    let mut names = Vec::new();
    collect_body_fields(fields, &mut names);
    if names.len() > 1 {
        return Err(BindError::Schema(SchemaError::MultipleBodyFields {
            names: names.join(", "),
        }));
    }
    Ok(())
}

fn collect_body_fields(fields: &'static [FieldDescriptor], names: &mut Vec<&'static str>) {
    for field in fields {
        if field.ignore {
            continue;
        }
        match field.kind {
            FieldKind::Group(children) => collect_body_fields(children, names),
            _ if field.source == ParameterSource::Body => names.push(field.public_name()),
            _ => {}
        }
    }
}

fn walk(target: &mut dyn Bindable, state: &mut BindState<'_>) {
    let fields = target.descriptors();

    let mut query_fields = Vec::new();
    let mut header_fields = Vec::new();
    let mut body_field = None;

    for (index, field) in fields.iter().enumerate() {
        if field.ignore {
            continue;
        }
        if let FieldKind::Group(_) = field.kind {
            if let Some(child) = target.group_mut(index) {
                walk(child, state);
            }
            continue;
        }
        if field.required {
            state.required.push(field);
        }
        match field.source {
            ParameterSource::Query => query_fields.push(index),
            ParameterSource::Header => header_fields.push(index),
            ParameterSource::Body => body_field = Some(index),
        }
    }

    // Query pass: the first matching field wins and consumes the
    // pair. The field stays available so a later duplicate pair
    // overwrites the earlier value. Unconsumed pairs return to the
    // pool for the top-level unknown-parameter sweep.
    let pending = std::mem::take(&mut state.query);
    for (name, value) in pending {
        let mut consumed = false;
        for &index in &query_fields {
            if digest(target, &fields[index], index, &name, &value, None, state) {
                consumed = true;
                break;
            }
        }
        if !consumed {
            state.query.push((name, value));
        }
    }

    // Header pass: a match consumes the field rather than the pair,
    // and unmatched headers are never an error. Prefix enforcement
    // only applies here.
    let headers = state.headers.clone();
    for (name, value) in &headers {
        let mut matched = None;
        for (slot, &index) in header_fields.iter().enumerate() {
            let field = &fields[index];
            if digest(target, field, index, name, value, field.strip_prefix, state) {
                matched = Some(slot);
                break;
            }
        }
        if let Some(slot) = matched {
            header_fields.remove(slot);
        }
    }

    if let Some(index) = body_field {
        bind_body(target, &fields[index], index, state);
    }
}

/// Tries one field against one name/value pair. Returns true when the
/// name matched, whether or not the value applied cleanly.
fn digest(
    target: &mut dyn Bindable,
    field: &'static FieldDescriptor,
    index: usize,
    name: &str,
    value: &str,
    prefix: Option<&'static str>,
    state: &mut BindState<'_>,
) -> bool {
    if !field.matches(name) {
        return false;
    }

    let mut value = value;
    if let Some(prefix) = prefix {
        match value.strip_prefix(prefix) {
            Some(stripped) => value = stripped,
            None => {
                // The pair is consumed but the field stays pending, so
                // a required field also reports as missing.
                state.problems.push(Problem::Field {
                    type_name: field.type_name(),
                    field: field.public_name(),
                    detail: format!("Required prefix '{prefix}' was missing."),
                });
                return true;
            }
        }
    }

    let outcome = match &field.kind {
        FieldKind::Scalar(kind) => coerce(kind, value).map(BoundValue::Scalar),
        FieldKind::Array(kind) => value
            .split(',')
            .map(|part| coerce(kind, part))
            .collect::<Result<Vec<_>, _>>()
            .map(BoundValue::Array),
        FieldKind::Group(_) | FieldKind::Document(_) => return false,
    };

    let applied = match outcome {
        Ok(bound) => target.assign(index, bound).map_err(|error| error.to_string()),
        Err(error) => Err(error.to_string()),
    };
    if let Err(detail) = applied {
        state.problems.push(Problem::Field {
            type_name: field.type_name(),
            field: field.public_name(),
            detail,
        });
    }

    release_required(state, field);
    true
}

fn release_required(state: &mut BindState<'_>, field: &'static FieldDescriptor) {
    if let Some(position) = state
        .required
        .iter()
        .position(|pending| std::ptr::eq(*pending, field))
    {
        state.required.remove(position);
    }
}

fn bind_body(
    target: &mut dyn Bindable,
    field: &'static FieldDescriptor,
    index: usize,
    state: &mut BindState<'_>,
) {
    let Some(text) = state.body else {
        state.problems.push(Problem::MissingBody);
        return;
    };
    // A present-but-blank body is not an error on its own; a required
    // body field still reports as missing.
    if text.trim().is_empty() {
        return;
    }

    let parsed: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(error) => {
            state.problems.push(Problem::Field {
                type_name: field.type_name(),
                field: field.public_name(),
                detail: format!("Could not create parameter: {error}"),
            });
            return;
        }
    };

    if let Err(error) = target.assign(index, BoundValue::Document(text)) {
        state.problems.push(Problem::Field {
            type_name: field.type_name(),
            field: field.public_name(),
            detail: format!("Could not create parameter: {error}"),
        });
        return;
    }
    release_required(state, field);

    if let FieldKind::Document(shape) = &field.kind {
        check_document(&parsed, shape, state);
    }
}

fn check_document(value: &serde_json::Value, shape: &DocumentShape, state: &mut BindState<'_>) {
    if shape.array {
        if let serde_json::Value::Array(items) = value {
            for (position, item) in items.iter().enumerate() {
                for field in missing_required(item, shape.fields) {
                    state.problems.push(Problem::ItemMissingRequired {
                        item: position + 1,
                        field,
                    });
                }
            }
        }
    } else {
        for field in missing_required(value, shape.fields) {
            state.problems.push(Problem::MissingRequired { field });
        }
    }
}

/// Required fields of `fields` with no non-null, case-insensitive key
/// match in `value`.
fn missing_required(
    value: &serde_json::Value,
    fields: &'static [FieldDescriptor],
) -> Vec<&'static str> {
    let mut missing = Vec::new();
    for field in fields {
        if !field.required || field.ignore {
            continue;
        }
        let name = field.public_name();
        let present = value.as_object().is_some_and(|map| {
            map.iter()
                .any(|(key, entry)| key.eq_ignore_ascii_case(name) && !entry.is_null())
        });
        if !present {
            missing.push(name);
        }
    }
    missing
}
