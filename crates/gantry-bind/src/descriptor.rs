//! Static binding descriptors.
//!
//! A bindable type publishes one `static` slice of [`FieldDescriptor`]
//! records, one per field. Everything the binder needs, from source
//! and external name to requiredness and coercion target, lives in
//! the table, built entirely from `const` constructors so the whole
//! schema is known before the first request arrives.
//!
//! ```
//! use gantry_bind::{FieldDescriptor, ScalarKind};
//!
//! static FIELDS: [FieldDescriptor; 2] = [
//!     FieldDescriptor::query("Account", ScalarKind::Uuid).required(),
//!     FieldDescriptor::query("Limit", ScalarKind::Int32),
//! ];
//!
//! assert!(FIELDS[0].matches("ACCOUNT"));
//! ```

use crate::coerce::ScalarKind;

/// Where a field's value is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterSource {
    /// A decoded query-string pair.
    Query,
    /// An HTTP header.
    Header,
    /// The buffered request body.
    Body,
}

/// Shape of a body-sourced document field.
#[derive(Debug, Clone, Copy)]
pub struct DocumentShape {
    /// Wire-facing name of the document type, used in error lines.
    pub type_name: &'static str,
    /// True when the body is a JSON array of this shape.
    pub array: bool,
    /// Descriptors for the document's own fields. Only `required` and
    /// the external name matter here; the document itself is
    /// deserialized wholesale.
    pub fields: &'static [FieldDescriptor],
}

/// How a field's textual value becomes a typed one.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// One coerced scalar.
    Scalar(ScalarKind),
    /// A comma-separated list of coerced scalars.
    Array(ScalarKind),
    /// A nested bindable whose fields join this binding pass.
    Group(&'static [FieldDescriptor]),
    /// A JSON document taken from the request body.
    Document(DocumentShape),
}

/// One field's binding contract.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Field name as declared on the Rust type.
    pub name: &'static str,
    /// Where the value comes from.
    pub source: ParameterSource,
    /// How the value is converted.
    pub kind: FieldKind,
    /// Whether binding must fail if no value arrives.
    pub required: bool,
    /// Whether the binder skips this field entirely.
    pub ignore: bool,
    /// External name override; `None` means the declared name is also
    /// the wire name.
    pub rename: Option<&'static str>,
    /// Prefix the raw value must carry, stripped before coercion.
    /// Meaningful for header-sourced fields only.
    pub strip_prefix: Option<&'static str>,
}

impl FieldDescriptor {
    const fn new(name: &'static str, source: ParameterSource, kind: FieldKind) -> Self {
        Self {
            name,
            source,
            kind,
            required: false,
            ignore: false,
            rename: None,
            strip_prefix: None,
        }
    }

    /// A scalar taken from the query string.
    #[must_use]
    pub const fn query(name: &'static str, kind: ScalarKind) -> Self {
        Self::new(name, ParameterSource::Query, FieldKind::Scalar(kind))
    }

    /// A comma-separated array taken from the query string.
    #[must_use]
    pub const fn query_array(name: &'static str, kind: ScalarKind) -> Self {
        Self::new(name, ParameterSource::Query, FieldKind::Array(kind))
    }

    /// A scalar taken from a header.
    #[must_use]
    pub const fn header(name: &'static str, kind: ScalarKind) -> Self {
        Self::new(name, ParameterSource::Header, FieldKind::Scalar(kind))
    }

    /// A comma-separated array taken from a header.
    #[must_use]
    pub const fn header_array(name: &'static str, kind: ScalarKind) -> Self {
        Self::new(name, ParameterSource::Header, FieldKind::Array(kind))
    }

    /// A nested group whose fields participate in the same pass.
    #[must_use]
    pub const fn group(name: &'static str, fields: &'static [FieldDescriptor]) -> Self {
        Self::new(name, ParameterSource::Query, FieldKind::Group(fields))
    }

    /// A JSON document taken from the request body.
    #[must_use]
    pub const fn body(name: &'static str, shape: DocumentShape) -> Self {
        Self::new(name, ParameterSource::Body, FieldKind::Document(shape))
    }

    /// Marks the field required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Removes the field from binding entirely.
    #[must_use]
    pub const fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }

    /// Sets the external name the wire uses for this field.
    #[must_use]
    pub const fn renamed(mut self, external: &'static str) -> Self {
        self.rename = Some(external);
        self
    }

    /// Requires (and strips) a value prefix. Header fields only.
    #[must_use]
    pub const fn with_prefix(mut self, prefix: &'static str) -> Self {
        self.strip_prefix = Some(prefix);
        self
    }

    /// The name the wire sees: the rename if present, the declared
    /// name otherwise.
    #[must_use]
    pub const fn public_name(&self) -> &'static str {
        match self.rename {
            Some(external) => external,
            None => self.name,
        }
    }

    /// Case-insensitive match of an incoming name against this field.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.public_name().eq_ignore_ascii_case(candidate)
    }

    /// Type name used in `Error on (<TypeName>) ...` lines.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match &self.kind {
            FieldKind::Scalar(kind) | FieldKind::Array(kind) => kind.type_name(),
            FieldKind::Group(_) => "Group",
            FieldKind::Document(shape) => shape.type_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static FIELDS: [FieldDescriptor; 3] = [
        FieldDescriptor::query("Top", ScalarKind::Int32).renamed("$Top"),
        FieldDescriptor::header("Secret", ScalarKind::Double)
            .with_prefix("zorba:")
            .required(),
        FieldDescriptor::query("Hidden", ScalarKind::Text).ignored(),
    ];

    #[test]
    fn test_rename_wins_for_matching() {
        assert!(FIELDS[0].matches("$top"));
        assert!(!FIELDS[0].matches("Top"));
        assert_eq!(FIELDS[0].public_name(), "$Top");
    }

    #[test]
    fn test_builder_flags() {
        assert!(FIELDS[1].required);
        assert_eq!(FIELDS[1].strip_prefix, Some("zorba:"));
        assert_eq!(FIELDS[1].source, ParameterSource::Header);
        assert!(FIELDS[2].ignore);
    }

    #[test]
    fn test_type_name_comes_from_kind() {
        assert_eq!(FIELDS[0].type_name(), "Int32");
        assert_eq!(FIELDS[1].type_name(), "Double");
    }
}
