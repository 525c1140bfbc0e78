use std::fmt;
use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::warn;

use crate::digest::{DigestValue, HashAlgorithm};
use crate::error::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Digest,
    Count,
    Text,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Digest => "digest",
            Self::Count => "count",
            Self::Text => "text",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Digest(DigestValue),
    Count(u64),
    Text(String),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Digest(_) => FieldType::Digest,
            Self::Count(_) => FieldType::Count,
            Self::Text(_) => FieldType::Text,
        }
    }

    pub fn as_digest(&self) -> Option<&DigestValue> {
        match self {
            Self::Digest(digest) => Some(digest),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digest(digest) => fmt::Display::fmt(digest, f),
            Self::Count(count) => fmt::Display::fmt(count, f),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Digest(digest) => digest.serialize(serializer),
            Self::Count(count) => serializer.serialize_u64(*count),
            Self::Text(text) => serializer.serialize_str(text),
        }
    }
}

/// Slot in a [`ResultsRecord`], obtained only by resolving a name against a
/// [`ResultsSchema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldIndex(usize);

impl FieldIndex {
    pub fn offset(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldDef {
    name: String,
    ty: FieldType,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultsSchema {
    fields: Vec<FieldDef>,
}

impl ResultsSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema with one digest field per supported hash algorithm.
    pub fn action_results() -> Self {
        HashAlgorithm::ALL
            .into_iter()
            .fold(Self::new(), |schema, algorithm| {
                schema.with_field(algorithm.field_name(), FieldType::Digest)
            })
    }

    /// Appends a field. Re-declaring an existing name replaces its type.
    pub fn with_field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(field) => field.ty = ty,
            None => self.fields.push(FieldDef { name, ty }),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_offset(&self, name: &str) -> Option<FieldIndex> {
        self.fields
            .iter()
            .position(|field| field.name == name)
            .map(FieldIndex)
    }

    pub fn field_type(&self, index: FieldIndex) -> Option<FieldType> {
        self.fields.get(index.0).map(|field| field.ty)
    }

    pub fn field_name(&self, index: FieldIndex) -> Option<&str> {
        self.fields.get(index.0).map(|field| field.name.as_str())
    }

    /// Resolves `name` and checks it holds values of type `expected`.
    pub fn resolve(&self, name: &str, expected: FieldType) -> Result<FieldIndex, ConfigurationError> {
        let index = self
            .field_offset(name)
            .ok_or_else(|| ConfigurationError::MissingResultField {
                field: name.to_owned(),
            })?;
        let found = self.fields[index.0].ty;
        if found != expected {
            return Err(ConfigurationError::FieldTypeMismatch {
                field: name.to_owned(),
                expected,
                found,
            });
        }
        Ok(index)
    }
}

/// Output container shared between the hosting context and its actions.
#[derive(Debug, Clone)]
pub struct ResultsRecord {
    schema: Arc<ResultsSchema>,
    values: Vec<Option<FieldValue>>,
}

impl ResultsRecord {
    pub fn new(schema: Arc<ResultsSchema>) -> Self {
        let values = vec![None; schema.len()];
        Self { schema, values }
    }

    pub fn schema(&self) -> &ResultsSchema {
        &self.schema
    }

    /// Stores `value` at `index` if the record's schema declares a field of
    /// the value's type there. Returns whether the value was stored.
    pub fn assign(&mut self, index: FieldIndex, value: FieldValue) -> bool {
        let found = value.field_type();
        match self.schema.field_type(index) {
            Some(expected) if expected == found => {
                self.values[index.0] = Some(value);
                true
            }
            Some(expected) => {
                warn!(
                    offset = index.0,
                    %expected,
                    %found,
                    "assignment of mistyped value dropped"
                );
                false
            }
            None => {
                warn!(offset = index.0, "assignment to field outside record schema dropped");
                false
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.schema
            .field_offset(name)
            .and_then(|index| self.get_index(index))
    }

    pub fn get_index(&self, index: FieldIndex) -> Option<&FieldValue> {
        self.values.get(index.0).and_then(Option::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Assigned fields in schema order.
    pub fn assigned(&self) -> impl Iterator<Item = (&str, &FieldValue)> + '_ {
        self.schema
            .fields
            .iter()
            .zip(&self.values)
            .filter_map(|(field, value)| value.as_ref().map(|value| (field.name.as_str(), value)))
    }
}

impl Serialize for ResultsRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (name, value) in self.assigned() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
