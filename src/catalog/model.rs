//! Normalized catalog records and the payload shapes they are built from.
//!
//! Sources arrive either as a flat JSON array or as an object whose values
//! group arrays by subcategory. [`SourcePayload`] fixes that shape once at
//! parse time; [`SourcePayload::into_records`] flattens either variant into
//! [`Record`]s stamped with the source label and identifier.

use crate::catalog::identity::SourceId;
use crate::catalog::index::TagIndex;
use crate::catalog::registry::SourceDescriptor;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

pub const CATEGORY_FIELD: &str = "category";
pub const SOURCE_ID_FIELD: &str = "sourceId";

// Candidate field names, English first, then the names used by the
// Portuguese-language data packs.
pub(crate) const NAME_FIELDS: &[&str] = &["name", "nome"];
pub(crate) const TITLE_FIELDS: &[&str] = &["title", "titulo"];
pub(crate) const DESCRIPTION_FIELDS: &[&str] = &["description", "descricao"];
pub(crate) const EFFECT_FIELDS: &[&str] = &["effect", "efeito"];
pub(crate) const LEVEL_FIELDS: &[&str] = &["level", "nivel"];
pub(crate) const MIN_LEVEL_FIELDS: &[&str] = &["min_level", "nivel_min"];
pub(crate) const ICON_FIELDS: &[&str] = &["icon", "icone"];
pub(crate) const TAGS_FIELD: &str = "tags";

#[derive(Clone, Debug, PartialEq, Serialize)]
/// One catalog entry: the source object's fields plus its origin.
///
/// `fields` never contains `category` or `sourceId`; the injected values
/// always win over same-named source fields.
pub struct Record {
    #[serde(flatten)]
    fields: Map<String, Value>,
    category: String,
    #[serde(rename = "sourceId")]
    source_id: SourceId,
}

impl Record {
    /// Shallow-copy `fields` and stamp the origin on top.
    pub fn new(mut fields: Map<String, Value>, category: &str, source_id: &SourceId) -> Self {
        fields.remove(CATEGORY_FIELD);
        fields.remove(SOURCE_ID_FIELD);
        Self {
            fields,
            category: category.to_string(),
            source_id: source_id.clone(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    /// Raw source field, excluding the injected origin fields.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// First candidate field holding usable text.
    pub fn text(&self, candidates: &[&str]) -> Option<String> {
        candidates
            .iter()
            .find_map(|key| self.fields.get(*key).and_then(value_text))
    }

    /// Like [`Record::text`], but a numeric zero counts as absent.
    pub fn rank_text(&self, candidates: &[&str]) -> Option<String> {
        candidates.iter().find_map(|key| match self.fields.get(*key)? {
            Value::Number(number) if number.as_f64() == Some(0.0) => None,
            other => value_text(other),
        })
    }

    /// Name, falling back to title.
    pub fn display_name(&self) -> Option<String> {
        self.text(NAME_FIELDS).or_else(|| self.text(TITLE_FIELDS))
    }

    /// Description, falling back to effect.
    pub fn description(&self) -> Option<String> {
        self.text(DESCRIPTION_FIELDS)
            .or_else(|| self.text(EFFECT_FIELDS))
    }

    /// String tags, or `None` when `tags` is absent or not an array.
    pub fn tags(&self) -> Option<Vec<&str>> {
        let items = self.fields.get(TAGS_FIELD)?.as_array()?;
        Some(items.iter().filter_map(Value::as_str).collect())
    }

    pub fn to_value(&self) -> Value {
        let mut object = self.fields.clone();
        object.insert(CATEGORY_FIELD.to_string(), Value::from(self.category.as_str()));
        object.insert(
            SOURCE_ID_FIELD.to_string(),
            Value::from(self.source_id.as_str()),
        );
        Value::Object(object)
    }
}

/// Text view of a scalar field. Empty strings, nulls, booleans, and
/// containers count as absent.
pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Parsed source document, classified by shape.
pub enum SourcePayload {
    /// `[ {...}, {...} ]`
    Flat(Vec<Value>),
    /// `{ "group": [ {...} ], "other": [...] }`
    Grouped(Map<String, Value>),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
/// JSON kinds that cannot hold records.
pub enum ScalarKind {
    Null,
    Bool,
    Number,
    String,
}

impl ScalarKind {
    pub fn label(&self) -> &'static str {
        match self {
            ScalarKind::Null => "null",
            ScalarKind::Bool => "bool",
            ScalarKind::Number => "number",
            ScalarKind::String => "string",
        }
    }
}

impl SourcePayload {
    pub fn from_value(value: Value) -> Result<Self, ScalarKind> {
        match value {
            Value::Array(items) => Ok(SourcePayload::Flat(items)),
            Value::Object(groups) => Ok(SourcePayload::Grouped(groups)),
            Value::Null => Err(ScalarKind::Null),
            Value::Bool(_) => Err(ScalarKind::Bool),
            Value::Number(_) => Err(ScalarKind::Number),
            Value::String(_) => Err(ScalarKind::String),
        }
    }

    /// Flatten into records tagged with `source`.
    ///
    /// Grouped payloads contribute only array-valued keys, in document
    /// order. Non-object array elements are skipped.
    pub fn into_records(self, source: &SourceDescriptor) -> Vec<Record> {
        let mut records = Vec::new();
        match self {
            SourcePayload::Flat(items) => push_objects(&mut records, items, source),
            SourcePayload::Grouped(groups) => {
                for (key, value) in groups {
                    match value {
                        Value::Array(items) => push_objects(&mut records, items, source),
                        _ => debug!(
                            source = %source.identifier,
                            key = %key,
                            "ignoring non-array group"
                        ),
                    }
                }
            }
        }
        records
    }
}

fn push_objects(records: &mut Vec<Record>, items: Vec<Value>, source: &SourceDescriptor) {
    for (position, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(fields) => {
                records.push(Record::new(fields, &source.label, &source.identifier))
            }
            _ => debug!(
                source = %source.identifier,
                position,
                "skipping non-object element"
            ),
        }
    }
}

#[derive(Clone, Debug, Default)]
/// Every record from every source, in registry order.
///
/// Built once by the loader and read by reference afterwards.
pub struct Catalog {
    records: Vec<Record>,
}

impl Catalog {
    /// Concatenate per-source record lists in the order given.
    pub fn from_sources(sources: impl IntoIterator<Item = Vec<Record>>) -> Self {
        Self {
            records: sources.into_iter().flatten().collect(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn tag_index(&self) -> TagIndex {
        TagIndex::build(&self.records)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
