//! Sorted set of tags present across a catalog.
//!
//! The index backs the tag shortcut buttons. It is derived, never stored on
//! records, and depends only on the set of records, not their order.

use crate::catalog::model::Record;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TagIndex {
    tags: Vec<String>,
}

impl TagIndex {
    /// Union of every record's string tags, deduplicated and sorted
    /// case-sensitively.
    pub fn build<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut unique: BTreeSet<&str> = BTreeSet::new();
        for record in records {
            if let Some(tags) = record.tags() {
                unique.extend(tags);
            }
        }
        Self {
            tags: unique.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.binary_search_by(|existing| existing.as_str().cmp(tag)).is_ok()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
