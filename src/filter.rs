//! Category and free-text filtering over catalog records.
//!
//! Filtering narrows by category first, then by the case-folded query
//! against each record's name, description, and tags. Input order is kept;
//! an empty result is a normal outcome.

use crate::catalog::{CategoryFilter, Record};

/// Records admitted by `category` whose searchable text contains `query`.
///
/// Accepts any iterator of record references so a filtered result can be
/// filtered again.
pub fn filter<'a, I>(records: I, query: &str, category: &CategoryFilter) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let needle = normalize_query(query);
    records
        .into_iter()
        .filter(|record| category.admits(record.source_id()))
        .filter(|record| needle.is_empty() || matches_query(record, &needle))
        .collect()
}

/// Trimmed, lowercased query text.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// True when the already-normalized `needle` occurs in the record's name,
/// description, or space-joined tags.
pub fn matches_query(record: &Record, needle: &str) -> bool {
    let name = record.display_name().unwrap_or_default().to_lowercase();
    if name.contains(needle) {
        return true;
    }
    let description = record.description().unwrap_or_default().to_lowercase();
    if description.contains(needle) {
        return true;
    }
    let tags = record.tags().unwrap_or_default().join(" ").to_lowercase();
    tags.contains(needle)
}
