use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Identifier of one data source, as fetched (e.g. `weapons.json`).
///
/// The identifier doubles as the `sourceId` stamped onto every record and as
/// the value of the category selector.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(pub String);

/// Sentinel used by the category selector to mean "every source".
pub const ALL_CATEGORIES: &str = "all";

impl SourceId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File stem of the identifier: `data/weapons.json` -> `weapons`.
    ///
    /// Render extensions are keyed by the stem so a source keeps its
    /// supplementary fields regardless of directory or extension.
    pub fn stem(&self) -> &str {
        let without_query = self.0.split(['?', '#']).next().unwrap_or_default();
        Path::new(without_query)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(without_query)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Category constraint applied before the text query.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum CategoryFilter {
    #[default]
    All,
    Source(SourceId),
}

impl CategoryFilter {
    /// Parse a selector value; blank input and the `all` sentinel select
    /// every source.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Source(SourceId::new(trimmed))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Source(id) => id.as_str(),
        }
    }

    pub fn admits(&self, source_id: &SourceId) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Source(id) => id == source_id,
        }
    }
}
