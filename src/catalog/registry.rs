//! Ordered list of sources the loader fetches.
//!
//! The built-in registry is fixed at build time. Alternate registries can be
//! read from a JSON file; those are checked against
//! `schema/source_registry.schema.json` and for duplicate identifiers before
//! use, so a typo cannot silently drop a category.

use crate::catalog::identity::{ALL_CATEGORIES, SourceId};
use crate::schema_loader::{compile_embedded_schema, validate_instance};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

const REGISTRY_SCHEMA: &str = include_str!("../../schema/source_registry.schema.json");

const DEFAULT_SOURCES: &[(&str, &str)] = &[
    ("classes.json", "Classes"),
    ("races.json", "Races"),
    ("weapons.json", "Weapons"),
    ("spells.json", "Spells"),
    ("creatures.json", "Creatures"),
    ("items.json", "Items"),
    ("attributes.json", "Attributes"),
    ("regions.json", "Regions"),
    ("npcs.json", "NPCs"),
    ("lore.json", "Lore"),
    ("sheets.json", "Sheets"),
];

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// One data file and the label shown for its records.
pub struct SourceDescriptor {
    pub identifier: SourceId,
    pub label: String,
}

impl SourceDescriptor {
    pub fn new(identifier: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            identifier: SourceId::new(identifier),
            label: label.into(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceRegistry {
    sources: Vec<SourceDescriptor>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RegistryDocument {
    Wrapped { sources: Vec<SourceDescriptor> },
    Bare(Vec<SourceDescriptor>),
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES
                .iter()
                .map(|(identifier, label)| SourceDescriptor::new(*identifier, *label))
                .collect(),
        }
    }
}

impl SourceRegistry {
    /// Build a registry, rejecting empty lists and duplicate identifiers.
    pub fn new(sources: Vec<SourceDescriptor>) -> Result<Self> {
        validate_sources(&sources)?;
        Ok(Self { sources })
    }

    /// Read a registry document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading registry {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("loading registry {}", path.display()))
    }

    /// Parse and validate a registry document.
    ///
    /// Accepts either a bare array of descriptors or `{"sources": [...]}`.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw).context("parsing registry JSON")?;
        let schema = compile_embedded_schema("source registry", REGISTRY_SCHEMA)?;
        validate_instance(&schema, &value, "source registry")?;

        let document: RegistryDocument =
            serde_json::from_value(value).context("decoding registry entries")?;
        let sources = match document {
            RegistryDocument::Wrapped { sources } => sources,
            RegistryDocument::Bare(sources) => sources,
        };
        Self::new(sources)
    }

    /// Keep only the listed identifiers, preserving registry order.
    pub fn retain_identifiers(self, identifiers: &[String]) -> Result<Self> {
        if identifiers.is_empty() {
            return Ok(self);
        }
        let known: BTreeSet<&str> = self
            .sources
            .iter()
            .map(|source| source.identifier.as_str())
            .collect();
        for requested in identifiers {
            if !known.contains(requested.as_str()) {
                bail!("unknown source '{requested}'");
            }
        }
        let sources = self
            .sources
            .into_iter()
            .filter(|source| identifiers.iter().any(|id| id == source.identifier.as_str()))
            .collect();
        Ok(Self { sources })
    }

    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourceDescriptor> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn find(&self, identifier: &SourceId) -> Option<&SourceDescriptor> {
        self.sources.iter().find(|source| &source.identifier == identifier)
    }
}

fn validate_sources(sources: &[SourceDescriptor]) -> Result<()> {
    if sources.is_empty() {
        bail!("registry must list at least one source");
    }
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for source in sources {
        let identifier = source.identifier.as_str();
        if identifier.trim().is_empty() {
            bail!("registry contains a source with an empty identifier");
        }
        if identifier == ALL_CATEGORIES {
            bail!("'{ALL_CATEGORIES}' is reserved and cannot name a source");
        }
        if source.label.trim().is_empty() {
            bail!("source {identifier} has an empty label");
        }
        if !seen.insert(identifier) {
            bail!("duplicate source identifier {identifier}");
        }
    }
    Ok(())
}
