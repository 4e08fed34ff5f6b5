//! Resolution of the catalog root, registry, and log filter.
//!
//! Each setting follows the same search order: an explicit value from the
//! command line, then the environment, then a build-time hint, then a
//! fallback. Front ends build one [`BrowseConfig`] and pass it down.

use crate::catalog::SourceRegistry;
use crate::split_list;
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

pub const ROOT_ENV: &str = "CATALOG_ROOT";
pub const REGISTRY_ENV: &str = "CATALOG_REGISTRY";
pub const SOURCES_ENV: &str = "CATALOG_SOURCES";
pub const LOG_ENV: &str = "CATALOG_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Clone, Debug, Default)]
/// Values supplied on the command line; `None` defers to the environment.
pub struct Overrides {
    pub root: Option<String>,
    pub registry: Option<PathBuf>,
    pub sources: Option<String>,
    pub log_filter: Option<String>,
}

#[derive(Clone, Debug)]
pub struct BrowseConfig {
    /// Directory or http(s) base URL the source identifiers resolve against.
    pub root: String,
    pub registry: SourceRegistry,
    pub log_filter: String,
}

impl BrowseConfig {
    pub fn resolve(overrides: Overrides) -> Result<Self> {
        let root = overrides
            .root
            .or_else(|| env_non_empty(ROOT_ENV))
            .unwrap_or_else(default_root);

        let registry_path = overrides
            .registry
            .or_else(|| env_non_empty(REGISTRY_ENV).map(PathBuf::from));
        let registry = match registry_path {
            Some(path) => SourceRegistry::load(&path)?,
            None => SourceRegistry::default(),
        };

        let registry = match overrides.sources.or_else(|| env_non_empty(SOURCES_ENV)) {
            Some(raw) => registry
                .retain_identifiers(&split_list(&raw))
                .context("selecting sources")?,
            None => registry,
        };

        let log_filter = overrides
            .log_filter
            .or_else(|| env_non_empty(LOG_ENV))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            root,
            registry,
            log_filter,
        })
    }
}

/// Bundled `data/` directory when it still exists, else the working directory.
fn default_root() -> String {
    if let Some(hint) = option_env!("CATALOG_DATA_HINT") {
        if Path::new(hint).is_dir() {
            return hint.to_string();
        }
    }
    ".".to_string()
}

fn env_non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
