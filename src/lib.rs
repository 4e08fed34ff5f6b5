//! Tabletop RPG content catalog.
//!
//! Loads the JSON sources named by a [`SourceRegistry`] into one immutable
//! [`Catalog`], then filters it by category and free text and renders the
//! results as HTML cards. The binaries under `src/bin/` are thin front ends:
//! they resolve a [`BrowseConfig`], run the loader once on a single-threaded
//! runtime, and print what a [`BrowserSession`] shows.

pub mod catalog;
pub mod config;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod render;
pub mod session;

mod schema_loader;

pub use catalog::{
    ALL_CATEGORIES, Catalog, CategoryFilter, Record, ScalarKind, SourceDescriptor, SourceId,
    SourcePayload, SourceRegistry, TagIndex,
};
pub use config::{BrowseConfig, Overrides};
pub use filter::filter;
pub use loader::{
    Fetch, FsFetcher, HttpFetcher, LoadError, LoadReport, SourceOutcome, fetcher_for_root, load,
    load_with_report,
};
pub use render::{Card, Fragment, render, render_html, render_page};
pub use session::{BrowserSession, CategoryOption, Shortcut, category_options, shortcuts};

use anyhow::{Context, Result};

/// Split comma- or whitespace-delimited configuration lists into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Load the configured sources on a current-thread runtime.
///
/// Sources are fetched concurrently on that one thread; the call returns
/// once every fetch has settled. Per-source failures are logged inside the
/// loader; only runtime or transport setup errors surface here.
pub fn load_blocking(config: &BrowseConfig) -> Result<(Catalog, LoadReport)> {
    let fetcher = fetcher_for_root(&config.root)
        .with_context(|| format!("preparing transport for {}", config.root))?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    Ok(runtime.block_on(load_with_report(&config.registry, fetcher.as_ref())))
}
