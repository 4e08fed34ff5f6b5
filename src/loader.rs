//! Concurrent source loading.
//!
//! Every registered source is fetched at once on the calling task and the
//! load completes only after each fetch has settled. A source that cannot
//! be fetched or parsed is logged and contributes nothing; it never fails
//! the load or delays the other sources beyond its own latency.

use crate::catalog::{Catalog, Record, ScalarKind, SourceDescriptor, SourcePayload, SourceRegistry};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Url;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
/// Why one source contributed no records.
pub enum LoadError {
    #[error("reading {identifier}: {source}")]
    Io {
        identifier: String,
        #[source]
        source: std::io::Error,
    },
    #[error("fetching {identifier}: {source}")]
    Http {
        identifier: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid url for {identifier}: {detail}")]
    Url { identifier: String, detail: String },
    #[error("parsing {identifier}: {source}")]
    Parse {
        identifier: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{identifier} holds a JSON {}, expected an array or object", .kind.label())]
    UnsupportedShape { identifier: String, kind: ScalarKind },
}

/// Transport that retrieves the raw bytes of one source document.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, identifier: &str) -> Result<Vec<u8>, LoadError>;
}

#[derive(Clone, Debug)]
/// Reads sources from a directory on disk.
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Fetch for FsFetcher {
    async fn fetch(&self, identifier: &str) -> Result<Vec<u8>, LoadError> {
        let path = self.root.join(identifier);
        tokio::fs::read(&path).await.map_err(|source| LoadError::Io {
            identifier: identifier.to_string(),
            source,
        })
    }
}

#[derive(Clone, Debug)]
/// Retrieves sources relative to a base URL.
pub struct HttpFetcher {
    base: Url,
    client: reqwest::Client,
}

impl HttpFetcher {
    /// `base` is treated as a directory: a missing trailing slash is added
    /// so identifiers resolve beneath it.
    pub fn new(base: &str) -> Result<Self, LoadError> {
        let mut normalized = base.to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base = Url::parse(&normalized).map_err(|err| LoadError::Url {
            identifier: base.to_string(),
            detail: err.to_string(),
        })?;
        Ok(Self {
            base,
            client: reqwest::Client::new(),
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, identifier: &str) -> Result<Vec<u8>, LoadError> {
        let url = self.base.join(identifier).map_err(|err| LoadError::Url {
            identifier: identifier.to_string(),
            detail: err.to_string(),
        })?;
        let http_error = |source: reqwest::Error| LoadError::Http {
            identifier: identifier.to_string(),
            source,
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(http_error)?;
        let body = response.bytes().await.map_err(http_error)?;
        Ok(body.to_vec())
    }
}

/// Pick a transport for a catalog root: HTTP(S) URLs go over the network,
/// anything else is a directory.
pub fn fetcher_for_root(root: &str) -> Result<Box<dyn Fetch>, LoadError> {
    if root.starts_with("http://") || root.starts_with("https://") {
        Ok(Box::new(HttpFetcher::new(root)?))
    } else {
        Ok(Box::new(FsFetcher::new(root)))
    }
}

#[derive(Debug)]
/// What one source contributed.
pub enum SourceOutcome {
    Loaded { count: usize },
    Failed { error: LoadError },
}

#[derive(Debug)]
pub struct SourceReport {
    pub source: SourceDescriptor,
    pub outcome: SourceOutcome,
}

#[derive(Debug, Default)]
/// Per-source outcomes of one load, in registry order.
pub struct LoadReport {
    pub sources: Vec<SourceReport>,
}

impl LoadReport {
    pub fn loaded(&self) -> usize {
        self.sources
            .iter()
            .filter(|report| matches!(report.outcome, SourceOutcome::Loaded { .. }))
            .count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources
            .iter()
            .filter(|report| matches!(report.outcome, SourceOutcome::Failed { .. }))
    }
}

/// Load every registered source into one catalog.
pub async fn load(registry: &SourceRegistry, fetcher: &dyn Fetch) -> Catalog {
    load_with_report(registry, fetcher).await.0
}

/// Load every registered source, also returning what each contributed.
pub async fn load_with_report(
    registry: &SourceRegistry,
    fetcher: &dyn Fetch,
) -> (Catalog, LoadReport) {
    let pending = registry
        .iter()
        .map(|source| async move { (source, load_source(source, fetcher).await) });
    let settled = join_all(pending).await;

    let mut report = LoadReport::default();
    let mut batches = Vec::with_capacity(settled.len());
    for (source, result) in settled {
        let outcome = match result {
            Ok(records) => {
                let count = records.len();
                batches.push(records);
                SourceOutcome::Loaded { count }
            }
            Err(error) => {
                warn!(source = %source.identifier, error = %error, "failed to load source");
                SourceOutcome::Failed { error }
            }
        };
        report.sources.push(SourceReport {
            source: source.clone(),
            outcome,
        });
    }

    let catalog = Catalog::from_sources(batches);
    info!(
        records = catalog.len(),
        loaded = report.loaded(),
        failed = report.sources.len() - report.loaded(),
        "catalog loaded"
    );
    (catalog, report)
}

async fn load_source(
    source: &SourceDescriptor,
    fetcher: &dyn Fetch,
) -> Result<Vec<Record>, LoadError> {
    let identifier = source.identifier.as_str();
    let bytes = fetcher.fetch(identifier).await?;
    parse_source(source, &bytes)
}

/// Parse one source document and flatten it into records.
pub fn parse_source(source: &SourceDescriptor, bytes: &[u8]) -> Result<Vec<Record>, LoadError> {
    let identifier = source.identifier.as_str();
    let value: Value = serde_json::from_slice(bytes).map_err(|err| LoadError::Parse {
        identifier: identifier.to_string(),
        source: err,
    })?;
    let payload = SourcePayload::from_value(value).map_err(|kind| LoadError::UnsupportedShape {
        identifier: identifier.to_string(),
        kind,
    })?;
    Ok(payload.into_records(source))
}
