use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tomecat::{SourceDescriptor, SourceRegistry};

pub const BROWSE_BIN: &str = env!("CARGO_BIN_EXE_catalog-browse");
pub const TAGS_BIN: &str = env!("CARGO_BIN_EXE_catalog-tags");

/// The data set shipped with the crate.
pub fn bundled_data_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

pub fn write_source(dir: &Path, identifier: &str, document: &Value) -> Result<PathBuf> {
    let path = dir.join(identifier);
    fs::write(&path, serde_json::to_vec_pretty(document)?)
        .with_context(|| format!("writing fixture {}", path.display()))?;
    Ok(path)
}

pub fn write_raw_source(dir: &Path, identifier: &str, body: &str) -> Result<PathBuf> {
    let path = dir.join(identifier);
    fs::write(&path, body).with_context(|| format!("writing fixture {}", path.display()))?;
    Ok(path)
}

pub fn registry(entries: &[(&str, &str)]) -> SourceRegistry {
    SourceRegistry::new(
        entries
            .iter()
            .map(|(identifier, label)| SourceDescriptor::new(*identifier, *label))
            .collect(),
    )
    .expect("fixture registry must be valid")
}

pub fn write_registry(dir: &Path, entries: &[(&str, &str)]) -> Result<PathBuf> {
    let document: Vec<Value> = entries
        .iter()
        .map(|(identifier, label)| serde_json::json!({"identifier": identifier, "label": label}))
        .collect();
    write_source(dir, "registry.json", &Value::Array(document))
}

/// Command for a crate binary with catalog environment cleared.
pub fn catalog_command(binary: &str) -> Command {
    let mut cmd = Command::new(binary);
    for name in [
        "CATALOG_ROOT",
        "CATALOG_REGISTRY",
        "CATALOG_SOURCES",
        "CATALOG_LOG",
    ] {
        cmd.env_remove(name);
    }
    cmd
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}
