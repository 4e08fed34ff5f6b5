//! Prints the sorted, de-duplicated tags across every loaded source.
//!
//! One tag per line by default; `--json` prints a JSON array instead.
//! `--report` adds a per-source load summary on stderr.

use anyhow::{Result, bail};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use tomecat::{BrowseConfig, Overrides, SourceOutcome, load_blocking, logging};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse()?;
    let config = BrowseConfig::resolve(cli.overrides)?;
    logging::init(&config.log_filter);

    let (catalog, report) = load_blocking(&config)?;
    if cli.report {
        for entry in &report.sources {
            match &entry.outcome {
                SourceOutcome::Loaded { count } => {
                    eprintln!("{}: {count} record(s)", entry.source.identifier)
                }
                SourceOutcome::Failed { error } => {
                    eprintln!("{}: failed ({error})", entry.source.identifier)
                }
            }
        }
    }

    let tags = catalog.tag_index();
    if cli.json {
        println!("{}", serde_json::to_string(&tags)?);
    } else {
        for tag in tags.iter() {
            println!("{tag}");
        }
    }
    Ok(())
}

struct Cli {
    overrides: Overrides,
    json: bool,
    report: bool,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let mut overrides = Overrides::default();
        let mut json = false;
        let mut report = false;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow::anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--root" => overrides.root = Some(next_value(&mut args, "--root")?),
                "--registry" => {
                    overrides.registry = Some(PathBuf::from(next_value(&mut args, "--registry")?))
                }
                "--sources" => overrides.sources = Some(next_value(&mut args, "--sources")?),
                "--log" => overrides.log_filter = Some(next_value(&mut args, "--log")?),
                "--json" => json = true,
                "--report" => report = true,
                "--help" | "-h" => {
                    print!("{}", usage());
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}\n{}", usage()),
            }
        }

        Ok(Cli {
            overrides,
            json,
            report,
        })
    }
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow::anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))
}

fn usage() -> &'static str {
    "Usage: catalog-tags [--root DIR|URL] [--registry PATH] [--sources a.json,b.json] [--log FILTER] [--json] [--report]\n\
Loads every catalog source and prints the tag index.\n"
}
