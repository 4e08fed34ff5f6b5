//! Loads the catalog once and prints what the browser would show.
//!
//! Mirrors the page controls: `--query` is the search box, `--category` the
//! selector (`all` or a source identifier), and `--tag` a tag shortcut, which
//! replaces the query and resets the category. Output is the card fragments
//! (`html`), a complete static page (`page`), or the matching records as a
//! JSON array (`json`).

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use tomecat::{
    BrowseConfig, BrowserSession, CategoryFilter, Overrides, Shortcut, load_blocking, logging,
    render_page,
};

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

    let (catalog, _report) = load_blocking(&config)?;

    let mut session = BrowserSession::new(&catalog);
    if let Some(query) = cli.query {
        session.set_query(query);
    }
    if let Some(category) = cli.category {
        let filter = CategoryFilter::parse(&category);
        if let CategoryFilter::Source(id) = &filter {
            if config.registry.find(id).is_none() {
                bail!("unknown category '{id}'");
            }
        }
        session.set_category(filter);
    }
    if let Some(tag) = cli.tag {
        session.apply(&Shortcut::Tag(tag));
    }

    match cli.format {
        OutputFormat::Html => {
            let html = session
                .fragments()
                .iter()
                .map(|fragment| fragment.to_html())
                .collect::<Vec<_>>()
                .join("\n");
            println!("{html}");
        }
        OutputFormat::Page => {
            print!(
                "{}",
                render_page(&session, &config.registry, &catalog.tag_index())
            );
        }
        OutputFormat::Json => {
            let records: Vec<Value> = session
                .results()
                .iter()
                .map(|record| record.to_value())
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&records).context("serializing records")?
            );
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Html,
    Page,
    Json,
}

impl OutputFormat {
    fn parse(raw: &str) -> Result<Self> {
        match raw {
            "html" => Ok(Self::Html),
            "page" => Ok(Self::Page),
            "json" => Ok(Self::Json),
            other => bail!("unknown format '{other}' (expected html|page|json)"),
        }
    }
}

struct Cli {
    overrides: Overrides,
    query: Option<String>,
    category: Option<String>,
    tag: Option<String>,
    format: OutputFormat,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let mut overrides = Overrides::default();
        let mut query = None;
        let mut category = None;
        let mut tag = None;
        let mut format = OutputFormat::Html;

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
                "--query" => query = Some(next_value(&mut args, "--query")?),
                "--category" => category = Some(next_value(&mut args, "--category")?),
                "--tag" => tag = Some(next_value(&mut args, "--tag")?),
                "--format" => format = OutputFormat::parse(&next_value(&mut args, "--format")?)?,
                "--help" | "-h" => {
                    print!("{}", usage());
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}\n{}", usage()),
            }
        }

        if tag.is_some() && (query.is_some() || category.is_some()) {
            bail!("--tag replaces the query and category; do not combine it with --query/--category");
        }

        Ok(Cli {
            overrides,
            query,
            category,
            tag,
            format,
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
    "Usage: catalog-browse [--root DIR|URL] [--registry PATH] [--sources a.json,b.json] [--log FILTER]\n\
       [--query TEXT] [--category all|IDENTIFIER] [--tag TAG] [--format html|page|json]\n\
Loads every catalog source, applies the query/category/tag controls, and prints the result.\n"
}
