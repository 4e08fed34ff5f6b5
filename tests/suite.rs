// Integration suite for the catalog: loading from disk and HTTP, the filter
// laws, rendering, and the two command-line front ends.
mod support;

use anyhow::Result;
use serde_json::{Value, json};
use support::{
    BROWSE_BIN, TAGS_BIN, bundled_data_root, catalog_command, registry, run_command,
    write_raw_source, write_registry, write_source,
};
use tempfile::TempDir;
use tomecat::{
    BrowserSession, Catalog, CategoryFilter, Fragment, FsFetcher, HttpFetcher, Record, Shortcut,
    SourceId, SourceOutcome, SourceRegistry, filter, load, load_with_report, render, render_html,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn names(records: &[&Record]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.display_name().unwrap_or_default())
        .collect()
}

fn weapons_and_spells(dir: &TempDir) -> Result<SourceRegistry> {
    write_source(
        dir.path(),
        "weapons.json",
        &json!([{"name": "Iron Sword", "damage": "1d6", "type": "Slashing", "tags": ["martial"]}]),
    )?;
    write_source(
        dir.path(),
        "spells.json",
        &json!([{"name": "Fireball", "effect": "Deals fire damage", "tags": ["fire", "area"]}]),
    )?;
    Ok(registry(&[("weapons.json", "Weapons"), ("spells.json", "Spells")]))
}

async fn bundled_catalog() -> Catalog {
    load(
        &SourceRegistry::default(),
        &FsFetcher::new(bundled_data_root()),
    )
    .await
}

// The two-source walkthrough: load, search, narrow by category, index tags,
// and render supplements.
#[tokio::test]
async fn weapons_and_spells_walkthrough() -> Result<()> {
    let dir = TempDir::new()?;
    let registry = weapons_and_spells(&dir)?;
    let catalog = load(&registry, &FsFetcher::new(dir.path())).await;
    assert_eq!(catalog.len(), 2);

    let fire = filter(&catalog, "fire", &CategoryFilter::All);
    assert_eq!(names(&fire), vec!["Fireball"]);

    let weapons = filter(&catalog, "", &CategoryFilter::parse("weapons.json"));
    assert_eq!(names(&weapons), vec!["Iron Sword"]);

    assert_eq!(catalog.tag_index().tags(), ["area", "fire", "martial"]);

    let sword_html = render_html(weapons);
    assert!(sword_html.contains("<strong>Damage:</strong> 1d6"));
    assert!(sword_html.contains("<strong>Type:</strong> Slashing"));

    let fireball_html = render_html(fire);
    assert!(fireball_html.contains("<strong>Effect:</strong> Deals fire damage"));
    Ok(())
}

#[tokio::test]
async fn records_keep_fields_and_carry_origin() -> Result<()> {
    let dir = TempDir::new()?;
    let registry = weapons_and_spells(&dir)?;
    let catalog = load(&registry, &FsFetcher::new(dir.path())).await;

    let sword = catalog.records()[0].to_value();
    assert_eq!(
        sword,
        json!({
            "name": "Iron Sword",
            "damage": "1d6",
            "type": "Slashing",
            "tags": ["martial"],
            "category": "Weapons",
            "sourceId": "weapons.json"
        })
    );
    assert_eq!(catalog.records()[1].source_id(), &SourceId::from("spells.json"));
    Ok(())
}

#[tokio::test]
async fn failing_sources_do_not_affect_the_rest() -> Result<()> {
    let dir = TempDir::new()?;
    write_source(dir.path(), "classes.json", &json!([{"name": "Mage"}]))?;
    write_raw_source(dir.path(), "races.json", "{ not json")?;
    write_source(dir.path(), "lore.json", &json!([{"title": "The Sundering"}]))?;
    let registry = registry(&[
        ("classes.json", "Classes"),
        ("races.json", "Races"),
        ("missing.json", "Missing"),
        ("lore.json", "Lore"),
    ]);

    let (catalog, report) = load_with_report(&registry, &FsFetcher::new(dir.path())).await;
    let all: Vec<&Record> = catalog.iter().collect();
    assert_eq!(names(&all), vec!["Mage", "The Sundering"]);

    let outcomes: Vec<(&str, bool)> = report
        .sources
        .iter()
        .map(|entry| {
            (
                entry.source.identifier.as_str(),
                matches!(entry.outcome, SourceOutcome::Loaded { .. }),
            )
        })
        .collect();
    assert_eq!(
        outcomes,
        vec![
            ("classes.json", true),
            ("races.json", false),
            ("missing.json", false),
            ("lore.json", true)
        ]
    );
    Ok(())
}

#[tokio::test]
async fn identical_records_are_kept_independently() -> Result<()> {
    let dir = TempDir::new()?;
    write_source(
        dir.path(),
        "items.json",
        &json!([{"name": "Rope"}, {"name": "Rope"}]),
    )?;
    write_source(dir.path(), "npcs.json", &json!([{"name": "Rope"}]))?;
    let registry = registry(&[("items.json", "Items"), ("npcs.json", "NPCs")]);

    let catalog = load(&registry, &FsFetcher::new(dir.path())).await;
    let values: Vec<Value> = catalog.iter().map(Record::to_value).collect();
    assert_eq!(
        values,
        vec![
            json!({"name": "Rope", "category": "Items", "sourceId": "items.json"}),
            json!({"name": "Rope", "category": "Items", "sourceId": "items.json"}),
            json!({"name": "Rope", "category": "NPCs", "sourceId": "npcs.json"}),
        ]
    );

    let ropes = filter(&catalog, "rope", &CategoryFilter::All);
    assert_eq!(ropes.len(), 3);
    assert!(!std::ptr::eq(ropes[0], ropes[1]));
    assert_eq!(render(ropes).len(), 3);
    Ok(())
}

#[tokio::test]
async fn grouped_sources_contribute_only_arrays() -> Result<()> {
    let dir = TempDir::new()?;
    write_source(
        dir.path(),
        "creatures.json",
        &json!({
            "undead": [{"name": "Ghoul"}],
            "meta": {"name": "not a record"},
            "total": 2,
            "beasts": [{"name": "Wolf"}]
        }),
    )?;
    let registry = registry(&[("creatures.json", "Creatures")]);
    let catalog = load(&registry, &FsFetcher::new(dir.path())).await;

    let all: Vec<&Record> = catalog.iter().collect();
    assert_eq!(names(&all), vec!["Ghoul", "Wolf"]);
    assert!(catalog.iter().all(|record| record.category() == "Creatures"));
    Ok(())
}

#[tokio::test]
async fn http_sources_load_and_fail_independently() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalog/weapons.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"[{"name": "Longbow", "damage": "1d8", "type": "Piercing"}]"#),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/catalog/spells.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&format!("{}/catalog", server.uri()))?;
    let registry = registry(&[("weapons.json", "Weapons"), ("spells.json", "Spells")]);
    let (catalog, report) = load_with_report(&registry, &fetcher).await;

    let all: Vec<&Record> = catalog.iter().collect();
    assert_eq!(names(&all), vec!["Longbow"]);
    assert_eq!(report.loaded(), 1);
    let failed: Vec<&str> = report
        .failed()
        .map(|entry| entry.source.identifier.as_str())
        .collect();
    assert_eq!(failed, vec!["spells.json"]);
    Ok(())
}

#[tokio::test]
async fn bundled_data_loads_every_source() {
    let catalog = bundled_catalog().await;
    assert_eq!(catalog.len(), 30);
    for source in SourceRegistry::default().iter() {
        assert!(
            catalog
                .iter()
                .any(|record| record.source_id() == &source.identifier),
            "no records from {}",
            source.identifier
        );
    }
}

#[tokio::test]
async fn filter_laws_hold_on_bundled_data() {
    let catalog = bundled_catalog().await;

    let identity = filter(&catalog, "", &CategoryFilter::All);
    assert_eq!(identity.len(), catalog.len());
    assert!(
        identity
            .iter()
            .zip(catalog.iter())
            .all(|(kept, original)| std::ptr::eq(*kept, original))
    );

    for (query, category) in [
        ("fire", CategoryFilter::All),
        ("martial", CategoryFilter::parse("weapons.json")),
        ("e", CategoryFilter::parse("creatures.json")),
        ("healing", CategoryFilter::All),
    ] {
        let once = filter(&catalog, query, &category);
        let twice = filter(once.clone(), query, &category);
        assert_eq!(once, twice, "filter({query:?}) is not idempotent");

        if let CategoryFilter::Source(id) = &category {
            assert!(once.iter().all(|record| record.source_id() == id));
        }
    }

    assert_eq!(
        filter(&catalog, "FIRE", &CategoryFilter::All),
        filter(&catalog, "fire", &CategoryFilter::All)
    );
    let fire = filter(&catalog, "fire", &CategoryFilter::All);
    assert_eq!(names(&fire), vec!["Fireball", "The Ember Crown"]);
}

#[tokio::test]
async fn bundled_tag_index_is_sorted_and_unique() {
    let catalog = bundled_catalog().await;
    let tags = catalog.tag_index();
    let mut expected: Vec<String> = tags.tags().to_vec();
    expected.sort();
    expected.dedup();
    assert_eq!(tags.tags(), expected.as_slice());
    assert!(tags.contains("martial"));
    assert!(tags.contains("undead"));
}

#[tokio::test]
async fn tag_shortcut_searches_every_category() {
    let catalog = bundled_catalog().await;
    let mut session = BrowserSession::new(&catalog);
    session.set_category(CategoryFilter::parse("classes.json"));
    session.apply(&Shortcut::Tag("ice".to_string()));

    let results = session.results();
    assert_eq!(names(&results), vec!["Frost Ray", "Frostpeak"]);

    session.apply(&Shortcut::ShowAll);
    assert_eq!(session.results().len(), catalog.len());
}

#[test]
fn empty_results_render_one_no_results_fragment() {
    let catalog = Catalog::default();
    let fragments = render(filter(&catalog, "anything", &CategoryFilter::All));
    assert_eq!(fragments, vec![Fragment::NoResults]);
}

#[test]
fn browse_cli_prints_matching_records_as_json() -> Result<()> {
    let dir = TempDir::new()?;
    weapons_and_spells(&dir)?;
    let registry_path = write_registry(
        dir.path(),
        &[("weapons.json", "Weapons"), ("spells.json", "Spells")],
    )?;

    let mut cmd = catalog_command(BROWSE_BIN);
    cmd.arg("--root")
        .arg(dir.path())
        .arg("--registry")
        .arg(&registry_path)
        .arg("--query")
        .arg("FIRE")
        .arg("--format")
        .arg("json");
    let output = run_command(cmd)?;
    let records: Value = serde_json::from_slice(&output.stdout)?;
    let records = records.as_array().expect("json output is an array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["name"], json!("Fireball"));
    assert_eq!(records[0]["sourceId"], json!("spells.json"));
    assert_eq!(records[0]["category"], json!("Spells"));
    Ok(())
}

#[test]
fn browse_cli_renders_cards_and_no_results() -> Result<()> {
    let root = bundled_data_root();

    let mut cmd = catalog_command(BROWSE_BIN);
    cmd.arg("--root")
        .arg(&root)
        .arg("--category")
        .arg("weapons.json")
        .arg("--query")
        .arg("sword");
    let output = run_command(cmd)?;
    let html = String::from_utf8(output.stdout)?;
    assert_eq!(html.matches("<article class=\"card\">").count(), 1);
    assert!(html.contains("<h2>Iron Sword</h2>"));

    let mut cmd = catalog_command(BROWSE_BIN);
    cmd.arg("--root").arg(&root).arg("--query").arg("no such thing");
    let output = run_command(cmd)?;
    assert_eq!(String::from_utf8(output.stdout)?.trim(), "<p>No results found.</p>");
    Ok(())
}

#[test]
fn browse_cli_page_lists_categories_and_tags() -> Result<()> {
    let mut cmd = catalog_command(BROWSE_BIN);
    cmd.arg("--root")
        .arg(bundled_data_root())
        .arg("--tag")
        .arg("undead")
        .arg("--format")
        .arg("page");
    let output = run_command(cmd)?;
    let page = String::from_utf8(output.stdout)?;
    assert!(page.contains("<option value=\"all\" selected>All</option>"));
    assert!(page.contains("<option value=\"sheets.json\">Sheets</option>"));
    assert!(page.contains("data-query=\"undead\">undead</button>"));
    assert_eq!(page.matches("<article class=\"card\">").count(), 2);
    Ok(())
}

#[test]
fn browse_cli_rejects_unknown_category() -> Result<()> {
    let mut cmd = catalog_command(BROWSE_BIN);
    cmd.arg("--root")
        .arg(bundled_data_root())
        .arg("--category")
        .arg("dragons.json");
    let output = cmd.output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown category 'dragons.json'"));
    Ok(())
}

#[test]
fn tags_cli_prints_sorted_index() -> Result<()> {
    let dir = TempDir::new()?;
    weapons_and_spells(&dir)?;

    let mut cmd = catalog_command(TAGS_BIN);
    cmd.arg("--root")
        .arg(dir.path())
        .arg("--sources")
        .arg("weapons.json,spells.json");
    let output = run_command(cmd)?;
    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["area", "fire", "martial"]);

    let mut cmd = catalog_command(TAGS_BIN);
    cmd.arg("--root")
        .arg(dir.path())
        .arg("--sources")
        .arg("weapons.json")
        .arg("--json")
        .arg("--report");
    let output = run_command(cmd)?;
    let tags: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(tags, json!(["martial"]));
    assert!(String::from_utf8_lossy(&output.stderr).contains("weapons.json: 1 record(s)"));
    Ok(())
}
