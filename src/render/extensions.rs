//! Per-source supplementary fields shown under a card.
//!
//! The table is closed: a source gets a supplement only when its identifier
//! stem has an entry here. Adding a source means adding one row.

use crate::catalog::Record;
use crate::catalog::model::{EFFECT_FIELDS, value_text};
use serde::Serialize;
use serde_json::Value;

const MISSING: &str = "-";

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
/// One labelled value inside a supplement line.
pub struct SupplementField {
    pub label: &'static str,
    pub value: String,
}

/// Lines of labelled values; fields on one line render side by side.
pub type Supplement = Vec<Vec<SupplementField>>;

type Extension = fn(&Record) -> Supplement;

const EXTENSIONS: &[(&str, Extension)] = &[
    ("weapons", weapon),
    ("spells", spell),
    ("sheets", character_sheet),
    ("races", race),
    ("regions", region),
    ("armas", weapon),
    ("magias", spell),
    ("fichas", character_sheet),
    ("racas", race),
    ("regioes", region),
];

/// Supplement for `record`, if its source has a registered extension.
pub fn supplement_for(record: &Record) -> Option<Supplement> {
    let stem = record.source_id().stem();
    EXTENSIONS
        .iter()
        .find(|(key, _)| *key == stem)
        .map(|(_, extension)| extension(record))
}

fn field(label: &'static str, value: impl Into<String>) -> SupplementField {
    SupplementField {
        label,
        value: value.into(),
    }
}

fn text_or_missing(record: &Record, candidates: &[&str]) -> String {
    record
        .text(candidates)
        .unwrap_or_else(|| MISSING.to_string())
}

fn first_value<'a>(record: &'a Record, candidates: &[&str]) -> Option<&'a Value> {
    candidates
        .iter()
        .find_map(|key| record.get(key).filter(|value| !value.is_null()))
}

fn weapon(record: &Record) -> Supplement {
    vec![vec![
        field("Damage", text_or_missing(record, &["damage", "dano"])),
        field("Type", text_or_missing(record, &["type", "tipo"])),
    ]]
}

fn spell(record: &Record) -> Supplement {
    vec![vec![
        field("Cost", text_or_missing(record, &["mana_cost", "custo_mana"])),
        field("Effect", text_or_missing(record, EFFECT_FIELDS)),
    ]]
}

fn character_sheet(record: &Record) -> Supplement {
    let attributes = match first_value(record, &["attributes", "atributos"]) {
        Some(Value::Object(entries)) => entries
            .iter()
            .map(|(key, value)| format!("{key}:{}", scalar_display(value)))
            .collect::<Vec<_>>()
            .join(" · "),
        _ => String::new(),
    };
    vec![
        vec![
            field("Class", text_or_missing(record, &["class", "classe"])),
            field("Race", text_or_missing(record, &["race", "raça", "raca"])),
        ],
        vec![field("Attributes", attributes)],
    ]
}

fn race(record: &Record) -> Supplement {
    let bonus = first_value(record, &["attribute_bonus", "atributos_bonus"])
        .map(Value::to_string)
        .unwrap_or_default();
    vec![vec![field("Bonus", bonus)]]
}

fn region(record: &Record) -> Supplement {
    let hazards = match first_value(record, &["hazards", "perigos"]) {
        Some(Value::Array(items)) => items
            .iter()
            .map(scalar_display)
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => scalar_display(other),
        None => MISSING.to_string(),
    };
    vec![vec![field("Hazards", hazards)]]
}

/// Bare text for strings and numbers, compact JSON for everything else.
fn scalar_display(value: &Value) -> String {
    value_text(value).unwrap_or_else(|| match value {
        Value::String(_) => String::new(),
        other => other.to_string(),
    })
}
