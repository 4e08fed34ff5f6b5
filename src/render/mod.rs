//! Card fragments for catalog records.
//!
//! [`render`] projects records into [`Fragment`]s; every field access falls
//! back to a placeholder or is omitted, so rendering never fails. HTML output
//! escapes all record text.

pub mod extensions;
pub mod page;

use crate::catalog::Record;
use crate::catalog::model::{ICON_FIELDS, LEVEL_FIELDS, MIN_LEVEL_FIELDS};
use serde::Serialize;

pub use extensions::{Supplement, SupplementField, supplement_for};
pub use page::render_page;

pub const UNNAMED: &str = "Unnamed";
pub const NO_RESULTS: &str = "No results found.";

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fragment {
    Card(Card),
    NoResults,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Card {
    pub title: String,
    pub icon: Option<String>,
    pub meta: String,
    pub level: Option<String>,
    pub min_level: Option<String>,
    pub badges: Vec<String>,
    pub description: String,
    pub supplement: Option<Supplement>,
}

/// One card per record, or a single [`Fragment::NoResults`] when empty.
pub fn render<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<Fragment> {
    let fragments: Vec<Fragment> = records
        .into_iter()
        .map(|record| Fragment::Card(Card::from_record(record)))
        .collect();
    if fragments.is_empty() {
        vec![Fragment::NoResults]
    } else {
        fragments
    }
}

/// Rendered fragments concatenated as HTML.
pub fn render_html<'a>(records: impl IntoIterator<Item = &'a Record>) -> String {
    render(records)
        .iter()
        .map(Fragment::to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

impl Card {
    pub fn from_record(record: &Record) -> Self {
        let title = record
            .display_name()
            .unwrap_or_else(|| UNNAMED.to_string());
        let badges = match record.tags() {
            Some(tags) => tags.into_iter().map(str::to_string).collect(),
            None => vec![record.category().to_string()],
        };
        Self {
            title,
            icon: record.text(ICON_FIELDS),
            meta: record.category().to_string(),
            level: record.rank_text(LEVEL_FIELDS),
            min_level: record.rank_text(MIN_LEVEL_FIELDS),
            badges,
            description: record.description().unwrap_or_default(),
            supplement: supplement_for(record),
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from("<article class=\"card\">\n");
        if let Some(icon) = &self.icon {
            html.push_str(&format!(
                "  <img class=\"card-icon\" src=\"{}\" alt=\"{}\">\n",
                escape_html(icon),
                escape_html(&self.title)
            ));
        }
        html.push_str(&format!("  <h2>{}</h2>\n", escape_html(&self.title)));

        let mut meta = escape_html(&self.meta);
        if let Some(level) = &self.level {
            meta.push_str(&format!(" · Level {}", escape_html(level)));
        }
        if let Some(min_level) = &self.min_level {
            meta.push_str(&format!(" · Min level: {}", escape_html(min_level)));
        }
        html.push_str(&format!("  <div class=\"meta\">{meta}</div>\n"));

        let badges = self
            .badges
            .iter()
            .map(|badge| format!("<span class=\"badge\">{}</span>", escape_html(badge)))
            .collect::<Vec<_>>()
            .join(" ");
        html.push_str(&format!("  <div>{badges}</div>\n"));
        html.push_str(&format!("  <p>{}</p>\n", escape_html(&self.description)));

        if let Some(lines) = &self.supplement {
            let body = lines
                .iter()
                .map(|line| {
                    line.iter()
                        .map(|field| {
                            format!(
                                "<strong>{}:</strong> {}",
                                field.label,
                                escape_html(&field.value)
                            )
                        })
                        .collect::<Vec<_>>()
                        .join(" · ")
                })
                .collect::<Vec<_>>()
                .join("<br>");
            html.push_str(&format!("  <p class=\"extra\">{body}</p>\n"));
        }
        html.push_str("</article>");
        html
    }
}

impl Fragment {
    pub fn to_html(&self) -> String {
        match self {
            Fragment::Card(card) => card.to_html(),
            Fragment::NoResults => format!("<p>{NO_RESULTS}</p>"),
        }
    }
}

/// Escape text for HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
