//! Static HTML page: category selector, tag shortcuts, and the cards for
//! the session's current results.

use crate::catalog::{SourceRegistry, TagIndex};
use crate::render::escape_html;
use crate::session::{BrowserSession, Shortcut, category_options, shortcuts};

const PAGE_TITLE: &str = "Tabletop Catalog";

/// Render a complete document for the session state.
///
/// Shortcut buttons carry the query they apply in `data-query` so a page
/// script can replay them; the "All" button carries an empty query.
pub fn render_page(session: &BrowserSession<'_>, registry: &SourceRegistry, tags: &TagIndex) -> String {
    let selected = session.category().as_str();
    let options = category_options(registry)
        .into_iter()
        .map(|option| {
            let marker = if option.value == selected { " selected" } else { "" };
            format!(
                "      <option value=\"{}\"{marker}>{}</option>",
                escape_html(&option.value),
                escape_html(&option.label)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let buttons = shortcuts(tags)
        .iter()
        .map(|shortcut| {
            let query = match shortcut {
                Shortcut::ShowAll => "",
                Shortcut::Tag(tag) => tag.as_str(),
            };
            format!(
                "    <button class=\"filter-btn\" data-query=\"{}\">{}</button>",
                escape_html(query),
                escape_html(shortcut.label())
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let cards = session
        .fragments()
        .iter()
        .map(|fragment| fragment.to_html())
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>{PAGE_TITLE}</title>\n</head>\n<body>\n  <header>\n    <input id=\"searchInput\" type=\"search\" value=\"{query}\">\n    <select id=\"categorySelect\">\n{options}\n    </select>\n  </header>\n  <nav id=\"filters\">\n{buttons}\n  </nav>\n  <main class=\"card-container\">\n{cards}\n  </main>\n</body>\n</html>\n",
        query = escape_html(session.query()),
    )
}
