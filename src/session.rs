//! Browsing state behind the search box, category selector, and tag
//! shortcut buttons.
//!
//! A session borrows a loaded [`Catalog`] and re-runs the filter on every
//! change, so results always reflect the latest input.

use crate::catalog::{
    ALL_CATEGORIES, Catalog, CategoryFilter, Record, SourceRegistry, TagIndex,
};
use crate::filter::filter;
use crate::render::{Fragment, render};

/// Label of the selector entry and shortcut that show every record.
pub const ALL_LABEL: &str = "All";

#[derive(Clone, Debug, Eq, PartialEq)]
/// A tag shortcut button.
pub enum Shortcut {
    /// Clear the query and show every category.
    ShowAll,
    /// Search for the tag across every category.
    Tag(String),
}

impl Shortcut {
    pub fn label(&self) -> &str {
        match self {
            Shortcut::ShowAll => ALL_LABEL,
            Shortcut::Tag(tag) => tag,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
/// One entry of the category selector.
pub struct CategoryOption {
    pub value: String,
    pub label: String,
}

/// "Show all" followed by one shortcut per tag, in index order.
pub fn shortcuts(tags: &TagIndex) -> Vec<Shortcut> {
    std::iter::once(Shortcut::ShowAll)
        .chain(tags.iter().map(|tag| Shortcut::Tag(tag.to_string())))
        .collect()
}

/// The `all` sentinel followed by every registered source.
pub fn category_options(registry: &SourceRegistry) -> Vec<CategoryOption> {
    std::iter::once(CategoryOption {
        value: ALL_CATEGORIES.to_string(),
        label: ALL_LABEL.to_string(),
    })
    .chain(registry.iter().map(|source| CategoryOption {
        value: source.identifier.to_string(),
        label: source.label.clone(),
    }))
    .collect()
}

#[derive(Clone, Debug)]
pub struct BrowserSession<'a> {
    catalog: &'a Catalog,
    query: String,
    category: CategoryFilter,
}

impl<'a> BrowserSession<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            query: String::new(),
            category: CategoryFilter::All,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
    }

    /// Apply a shortcut: tags search every category, "show all" resets.
    pub fn apply(&mut self, shortcut: &Shortcut) {
        match shortcut {
            Shortcut::ShowAll => self.query.clear(),
            Shortcut::Tag(tag) => self.query = tag.clone(),
        }
        self.category = CategoryFilter::All;
    }

    pub fn results(&self) -> Vec<&'a Record> {
        filter(self.catalog, &self.query, &self.category)
    }

    pub fn fragments(&self) -> Vec<Fragment> {
        render(self.results())
    }
}
