use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::prefs::SortDirection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    #[serde(default, alias = "quote")]
    pub text: String,
    #[serde(default, alias = "quotee")]
    pub author: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub added_by: Option<String>,
    /// ISO-8601 timestamp; compared as text.
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteSortField {
    #[default]
    Date,
    Author,
}

impl QuoteSortField {
    pub fn as_str(self) -> &'static str {
        match self {
            QuoteSortField::Date => "date",
            QuoteSortField::Author => "author",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Some(QuoteSortField::Date),
            "author" | "quotee" => Some(QuoteSortField::Author),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuoteFilter {
    pub search: String,
    /// Any of the selected authors.
    pub authors: BTreeSet<String>,
}

impl QuoteFilter {
    pub fn matches(&self, quote: &Quote) -> bool {
        let needle = self.search.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || quote.text.to_lowercase().contains(&needle)
            || quote.author.to_lowercase().contains(&needle)
            || quote
                .context
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&needle));
        search_ok && (self.authors.is_empty() || self.authors.contains(&quote.author))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteSort {
    pub field: QuoteSortField,
    pub direction: SortDirection,
}

impl Default for QuoteSort {
    fn default() -> Self {
        Self {
            field: QuoteSortField::Date,
            direction: SortDirection::Descending,
        }
    }
}

impl QuoteSort {
    pub fn compare(&self, a: &Quote, b: &Quote) -> Ordering {
        let by_date = || a.date.cmp(&b.date);
        let by_author = || a.author.to_lowercase().cmp(&b.author.to_lowercase());
        let by_id = || a.id.cmp(&b.id);
        let ordering = match self.field {
            QuoteSortField::Date => by_date().then_with(by_author).then_with(by_id),
            QuoteSortField::Author => by_author().then_with(by_date).then_with(by_id),
        };
        self.direction.apply(ordering)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuoteQuery {
    pub filter: QuoteFilter,
    pub sort: QuoteSort,
}

impl QuoteQuery {
    pub fn apply<'a>(&self, quotes: &'a [Quote]) -> Vec<&'a Quote> {
        let mut visible: Vec<&Quote> = quotes.iter().filter(|q| self.filter.matches(q)).collect();
        visible.sort_by(|a, b| self.sort.compare(a, b));
        visible
    }
}

pub fn quote_authors(quotes: &[Quote]) -> Vec<String> {
    let authors: BTreeSet<&str> = quotes
        .iter()
        .map(|q| q.author.as_str())
        .filter(|a| !a.is_empty())
        .collect();
    authors.into_iter().map(ToOwned::to_owned).collect()
}
