//! View preferences kept under named keys.
//!
//! Storage is a flat string map so the persisted form stays readable and a
//! single bad value never poisons the rest: anything that fails to parse falls
//! back to its default.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::games::{GameSort, GameSortField};
use crate::quotes::{QuoteSort, QuoteSortField};

pub const GAMES_SORT_FIELD_KEY: &str = "games.sortField";
pub const GAMES_SORT_DIRECTION_KEY: &str = "games.sortDirection";
pub const GAMES_FREE_ONLY_KEY: &str = "games.freeOnly";
pub const GAMES_ON_SALE_ONLY_KEY: &str = "games.onSaleOnly";
pub const QUOTES_SORT_FIELD_KEY: &str = "quotes.sortField";
pub const QUOTES_SORT_DIRECTION_KEY: &str = "quotes.sortDirection";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewPreferences {
    pub games_sort: GameSort,
    pub games_free_only: bool,
    pub games_on_sale_only: bool,
    pub quotes_sort: QuoteSort,
}

impl ViewPreferences {
    pub fn from_entries(entries: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| entries.get(key).map(String::as_str);
        let flag = |key: &str, default: bool| get(key).and_then(parse_bool).unwrap_or(default);

        Self {
            games_sort: GameSort {
                field: get(GAMES_SORT_FIELD_KEY)
                    .and_then(GameSortField::parse)
                    .unwrap_or(defaults.games_sort.field),
                direction: get(GAMES_SORT_DIRECTION_KEY)
                    .and_then(SortDirection::parse)
                    .unwrap_or(defaults.games_sort.direction),
            },
            games_free_only: flag(GAMES_FREE_ONLY_KEY, defaults.games_free_only),
            games_on_sale_only: flag(GAMES_ON_SALE_ONLY_KEY, defaults.games_on_sale_only),
            quotes_sort: QuoteSort {
                field: get(QUOTES_SORT_FIELD_KEY)
                    .and_then(QuoteSortField::parse)
                    .unwrap_or(defaults.quotes_sort.field),
                direction: get(QUOTES_SORT_DIRECTION_KEY)
                    .and_then(SortDirection::parse)
                    .unwrap_or(defaults.quotes_sort.direction),
            },
        }
    }

    pub fn to_entries(&self) -> BTreeMap<String, String> {
        [
            (GAMES_SORT_FIELD_KEY, self.games_sort.field.as_str().to_string()),
            (GAMES_SORT_DIRECTION_KEY, self.games_sort.direction.as_str().to_string()),
            (GAMES_FREE_ONLY_KEY, self.games_free_only.to_string()),
            (GAMES_ON_SALE_ONLY_KEY, self.games_on_sale_only.to_string()),
            (QUOTES_SORT_FIELD_KEY, self.quotes_sort.field.as_str().to_string()),
            (QUOTES_SORT_DIRECTION_KEY, self.quotes_sort.direction.as_str().to_string()),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
