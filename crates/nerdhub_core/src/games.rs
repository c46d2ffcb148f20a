use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::prefs::SortDirection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Descriptor {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReleaseDate {
    #[serde(default)]
    pub coming_soon: bool,
    #[serde(default)]
    pub date: String,
}

/// Prices are in minor currency units (cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PriceOverview {
    #[serde(default)]
    pub initial: u32,
    #[serde(rename = "final", default)]
    pub final_price: u32,
    #[serde(default)]
    pub discount_percent: u32,
    #[serde(default)]
    pub final_formatted: Option<String>,
}

/// A game as stored by the backend (Steam store fields plus owners).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Game {
    pub appid: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub header_image: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub detailed_description: Option<String>,
    #[serde(default)]
    pub developers: Vec<String>,
    #[serde(default)]
    pub publishers: Vec<String>,
    #[serde(default)]
    pub genres: Vec<Descriptor>,
    #[serde(default)]
    pub categories: Vec<Descriptor>,
    #[serde(default)]
    pub release_date: Option<ReleaseDate>,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub price_overview: Option<PriceOverview>,
    #[serde(default, alias = "ownedBy")]
    pub owned_by: Vec<String>,
}

impl Game {
    /// Effective price in cents; free games cost nothing whatever the store says.
    pub fn price(&self) -> u32 {
        if self.is_free {
            return 0;
        }
        self.price_overview
            .as_ref()
            .map_or(0, |price| price.final_price)
    }

    pub fn discount(&self) -> u32 {
        self.price_overview
            .as_ref()
            .map_or(0, |price| price.discount_percent)
    }

    pub fn owner_count(&self) -> usize {
        self.owned_by.len()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c.description == category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameSortField {
    #[default]
    Name,
    Price,
    Discount,
    OwnerCount,
    AppId,
}

impl GameSortField {
    pub fn as_str(self) -> &'static str {
        match self {
            GameSortField::Name => "name",
            GameSortField::Price => "price",
            GameSortField::Discount => "discount",
            GameSortField::OwnerCount => "owners",
            GameSortField::AppId => "appid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Some(GameSortField::Name),
            "price" => Some(GameSortField::Price),
            "discount" => Some(GameSortField::Discount),
            "owners" | "ownercount" | "owner-count" => Some(GameSortField::OwnerCount),
            "appid" | "id" => Some(GameSortField::AppId),
            _ => None,
        }
    }
}

/// All predicates are AND-ed; empty selections match everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameFilter {
    pub search: String,
    /// The game must be owned by every selected steam id.
    pub owners: BTreeSet<String>,
    /// The game must carry every selected category.
    pub categories: BTreeSet<String>,
    pub free_only: bool,
    pub on_sale_only: bool,
}

impl GameFilter {
    pub fn matches(&self, game: &Game) -> bool {
        self.matches_search(game)
            && self
                .owners
                .iter()
                .all(|owner| game.owned_by.iter().any(|o| o == owner))
            && self
                .categories
                .iter()
                .all(|category| game.has_category(category))
            && (!self.free_only || game.is_free)
            && (!self.on_sale_only || game.discount() > 0)
    }

    fn matches_search(&self, game: &Game) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        game.name.to_lowercase().contains(&needle)
            || game
                .developers
                .iter()
                .chain(game.publishers.iter())
                .any(|who| who.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameSort {
    pub field: GameSortField,
    pub direction: SortDirection,
}

impl GameSort {
    /// Total order: every chain ends in the unique app id.
    pub fn compare(&self, a: &Game, b: &Game) -> Ordering {
        let by_name = || a.name.to_lowercase().cmp(&b.name.to_lowercase());
        let by_id = || a.appid.cmp(&b.appid);
        let ordering = match self.field {
            GameSortField::Name => by_name().then_with(by_id),
            GameSortField::Price => a.price().cmp(&b.price()).then_with(by_name).then_with(by_id),
            GameSortField::Discount => a
                .discount()
                .cmp(&b.discount())
                .then_with(|| a.price().cmp(&b.price()))
                .then_with(by_name)
                .then_with(by_id),
            GameSortField::OwnerCount => a
                .owner_count()
                .cmp(&b.owner_count())
                .then_with(|| a.price().cmp(&b.price()))
                .then_with(by_name)
                .then_with(by_id),
            GameSortField::AppId => by_id(),
        };
        self.direction.apply(ordering)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameQuery {
    pub filter: GameFilter,
    pub sort: GameSort,
}

impl GameQuery {
    pub fn apply<'a>(&self, games: &'a [Game]) -> Vec<&'a Game> {
        let mut visible: Vec<&Game> = games.iter().filter(|g| self.filter.matches(g)).collect();
        visible.sort_by(|a, b| self.sort.compare(a, b));
        visible
    }
}

/// Values a filter UI can offer for the current collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterOptions {
    pub owners: Vec<String>,
    pub categories: Vec<String>,
}

pub fn derive_filter_options(games: &[Game]) -> FilterOptions {
    let owners: BTreeSet<&str> = games
        .iter()
        .flat_map(|g| g.owned_by.iter().map(String::as_str))
        .collect();
    let categories: BTreeSet<&str> = games
        .iter()
        .flat_map(|g| g.categories.iter().map(|c| c.description.as_str()))
        .filter(|c| !c.is_empty())
        .collect();
    FilterOptions {
        owners: owners.into_iter().map(ToOwned::to_owned).collect(),
        categories: categories.into_iter().map(ToOwned::to_owned).collect(),
    }
}

/// Every distinct owner id across the collection, for the username lookup.
pub fn owner_ids(games: &[Game]) -> Vec<String> {
    derive_filter_options(games).owners
}

pub fn format_price(cents: u32) -> String {
    if cents == 0 {
        return "Free".to_string();
    }
    format!("${}.{:02}", cents / 100, cents % 100)
}
