use std::collections::BTreeSet;

use nerdhub_core::games::{Descriptor, PriceOverview};
use nerdhub_core::{
    derive_filter_options, update, AppState, Game, GameFilter, GameQuery, GameSort, GameSortField,
    Msg, Quote, QuoteFilter, QuoteQuery, QuoteSort, QuoteSortField, SortDirection, Username,
};
use pretty_assertions::assert_eq;

fn game(appid: u32, name: &str, price: u32, discount: u32, owners: &[&str]) -> Game {
    Game {
        appid,
        name: name.to_string(),
        price_overview: Some(PriceOverview {
            initial: price,
            final_price: price,
            discount_percent: discount,
            final_formatted: None,
        }),
        owned_by: owners.iter().map(|o| o.to_string()).collect(),
        ..Game::default()
    }
}

fn with_categories(mut game: Game, categories: &[&str]) -> Game {
    game.categories = categories
        .iter()
        .map(|c| Descriptor {
            description: c.to_string(),
        })
        .collect();
    game
}

fn ids(query: &GameQuery, games: &[Game]) -> Vec<u32> {
    query.apply(games).into_iter().map(|g| g.appid).collect()
}

fn sorted_by(field: GameSortField, direction: SortDirection) -> GameQuery {
    GameQuery {
        sort: GameSort { field, direction },
        ..GameQuery::default()
    }
}

#[test]
fn owner_count_ties_fall_back_to_price() {
    let games = vec![
        game(1, "Alpha", 1999, 0, &["a", "b"]),
        game(2, "Bravo", 499, 0, &["a", "b"]),
        game(3, "Charlie", 999, 0, &["a"]),
    ];

    assert_eq!(
        ids(
            &sorted_by(GameSortField::OwnerCount, SortDirection::Ascending),
            &games
        ),
        vec![3, 2, 1]
    );
    assert_eq!(
        ids(
            &sorted_by(GameSortField::OwnerCount, SortDirection::Descending),
            &games
        ),
        vec![1, 2, 3]
    );
}

#[test]
fn discount_ties_fall_back_to_price_then_name() {
    let games = vec![
        game(10, "Zulu", 999, 50, &[]),
        game(11, "Yankee", 999, 50, &[]),
        game(12, "Xray", 299, 50, &[]),
        game(13, "Whiskey", 100, 75, &[]),
    ];

    assert_eq!(
        ids(
            &sorted_by(GameSortField::Discount, SortDirection::Ascending),
            &games
        ),
        vec![12, 11, 10, 13]
    );
    assert_eq!(
        ids(
            &sorted_by(GameSortField::Discount, SortDirection::Descending),
            &games
        ),
        vec![13, 10, 11, 12]
    );
}

#[test]
fn identical_keys_resolve_by_app_id() {
    let games = vec![game(7, "Same", 100, 0, &[]), game(3, "Same", 100, 0, &[])];

    for field in [
        GameSortField::Name,
        GameSortField::Price,
        GameSortField::Discount,
        GameSortField::OwnerCount,
    ] {
        assert_eq!(
            ids(&sorted_by(field, SortDirection::Ascending), &games),
            vec![3, 7]
        );
        assert_eq!(
            ids(&sorted_by(field, SortDirection::Descending), &games),
            vec![7, 3]
        );
    }
}

#[test]
fn filters_compose_with_and() {
    let mut free = game(1, "Team Fortress 2", 0, 0, &["a", "b"]);
    free.is_free = true;
    let games = vec![
        with_categories(free, &["Multi-player"]),
        with_categories(game(2, "Portal 2", 999, 80, &["a", "b"]), &["Co-op"]),
        with_categories(game(3, "Portal", 499, 0, &["a"]), &["Single-player"]),
    ];

    let mut query = GameQuery::default();
    query.filter.owners = BTreeSet::from(["a".to_string(), "b".to_string()]);
    assert_eq!(ids(&query, &games), vec![2, 1]);

    query.filter.search = "portal".to_string();
    assert_eq!(ids(&query, &games), vec![2]);

    query.filter.on_sale_only = true;
    query.filter.categories = BTreeSet::from(["Single-player".to_string()]);
    assert!(ids(&query, &games).is_empty());

    let free_only = GameQuery {
        filter: GameFilter {
            free_only: true,
            ..GameFilter::default()
        },
        ..GameQuery::default()
    };
    assert_eq!(ids(&free_only, &games), vec![1]);
}

#[test]
fn filter_options_are_unique_and_sorted() {
    let games = vec![
        with_categories(game(1, "A", 0, 0, &["b", "a"]), &["Co-op", "Multi-player"]),
        with_categories(game(2, "B", 0, 0, &["a", "c"]), &["Co-op"]),
    ];
    let options = derive_filter_options(&games);
    assert_eq!(options.owners, vec!["a", "b", "c"]);
    assert_eq!(options.categories, vec!["Co-op", "Multi-player"]);
}

#[test]
fn loading_games_requests_owner_names() {
    let games = vec![game(1, "A", 0, 0, &["2", "1"]), game(2, "B", 0, 0, &["1"])];
    let (state, effects) = update(AppState::new(), Msg::GamesRequested);
    assert_eq!(effects, vec![nerdhub_core::Effect::LoadGames]);

    let (state, effects) = update(state, Msg::GamesLoaded(Ok(games)));
    assert_eq!(
        effects,
        vec![nerdhub_core::Effect::LoadUsernames {
            steam_ids: vec!["1".to_string(), "2".to_string()]
        }]
    );

    let names = [(
        "1".to_string(),
        Username {
            username: "gaben".to_string(),
            nickname: Some("Gabe".to_string()),
        },
    )]
    .into_iter()
    .collect();
    let (state, _) = update(state, Msg::UsernamesLoaded(Ok(names)));

    let view = state.view().games;
    assert_eq!(view.total, 2);
    assert_eq!(view.rows[0].owners, vec!["2", "Gabe"]);
    assert!(!state.is_busy());
}

#[test]
fn games_error_is_user_visible() {
    let (state, _) = update(AppState::new(), Msg::GamesRequested);
    let (state, effects) = update(state, Msg::GamesLoaded(Err("500 Internal Server Error".into())));
    assert!(effects.is_empty());
    assert_eq!(
        state.view().games.error.as_deref(),
        Some("Failed to load games: 500 Internal Server Error")
    );
}

fn quote(id: &str, author: &str, date: &str) -> Quote {
    Quote {
        id: id.to_string(),
        text: format!("said by {author}"),
        author: author.to_string(),
        date: Some(date.to_string()),
        ..Quote::default()
    }
}

#[test]
fn quotes_sort_by_author_then_date() {
    let quotes = vec![
        quote("1", "Bob", "2024-03-01"),
        quote("2", "alice", "2024-05-01"),
        quote("3", "Alice", "2024-01-01"),
    ];
    let query = QuoteQuery {
        sort: QuoteSort {
            field: QuoteSortField::Author,
            direction: SortDirection::Ascending,
        },
        ..QuoteQuery::default()
    };
    let order: Vec<&str> = query.apply(&quotes).into_iter().map(|q| q.id.as_str()).collect();
    assert_eq!(order, vec!["3", "2", "1"]);
}

#[test]
fn quotes_default_to_newest_first_and_filter_by_author() {
    let quotes = vec![
        quote("1", "Bob", "2024-03-01"),
        quote("2", "Alice", "2024-05-01"),
        quote("3", "Alice", "2024-01-01"),
    ];
    let mut query = QuoteQuery::default();
    let order: Vec<&str> = query.apply(&quotes).into_iter().map(|q| q.id.as_str()).collect();
    assert_eq!(order, vec!["2", "1", "3"]);

    query.filter = QuoteFilter {
        authors: BTreeSet::from(["Alice".to_string()]),
        ..QuoteFilter::default()
    };
    assert_eq!(query.apply(&quotes).len(), 2);
}

#[test]
fn deleted_quote_leaves_list_and_featured_slot() {
    let quotes = vec![quote("1", "Bob", "2024-03-01"), quote("2", "Alice", "2024-05-01")];
    let (state, _) = update(AppState::new(), Msg::QuotesLoaded(Ok(quotes)));
    let (state, _) = update(
        state,
        Msg::FeaturedQuoteLoaded(Ok(quote("1", "Bob", "2024-03-01"))),
    );

    let (state, effects) = update(state, Msg::QuoteDeleteRequested { id: "1".into() });
    assert_eq!(
        effects,
        vec![nerdhub_core::Effect::DeleteQuote { id: "1".into() }]
    );
    // Double click while the first delete is in flight.
    let (state, effects) = update(state, Msg::QuoteDeleteRequested { id: "1".into() });
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::QuoteDeleted {
            id: "1".into(),
            result: Ok(()),
        },
    );
    let view = state.view().quotes;
    assert_eq!(view.total, 1);
    assert_eq!(view.featured, None);
}
