use hub_logging::{hub_debug, hub_warn};

use crate::games::owner_ids;
use crate::mappings::{parse_app_ids, parse_steam_ids};
use crate::state::{AboutState, AdminState, DetailState, GamesState, QuotesState};
use crate::{AppState, Effect, MappingForm, Msg, UpdateRequest};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let render_only = matches!(msg, Msg::Tick | Msg::NoOp);
    let effects = match msg {
        Msg::PreferencesRestored(prefs) => {
            state.games.query.sort = prefs.games_sort;
            state.games.query.filter.free_only = prefs.games_free_only;
            state.games.query.filter.on_sale_only = prefs.games_on_sale_only;
            state.quotes.query.sort = prefs.quotes_sort;
            Vec::new()
        }
        Msg::AuthChanged(auth) => {
            state.auth = auth;
            Vec::new()
        }

        Msg::GamesRequested => request_games(&mut state.games),
        Msg::GamesLoaded(result) => games_loaded(&mut state.games, result),
        Msg::UsernamesLoaded(result) => {
            state.games.usernames_loading = false;
            match result {
                Ok(names) => state.games.usernames = names,
                // Owners still render as raw steam ids.
                Err(err) => hub_warn!("Username lookup failed: {}", err),
            }
            Vec::new()
        }
        Msg::GameQueryChanged(query) => {
            state.games.query = query;
            Vec::new()
        }
        Msg::GameDetailsRequested { appid } => {
            state.detail = DetailState {
                appid: Some(appid),
                loading: true,
                ..DetailState::default()
            };
            vec![Effect::LoadGameDetails { appid }]
        }
        Msg::GameDetailsLoaded { appid, result } => {
            game_details_loaded(&mut state.detail, appid, result);
            Vec::new()
        }
        Msg::GameRefreshRequested { appid } => refresh_game(&mut state.detail, appid),
        Msg::GameRefreshed { appid, result } => game_refreshed(&mut state.detail, appid, result),

        Msg::QuotesRequested => {
            state.quotes.loading = true;
            state.quotes.error = None;
            vec![Effect::LoadQuotes]
        }
        Msg::QuotesLoaded(result) => {
            state.quotes.loading = false;
            match result {
                Ok(quotes) => state.quotes.items = quotes,
                Err(err) => state.quotes.error = Some(format!("Failed to load quotes: {err}")),
            }
            Vec::new()
        }
        Msg::QuoteQueryChanged(query) => {
            state.quotes.query = query;
            Vec::new()
        }
        Msg::RandomQuoteRequested => request_featured(&mut state.quotes, Effect::LoadRandomQuote),
        Msg::DailyQuoteRequested => request_featured(&mut state.quotes, Effect::LoadDailyQuote),
        Msg::FeaturedQuoteLoaded(result) => {
            state.quotes.featured_loading = false;
            match result {
                Ok(quote) => state.quotes.featured = Some(quote),
                Err(err) => state.quotes.error = Some(format!("Failed to load quote: {err}")),
            }
            Vec::new()
        }
        Msg::QuoteDeleteRequested { id } => {
            if state.quotes.deleting.insert(id.clone()) {
                vec![Effect::DeleteQuote { id }]
            } else {
                Vec::new()
            }
        }
        Msg::QuoteDeleted { id, result } => {
            quote_deleted(&mut state.quotes, id, result);
            Vec::new()
        }

        Msg::UserMappingsRequested => request_mappings(&mut state.admin),
        Msg::UserMappingsLoaded(result) => {
            state.admin.mappings_loading = false;
            match result {
                Ok(mappings) => state.admin.mappings = mappings,
                Err(err) => {
                    hub_warn!("Failed to fetch user mappings: {}", err);
                    state.admin.error = Some("Failed to fetch user mappings".to_string());
                }
            }
            Vec::new()
        }
        Msg::MappingSelected { steam_id } => {
            let admin = &mut state.admin;
            if let Some(mapping) = admin.mappings.iter().find(|m| m.steam_id == steam_id) {
                admin.mapping_form = MappingForm::from_mapping(mapping);
                admin.selected_mapping = Some(steam_id);
            } else {
                hub_debug!("Selected unknown mapping {}", steam_id);
            }
            Vec::new()
        }
        Msg::MappingCleared => {
            state.admin.selected_mapping = None;
            state.admin.mapping_form = MappingForm::default();
            Vec::new()
        }
        Msg::MappingFormChanged(form) => {
            state.admin.mapping_form = form;
            Vec::new()
        }
        Msg::MappingSubmitted => submit_mapping(&mut state.admin),
        Msg::MappingSaved(result) => mapping_saved(&mut state.admin, result),

        Msg::UpdateFormChanged(form) => {
            state.admin.form = form;
            Vec::new()
        }
        Msg::UpdateSubmitted => submit_update(&mut state.admin),
        Msg::UpdateLaunched(result) => match result {
            Ok(operation_id) => state.admin.tracker.launch_succeeded(operation_id),
            Err(err) => state.admin.tracker.launch_failed(err),
        },
        Msg::PollDue { operation_id } => state.admin.tracker.poll_due(&operation_id),
        Msg::ProgressReceived {
            operation_id,
            result,
        } => match result {
            Ok(report) => state.admin.tracker.progress_received(&operation_id, report),
            Err(err) => state.admin.tracker.poll_failed(&operation_id, err),
        },
        Msg::ResultReceived {
            operation_id,
            result,
        } => {
            match result {
                Ok(outcome) => state.admin.tracker.result_received(&operation_id, outcome),
                Err(err) => state.admin.tracker.result_failed(&operation_id, err),
            }
            Vec::new()
        }
        Msg::AdminClosed => state.admin.tracker.teardown(),

        Msg::VersionRequested => {
            state.about = AboutState {
                loading: true,
                ..AboutState::default()
            };
            vec![Effect::LoadVersion]
        }
        Msg::VersionLoaded(result) => {
            state.about.loading = false;
            match result {
                Ok(info) => state.about.info = Some(info),
                Err(err) => {
                    hub_warn!("Version lookup failed: {}", err);
                    state.about.error =
                        Some("Error fetching backend version and git tags.".to_string());
                }
            }
            Vec::new()
        }

        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    if !render_only {
        state.mark_dirty();
    }
    (state, effects)
}

fn request_games(games: &mut GamesState) -> Vec<Effect> {
    if games.loading {
        return Vec::new();
    }
    games.loading = true;
    games.error = None;
    vec![Effect::LoadGames]
}

fn games_loaded(games: &mut GamesState, result: Result<Vec<crate::Game>, String>) -> Vec<Effect> {
    games.loading = false;
    match result {
        Ok(items) => {
            games.items = items;
            let steam_ids = owner_ids(&games.items);
            if steam_ids.is_empty() {
                return Vec::new();
            }
            games.usernames_loading = true;
            vec![Effect::LoadUsernames { steam_ids }]
        }
        Err(err) => {
            games.error = Some(format!("Failed to load games: {err}"));
            Vec::new()
        }
    }
}

fn game_details_loaded(detail: &mut DetailState, appid: u32, result: Result<crate::Game, String>) {
    if detail.appid != Some(appid) {
        return;
    }
    detail.loading = false;
    match result {
        Ok(game) => detail.game = Some(game),
        Err(err) => {
            hub_warn!("Failed to fetch game details for {}: {}", appid, err);
            detail.error = Some("Game not found.".to_string());
        }
    }
}

fn refresh_game(detail: &mut DetailState, appid: u32) -> Vec<Effect> {
    if detail.refreshing {
        return Vec::new();
    }
    if detail.appid != Some(appid) {
        *detail = DetailState {
            appid: Some(appid),
            ..DetailState::default()
        };
    }
    detail.refreshing = true;
    detail.notice = None;
    detail.error = None;
    vec![Effect::RefreshGameInfo { appid }]
}

fn game_refreshed(detail: &mut DetailState, appid: u32, result: Result<(), String>) -> Vec<Effect> {
    if detail.appid != Some(appid) {
        return Vec::new();
    }
    detail.refreshing = false;
    match result {
        Ok(()) => {
            detail.notice = Some("Game info updated".to_string());
            detail.loading = true;
            vec![Effect::LoadGameDetails { appid }]
        }
        Err(err) => {
            detail.error = Some(format!("Failed to update game info: {err}"));
            Vec::new()
        }
    }
}

fn request_featured(quotes: &mut QuotesState, effect: Effect) -> Vec<Effect> {
    if quotes.featured_loading {
        return Vec::new();
    }
    quotes.featured_loading = true;
    quotes.error = None;
    vec![effect]
}

fn quote_deleted(quotes: &mut QuotesState, id: String, result: Result<(), String>) {
    if !quotes.deleting.remove(&id) {
        return;
    }
    match result {
        Ok(()) => {
            quotes.items.retain(|q| q.id != id);
            if quotes.featured.as_ref().is_some_and(|q| q.id == id) {
                quotes.featured = None;
            }
        }
        Err(err) => quotes.error = Some(format!("Failed to delete quote: {err}")),
    }
}

fn request_mappings(admin: &mut AdminState) -> Vec<Effect> {
    if admin.mappings_loading {
        return Vec::new();
    }
    admin.mappings_loading = true;
    vec![Effect::LoadUserMappings]
}

fn submit_mapping(admin: &mut AdminState) -> Vec<Effect> {
    if admin.saving_mapping {
        return Vec::new();
    }
    match admin.mapping_form.to_mapping() {
        Ok(mapping) => {
            admin.saving_mapping = true;
            admin.error = None;
            vec![Effect::SaveUserMapping { mapping }]
        }
        Err(reason) => {
            admin.error = Some(reason.to_string());
            Vec::new()
        }
    }
}

fn mapping_saved(admin: &mut AdminState, result: Result<(), String>) -> Vec<Effect> {
    admin.saving_mapping = false;
    match result {
        Ok(()) => {
            admin.mapping_form = MappingForm::default();
            admin.selected_mapping = None;
            request_mappings(admin)
        }
        Err(err) => {
            admin.error = Some(format!("Failed to update user mapping: {err}"));
            Vec::new()
        }
    }
}

fn submit_update(admin: &mut AdminState) -> Vec<Effect> {
    let steam_ids = parse_steam_ids(&admin.form.steam_ids);
    if steam_ids.is_empty() {
        admin.form_error = Some("Enter at least one Steam ID".to_string());
        return Vec::new();
    }
    admin.form_error = None;
    let request = UpdateRequest {
        steam_ids,
        override_existing: admin.form.override_existing,
        app_ids: parse_app_ids(&admin.form.app_ids),
    };
    admin.tracker.launch(request)
}
