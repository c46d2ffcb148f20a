use crate::games::{derive_filter_options, format_price, FilterOptions};
use crate::operation::{OperationStatus, ResultState};
use crate::quotes::quote_authors;
use crate::state::AppState;
use crate::version::{release_url, version_status, Component, VersionStatus};
use crate::{AuthState, Game, MappingForm, OperationResult, Quote};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub auth: AuthState,
    pub games: GamesView,
    pub detail: Option<GameDetailView>,
    pub quotes: QuotesView,
    pub admin: AdminView,
    pub about: AboutView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GamesView {
    pub rows: Vec<GameRow>,
    /// Size of the unfiltered collection.
    pub total: usize,
    pub filter_options: FilterOptions,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRow {
    pub appid: u32,
    pub name: String,
    pub price: String,
    pub discount: u32,
    /// Display names where known, steam ids otherwise.
    pub owners: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameDetailView {
    pub appid: u32,
    pub game: Option<Game>,
    pub loading: bool,
    pub refreshing: bool,
    pub notice: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuotesView {
    pub rows: Vec<Quote>,
    pub total: usize,
    pub authors: Vec<String>,
    pub featured: Option<Quote>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationPhaseLabel {
    #[default]
    Idle,
    Starting,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OperationView {
    pub state: OperationPhaseLabel,
    pub operation_id: Option<String>,
    pub progress: u8,
    pub phase: String,
    pub message: String,
    pub result: Option<OperationResult>,
    pub result_pending: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MappingRow {
    pub steam_id: String,
    pub username: String,
    pub nickname: Option<String>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdminView {
    pub form_error: Option<String>,
    pub operation: OperationView,
    pub mappings: Vec<MappingRow>,
    pub mapping_form: MappingForm,
    pub selected_mapping: Option<String>,
    /// "Update User" when editing an existing mapping, "Add User" otherwise.
    pub submit_label: &'static str,
    pub busy: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRow {
    pub component: Component,
    pub running: Option<String>,
    pub latest: Option<String>,
    pub status: VersionStatus,
    pub latest_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AboutView {
    pub rows: Vec<VersionRow>,
    pub loading: bool,
    pub error: Option<String>,
}

pub(crate) fn build(state: &AppState, dirty: bool) -> AppViewModel {
    AppViewModel {
        auth: state.auth.clone(),
        games: games_view(state),
        detail: detail_view(state),
        quotes: quotes_view(state),
        admin: admin_view(state),
        about: about_view(state),
        dirty,
    }
}

fn games_view(state: &AppState) -> GamesView {
    let games = &state.games;
    let owner_name = |steam_id: &String| {
        games
            .usernames
            .get(steam_id)
            .map(|name| name.display_name().to_string())
            .unwrap_or_else(|| steam_id.clone())
    };
    let rows = games
        .query
        .apply(&games.items)
        .into_iter()
        .map(|game| GameRow {
            appid: game.appid,
            name: game.name.clone(),
            price: format_price(game.price()),
            discount: game.discount(),
            owners: game.owned_by.iter().map(owner_name).collect(),
        })
        .collect();
    GamesView {
        rows,
        total: games.items.len(),
        filter_options: derive_filter_options(&games.items),
        loading: games.loading,
        error: games.error.clone(),
    }
}

fn detail_view(state: &AppState) -> Option<GameDetailView> {
    let detail = &state.detail;
    detail.appid.map(|appid| GameDetailView {
        appid,
        game: detail.game.clone(),
        loading: detail.loading,
        refreshing: detail.refreshing,
        notice: detail.notice.clone(),
        error: detail.error.clone(),
    })
}

fn quotes_view(state: &AppState) -> QuotesView {
    let quotes = &state.quotes;
    QuotesView {
        rows: quotes
            .query
            .apply(&quotes.items)
            .into_iter()
            .cloned()
            .collect(),
        total: quotes.items.len(),
        authors: quote_authors(&quotes.items),
        featured: quotes.featured.clone(),
        loading: quotes.loading || quotes.featured_loading,
        error: quotes.error.clone(),
    }
}

fn operation_view(state: &AppState) -> OperationView {
    let tracker = &state.admin.tracker;
    let (label, operation_id) = match tracker.status() {
        OperationStatus::Idle => (OperationPhaseLabel::Idle, None),
        OperationStatus::Launching => (OperationPhaseLabel::Starting, None),
        OperationStatus::Polling { operation_id, .. } => {
            (OperationPhaseLabel::Running, Some(operation_id.clone()))
        }
        OperationStatus::Completed { operation_id } => {
            (OperationPhaseLabel::Completed, Some(operation_id.clone()))
        }
        OperationStatus::Failed { operation_id } => {
            (OperationPhaseLabel::Failed, operation_id.clone())
        }
    };
    let result = match tracker.result() {
        ResultState::Ready(result) => Some(result.clone()),
        _ => None,
    };
    OperationView {
        state: label,
        operation_id,
        progress: tracker.progress(),
        phase: tracker.phase().to_string(),
        message: tracker.message().to_string(),
        result,
        result_pending: matches!(tracker.result(), ResultState::Pending),
        error: tracker.error().map(ToString::to_string),
    }
}

fn admin_view(state: &AppState) -> AdminView {
    let admin = &state.admin;
    AdminView {
        form_error: admin.form_error.clone(),
        operation: operation_view(state),
        mappings: admin
            .mappings
            .iter()
            .map(|m| MappingRow {
                steam_id: m.steam_id.clone(),
                username: m.username.clone(),
                nickname: m.nickname.clone(),
                label: m.option_label(),
            })
            .collect(),
        mapping_form: admin.mapping_form.clone(),
        selected_mapping: admin.selected_mapping.clone(),
        submit_label: if admin.selected_mapping.is_some() {
            "Update User"
        } else {
            "Add User"
        },
        busy: admin.mappings_loading || admin.saving_mapping || admin.tracker.is_busy(),
        error: admin.error.clone(),
    }
}

fn about_view(state: &AppState) -> AboutView {
    let about = &state.about;
    let info = about.info.clone().unwrap_or_default();
    let row = |component: Component, running: Option<String>, latest: Option<String>| {
        VersionRow {
            component,
            status: version_status(running.as_deref(), latest.as_deref()),
            latest_url: latest.as_deref().map(|tag| release_url(component, tag)),
            running,
            latest,
        }
    };
    let rows = if about.info.is_some() {
        vec![
            row(
                Component::Frontend,
                state.client_version.clone(),
                info.latest_frontend_git_tag,
            ),
            row(
                Component::Backend,
                info.backend_version,
                info.latest_backend_git_tag,
            ),
            row(Component::Discord, None, info.latest_discord_git_tag),
        ]
    } else {
        Vec::new()
    };
    AboutView {
        rows,
        loading: about.loading,
        error: about.error.clone(),
    }
}
