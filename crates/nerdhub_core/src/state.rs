use std::collections::{BTreeMap, BTreeSet};

use crate::view_model::{self, AppViewModel};
use crate::{
    AuthState, Game, GameQuery, MappingForm, OperationTracker, PollPolicy, Quote, QuoteQuery,
    UserMapping, Username, VersionInfo, ViewPreferences,
};

/// Raw text of the "update owned games" form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateForm {
    /// Comma separated steam ids.
    pub steam_ids: String,
    /// Optional comma separated app ids.
    pub app_ids: String,
    pub override_existing: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct GamesState {
    pub(crate) items: Vec<Game>,
    pub(crate) usernames: BTreeMap<String, Username>,
    pub(crate) query: GameQuery,
    pub(crate) loading: bool,
    pub(crate) usernames_loading: bool,
    pub(crate) error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct DetailState {
    pub(crate) appid: Option<u32>,
    pub(crate) game: Option<Game>,
    pub(crate) loading: bool,
    pub(crate) refreshing: bool,
    pub(crate) notice: Option<String>,
    pub(crate) error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct QuotesState {
    pub(crate) items: Vec<Quote>,
    pub(crate) query: QuoteQuery,
    pub(crate) featured: Option<Quote>,
    pub(crate) loading: bool,
    pub(crate) featured_loading: bool,
    pub(crate) deleting: BTreeSet<String>,
    pub(crate) error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct AdminState {
    pub(crate) form: UpdateForm,
    pub(crate) form_error: Option<String>,
    pub(crate) tracker: OperationTracker,
    pub(crate) mappings: Vec<UserMapping>,
    pub(crate) mapping_form: MappingForm,
    pub(crate) selected_mapping: Option<String>,
    pub(crate) mappings_loading: bool,
    pub(crate) saving_mapping: bool,
    pub(crate) error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct AboutState {
    pub(crate) info: Option<VersionInfo>,
    pub(crate) loading: bool,
    pub(crate) error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) client_version: Option<String>,
    pub(crate) auth: AuthState,
    pub(crate) games: GamesState,
    pub(crate) detail: DetailState,
    pub(crate) quotes: QuotesState,
    pub(crate) admin: AdminState,
    pub(crate) about: AboutState,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.admin.tracker = OperationTracker::new(policy);
        self
    }

    /// Version of this client, compared against the latest frontend tag.
    pub fn with_client_version(mut self, version: impl Into<String>) -> Self {
        self.client_version = Some(version.into());
        self
    }

    pub fn view(&self) -> AppViewModel {
        view_model::build(self, self.dirty)
    }

    pub fn tracker(&self) -> &OperationTracker {
        &self.admin.tracker
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    /// Current sort and toggle choices, for persisting.
    pub fn preferences(&self) -> ViewPreferences {
        ViewPreferences {
            games_sort: self.games.query.sort,
            games_free_only: self.games.query.filter.free_only,
            games_on_sale_only: self.games.query.filter.on_sale_only,
            quotes_sort: self.quotes.query.sort,
        }
    }

    pub fn game_query(&self) -> &GameQuery {
        &self.games.query
    }

    pub fn quote_query(&self) -> &QuoteQuery {
        &self.quotes.query
    }

    pub fn mapping_form(&self) -> &MappingForm {
        &self.admin.mapping_form
    }

    pub fn update_form(&self) -> &UpdateForm {
        &self.admin.form
    }

    /// True while any request effect is still waiting for its answer.
    pub fn is_busy(&self) -> bool {
        self.games.loading
            || self.games.usernames_loading
            || self.detail.loading
            || self.detail.refreshing
            || self.quotes.loading
            || self.quotes.featured_loading
            || !self.quotes.deleting.is_empty()
            || self.admin.mappings_loading
            || self.admin.saving_mapping
            || self.admin.tracker.is_busy()
            || self.about.loading
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
