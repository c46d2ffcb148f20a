//! NerdHub core: pure state machine, domain models and view-model helpers.
mod auth;
mod effect;
pub mod games;
mod mappings;
mod msg;
pub mod operation;
mod prefs;
pub mod quotes;
mod state;
mod update;
pub mod version;
mod view_model;

pub use auth::{gate, AuthState, GatedPage, IdentityClaims, UserProfile};
pub use effect::Effect;
pub use games::{
    derive_filter_options, FilterOptions, Game, GameFilter, GameQuery, GameSort, GameSortField,
};
pub use mappings::{parse_app_ids, parse_steam_ids, MappingForm, UserMapping, Username};
pub use msg::Msg;
pub use operation::{
    OperationError, OperationId, OperationResult, OperationStatus, OperationTracker, PollPolicy,
    ProgressReport, ResultState, UpdateRequest,
};
pub use prefs::{SortDirection, ViewPreferences};
pub use quotes::{Quote, QuoteFilter, QuoteQuery, QuoteSort, QuoteSortField};
pub use state::{AppState, UpdateForm};
pub use update::update;
pub use version::VersionInfo;
pub use view_model::{
    AboutView, AdminView, AppViewModel, GameDetailView, GameRow, GamesView, MappingRow,
    OperationPhaseLabel, OperationView, QuotesView, VersionRow,
};
