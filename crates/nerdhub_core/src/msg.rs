use std::collections::BTreeMap;

use crate::{
    AuthState, Game, GameQuery, MappingForm, OperationId, OperationResult, ProgressReport, Quote,
    QuoteQuery, UpdateForm, UserMapping, Username, VersionInfo, ViewPreferences,
};

/// Failures arrive as user-visible text; transport details stay in the client.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Previously saved view preferences were loaded.
    PreferencesRestored(ViewPreferences),
    /// Identity provider finished a login/logout/restore.
    AuthChanged(AuthState),

    GamesRequested,
    GamesLoaded(Result<Vec<Game>, String>),
    UsernamesLoaded(Result<BTreeMap<String, Username>, String>),
    GameQueryChanged(GameQuery),
    GameDetailsRequested { appid: u32 },
    GameDetailsLoaded { appid: u32, result: Result<Game, String> },
    /// Ask the backend to re-fetch store data for one game.
    GameRefreshRequested { appid: u32 },
    GameRefreshed { appid: u32, result: Result<(), String> },

    QuotesRequested,
    QuotesLoaded(Result<Vec<Quote>, String>),
    QuoteQueryChanged(QuoteQuery),
    RandomQuoteRequested,
    DailyQuoteRequested,
    FeaturedQuoteLoaded(Result<Quote, String>),
    QuoteDeleteRequested { id: String },
    QuoteDeleted { id: String, result: Result<(), String> },

    UserMappingsRequested,
    UserMappingsLoaded(Result<Vec<UserMapping>, String>),
    /// User picked an existing mapping to edit.
    MappingSelected { steam_id: String },
    MappingCleared,
    MappingFormChanged(MappingForm),
    MappingSubmitted,
    MappingSaved(Result<(), String>),

    UpdateFormChanged(UpdateForm),
    /// User submitted the "update owned games" form.
    UpdateSubmitted,
    UpdateLaunched(Result<OperationId, String>),
    /// The poll timer for this operation fired.
    PollDue { operation_id: OperationId },
    ProgressReceived {
        operation_id: OperationId,
        result: Result<ProgressReport, String>,
    },
    ResultReceived {
        operation_id: OperationId,
        result: Result<OperationResult, String>,
    },
    /// The admin view was torn down; stop tracking the running operation.
    AdminClosed,

    VersionRequested,
    VersionLoaded(Result<VersionInfo, String>),

    /// Render tick.
    Tick,
    NoOp,
}
