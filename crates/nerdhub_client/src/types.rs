use std::collections::BTreeMap;
use std::fmt;

use nerdhub_core::{
    Game, OperationId, OperationResult, ProgressReport, Quote, UserMapping, Username, VersionInfo,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
        }
    }
}

/// Answer to one request effect, produced on the client runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    GamesLoaded(Result<Vec<Game>, ApiError>),
    UsernamesLoaded(Result<BTreeMap<String, Username>, ApiError>),
    GameDetailsLoaded {
        appid: u32,
        result: Result<Game, ApiError>,
    },
    GameInfoRefreshed {
        appid: u32,
        result: Result<(), ApiError>,
    },
    QuotesLoaded(Result<Vec<Quote>, ApiError>),
    FeaturedQuoteLoaded(Result<Quote, ApiError>),
    QuoteDeleted {
        id: String,
        result: Result<(), ApiError>,
    },
    UserMappingsLoaded(Result<Vec<UserMapping>, ApiError>),
    UserMappingSaved(Result<(), ApiError>),
    VersionLoaded(Result<VersionInfo, ApiError>),
    UpdateStarted(Result<OperationId, ApiError>),
    ProgressLoaded {
        operation_id: OperationId,
        result: Result<ProgressReport, ApiError>,
    },
    ResultLoaded {
        operation_id: OperationId,
        result: Result<OperationResult, ApiError>,
    },
    /// A timer armed with `SchedulePoll` fired.
    PollDue { operation_id: OperationId },
}
