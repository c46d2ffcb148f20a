use std::time::Duration;

use crate::{OperationId, UpdateRequest, UserMapping};

/// Work the executor performs on behalf of [`crate::update`]. Every request
/// effect is answered by exactly one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadGames,
    LoadUsernames { steam_ids: Vec<String> },
    LoadGameDetails { appid: u32 },
    RefreshGameInfo { appid: u32 },
    LoadQuotes,
    LoadRandomQuote,
    LoadDailyQuote,
    DeleteQuote { id: String },
    LoadUserMappings,
    SaveUserMapping { mapping: UserMapping },
    LoadVersion,
    /// Answered by `Msg::UpdateLaunched`.
    StartUpdate { request: UpdateRequest },
    /// Answered by `Msg::ProgressReceived`.
    PollProgress { operation_id: OperationId },
    /// Arm the poll timer; answered by `Msg::PollDue` after `delay`.
    SchedulePoll {
        operation_id: OperationId,
        delay: Duration,
    },
    /// Disarm the poll timer, if any. Never answered.
    CancelPoll { operation_id: OperationId },
    /// Answered by `Msg::ResultReceived`.
    FetchResult { operation_id: OperationId },
}
