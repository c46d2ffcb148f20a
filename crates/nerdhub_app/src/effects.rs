use hub_logging::hub_warn;
use nerdhub_client::{ApiError, ClientEvent};
use nerdhub_core::Msg;

/// Turns a client answer into the message the core expects. Transport
/// failures are logged here and reduced to their user-visible text.
pub(crate) fn to_msg(event: ClientEvent) -> Msg {
    match event {
        ClientEvent::GamesLoaded(result) => Msg::GamesLoaded(text("games", result)),
        ClientEvent::UsernamesLoaded(result) => Msg::UsernamesLoaded(text("usernames", result)),
        ClientEvent::GameDetailsLoaded { appid, result } => Msg::GameDetailsLoaded {
            appid,
            result: text("game details", result),
        },
        ClientEvent::GameInfoRefreshed { appid, result } => Msg::GameRefreshed {
            appid,
            result: text("game refresh", result),
        },
        ClientEvent::QuotesLoaded(result) => Msg::QuotesLoaded(text("quotes", result)),
        ClientEvent::FeaturedQuoteLoaded(result) => {
            Msg::FeaturedQuoteLoaded(text("featured quote", result))
        }
        ClientEvent::QuoteDeleted { id, result } => Msg::QuoteDeleted {
            id,
            result: text("quote delete", result),
        },
        ClientEvent::UserMappingsLoaded(result) => {
            Msg::UserMappingsLoaded(text("user mappings", result))
        }
        ClientEvent::UserMappingSaved(result) => Msg::MappingSaved(text("user mapping", result)),
        ClientEvent::VersionLoaded(result) => Msg::VersionLoaded(text("version", result)),
        ClientEvent::UpdateStarted(result) => Msg::UpdateLaunched(text("start update", result)),
        ClientEvent::ProgressLoaded {
            operation_id,
            result,
        } => Msg::ProgressReceived {
            result: text("update progress", result),
            operation_id,
        },
        ClientEvent::ResultLoaded {
            operation_id,
            result,
        } => Msg::ResultReceived {
            result: text("update result", result),
            operation_id,
        },
        ClientEvent::PollDue { operation_id } => Msg::PollDue { operation_id },
    }
}

fn text<T>(what: &str, result: Result<T, ApiError>) -> Result<T, String> {
    result.map_err(|err| {
        hub_warn!("Request for {} failed ({}): {}", what, err.kind, err);
        err.message
    })
}
