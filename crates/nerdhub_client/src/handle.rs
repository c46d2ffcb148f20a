use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use hub_logging::hub_debug;
use nerdhub_core::Effect;

use crate::timers::PollTimers;
use crate::{ClientEvent, HubApi};

/// Runs effects on a private tokio runtime and hands the answers back
/// through a channel the caller drains at its own pace.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<Effect>,
    event_rx: mpsc::Receiver<ClientEvent>,
}

impl ClientHandle {
    pub fn new(api: Arc<dyn HubApi>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Effect>();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("nerdhub-client".into())
            .spawn(move || {
                let mut timers = PollTimers::new();
                while let Ok(effect) = cmd_rx.recv() {
                    match effect {
                        Effect::SchedulePoll {
                            operation_id,
                            delay,
                        } => {
                            timers.schedule(
                                runtime.handle(),
                                operation_id,
                                delay,
                                event_tx.clone(),
                            );
                        }
                        Effect::CancelPoll { operation_id } => {
                            if timers.cancel(&operation_id) {
                                hub_debug!("Cancelled poll timer for {}", operation_id);
                            }
                        }
                        effect => {
                            let api = api.clone();
                            let event_tx = event_tx.clone();
                            runtime.spawn(async move {
                                if let Some(event) = execute(api.as_ref(), effect).await {
                                    let _ = event_tx.send(event);
                                }
                            });
                        }
                    }
                }
                timers.cancel_all();
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn dispatch(&self, effect: Effect) {
        let _ = self.cmd_tx.send(effect);
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ClientEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

/// Performs one request effect. Timer effects are handled by the command
/// loop and yield nothing here.
pub async fn execute(api: &dyn HubApi, effect: Effect) -> Option<ClientEvent> {
    let event = match effect {
        Effect::LoadGames => ClientEvent::GamesLoaded(api.games().await),
        Effect::LoadUsernames { steam_ids } => {
            ClientEvent::UsernamesLoaded(api.usernames(&steam_ids).await)
        }
        Effect::LoadGameDetails { appid } => ClientEvent::GameDetailsLoaded {
            appid,
            result: api.game_details(appid).await,
        },
        Effect::RefreshGameInfo { appid } => ClientEvent::GameInfoRefreshed {
            appid,
            result: api.refresh_game_info(appid).await,
        },
        Effect::LoadQuotes => ClientEvent::QuotesLoaded(api.quotes().await),
        Effect::LoadRandomQuote => ClientEvent::FeaturedQuoteLoaded(api.random_quote().await),
        Effect::LoadDailyQuote => ClientEvent::FeaturedQuoteLoaded(api.daily_quote().await),
        Effect::DeleteQuote { id } => {
            let result = api.delete_quote(&id).await;
            ClientEvent::QuoteDeleted { id, result }
        }
        Effect::LoadUserMappings => ClientEvent::UserMappingsLoaded(api.user_mappings().await),
        Effect::SaveUserMapping { mapping } => {
            ClientEvent::UserMappingSaved(api.save_user_mapping(&mapping).await)
        }
        Effect::LoadVersion => ClientEvent::VersionLoaded(api.version().await),
        Effect::StartUpdate { request } => {
            ClientEvent::UpdateStarted(api.start_update(&request).await)
        }
        Effect::PollProgress { operation_id } => {
            let result = api.update_progress(&operation_id).await;
            ClientEvent::ProgressLoaded {
                operation_id,
                result,
            }
        }
        Effect::FetchResult { operation_id } => {
            let result = api.update_result(&operation_id).await;
            ClientEvent::ResultLoaded {
                operation_id,
                result,
            }
        }
        Effect::SchedulePoll { .. } | Effect::CancelPoll { .. } => return None,
    };
    Some(event)
}
