use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use hub_logging::{hub_debug, hub_warn};
use nerdhub_client::{ClientHandle, HubApi, ReqwestHubApi};
use nerdhub_core::{update, AppState, AppViewModel, Msg, ViewPreferences};

use crate::config::AppConfig;
use crate::effects;

/// How long to wait for a client answer before ticking the core.
const TICK: Duration = Duration::from_millis(75);

/// Silence after which a still-busy session logs that it is waiting.
const STALL_WARNING: Duration = Duration::from_secs(30);

/// Tracks how long the session has waited for a client answer.
struct StallWatch {
    since: Instant,
    limit: Duration,
}

impl StallWatch {
    fn new(now: Instant, limit: Duration) -> Self {
        Self { since: now, limit }
    }

    fn answered(&mut self, now: Instant) {
        self.since = now;
    }

    /// Returns the silent period once it reaches the limit, then starts over.
    fn overdue(&mut self, now: Instant) -> Option<Duration> {
        let waited = now.saturating_duration_since(self.since);
        if waited < self.limit {
            return None;
        }
        self.since = now;
        Some(waited)
    }
}

/// One core state plus the client executing its effects.
pub struct Session {
    state: AppState,
    client: ClientHandle,
}

impl Session {
    pub fn connect(config: &AppConfig, prefs: ViewPreferences) -> Result<Self> {
        let settings = config.api_settings()?;
        let api = ReqwestHubApi::new(settings).context("Invalid API root")?;
        Self::with_api(config, prefs, Arc::new(api))
    }

    pub fn with_api(
        config: &AppConfig,
        prefs: ViewPreferences,
        api: Arc<dyn HubApi>,
    ) -> Result<Self> {
        let client = ClientHandle::new(api).context("Failed to start the client runtime")?;
        let state = AppState::new()
            .with_poll_policy(config.poll_policy)
            .with_client_version(config.client_version.clone());
        let mut session = Self { state, client };
        session.send(Msg::PreferencesRestored(prefs));
        Ok(session)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// Applies one message and hands its effects to the client.
    pub fn send(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            hub_debug!("Effect {:?}", effect);
            self.client.dispatch(effect);
        }
    }

    /// Sends `msg` and pumps client answers until nothing is in flight,
    /// calling `on_render` whenever the view changed.
    pub fn run(&mut self, msg: Msg, mut on_render: impl FnMut(&AppViewModel)) {
        self.send(msg);
        self.render_if_dirty(&mut on_render);
        let mut watch = StallWatch::new(Instant::now(), STALL_WARNING);
        while self.state.is_busy() {
            let msg = match self.client.recv_timeout(TICK) {
                Some(event) => {
                    watch.answered(Instant::now());
                    effects::to_msg(event)
                }
                None => {
                    if let Some(waited) = watch.overdue(Instant::now()) {
                        hub_warn!("No client answer for {}s, still waiting", waited.as_secs());
                    }
                    Msg::Tick
                }
            };
            self.send(msg);
            self.render_if_dirty(&mut on_render);
        }
    }

    /// `run` without intermediate rendering.
    pub fn run_quiet(&mut self, msg: Msg) {
        self.run(msg, |_| {});
    }

    /// Stops tracking any running operation and disarms its timer.
    pub fn close(&mut self) {
        if self.state.tracker().status().is_active() {
            self.send(Msg::AdminClosed);
        }
    }

    fn render_if_dirty(&mut self, on_render: &mut impl FnMut(&AppViewModel)) {
        if self.state.consume_dirty() {
            on_render(&self.state.view());
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
