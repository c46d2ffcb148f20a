//! Long-running "update owned games" operation tracking.
//!
//! The tracker never touches a clock or a socket. It consumes launch, timer and
//! response notifications and answers with [`Effect`]s for the executor, so a
//! whole poll run can be replayed in tests by feeding messages in order.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Effect;

/// Opaque handle assigned by the backend when an operation starts.
pub type OperationId = String;

/// Label shown once the backend reports 100%.
pub const COMPLETED_PHASE: &str = "Completed";

/// Parameters for `start-update`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateRequest {
    /// Steam accounts whose owned games should be refreshed (request body).
    pub steam_ids: Vec<String>,
    /// Re-fetch data for games the backend already knows about.
    pub override_existing: bool,
    /// Restrict the update to these app ids; empty means all owned games.
    pub app_ids: Vec<u32>,
}

/// One status response from `update-progress/{operationId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    #[serde(default)]
    pub progress: i64,
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<f64>,
}

impl ProgressReport {
    /// Progress clamped into `0..=100`.
    pub fn percent(&self) -> u8 {
        self.progress.clamp(0, 100) as u8
    }

    pub fn is_terminal(&self) -> bool {
        self.progress >= 100
    }
}

/// Final payload of `update-result/{operationId}`.
///
/// The counters are what the dashboard summarises; anything else the backend
/// sends is kept in `details` for verbatim display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    #[serde(default, alias = "updatedCount")]
    pub updated: u32,
    #[serde(default, alias = "skippedCount")]
    pub skipped: u32,
    #[serde(default, alias = "failedCount")]
    pub failed: u32,
    #[serde(flatten)]
    pub details: BTreeMap<String, serde_json::Value>,
}

/// Poll pacing and the ceiling on a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay used when the server does not send `retryAfterSeconds`.
    pub default_delay: Duration,
    /// Upper bound applied to server-provided delays.
    pub max_delay: Duration,
    /// Maximum number of status requests before the run is failed.
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            default_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(300),
            max_attempts: Some(1800),
        }
    }
}

impl PollPolicy {
    /// Delay before the next tick given the server's suggestion.
    pub fn next_delay(&self, retry_after_seconds: Option<f64>) -> Duration {
        match retry_after_seconds {
            Some(secs) if secs.is_finite() && secs >= 0.0 => {
                let capped = secs.min(self.max_delay.as_secs_f64());
                Duration::from_secs_f64(capped)
            }
            _ => self.default_delay,
        }
    }

    fn attempts_exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// The job could not be started; no operation id exists.
    Launch(String),
    /// A status request failed; the operation is abandoned.
    Poll(String),
    /// Completion was observed but the result could not be retrieved.
    ResultUnavailable(String),
    /// The attempt ceiling was reached before the backend reported 100%.
    TimedOut { attempts: u32 },
}

impl std::fmt::Display for OperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationError::Launch(msg) => write!(f, "Failed to start update: {msg}"),
            OperationError::Poll(msg) => write!(f, "Failed to check update progress: {msg}"),
            OperationError::ResultUnavailable(msg) => write!(f, "Failed to fetch result: {msg}"),
            OperationError::TimedOut { attempts } => {
                write!(f, "Gave up waiting for the update after {attempts} status checks")
            }
        }
    }
}

/// What the poll loop is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Awaiting {
    /// A `SchedulePoll` timer is armed.
    Timer,
    /// A status request is in flight.
    Response,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OperationStatus {
    #[default]
    Idle,
    Launching,
    Polling {
        operation_id: OperationId,
        awaiting: Awaiting,
    },
    Completed {
        operation_id: OperationId,
    },
    Failed {
        operation_id: Option<OperationId>,
    },
}

impl OperationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OperationStatus::Completed { .. } | OperationStatus::Failed { .. }
        )
    }

    pub fn is_active(&self) -> bool {
        matches!(
            self,
            OperationStatus::Launching | OperationStatus::Polling { .. }
        )
    }

    fn polling_id(&self) -> Option<&str> {
        match self {
            OperationStatus::Polling { operation_id, .. } => Some(operation_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultState {
    #[default]
    NotRequested,
    Pending,
    Ready(OperationResult),
    Unavailable,
}

/// State machine for one update run at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OperationTracker {
    policy: PollPolicy,
    status: OperationStatus,
    progress: u8,
    phase: String,
    message: String,
    attempts: u32,
    result: ResultState,
    error: Option<OperationError>,
}

impl OperationTracker {
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    pub fn status(&self) -> &OperationStatus {
        &self.status
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn phase(&self) -> &str {
        &self.phase
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn result(&self) -> &ResultState {
        &self.result
    }

    pub fn error(&self) -> Option<&OperationError> {
        self.error.as_ref()
    }

    /// True while the executor still owes the tracker a message.
    pub fn is_busy(&self) -> bool {
        self.status.is_active() || matches!(self.result, ResultState::Pending)
    }

    /// Start a new run. Ignored while another run is launching or polling.
    pub fn launch(&mut self, request: UpdateRequest) -> Vec<Effect> {
        if self.status.is_active() {
            hub_logging::hub_debug!("Ignoring update launch while {:?}", self.status);
            return Vec::new();
        }
        *self = Self::new(self.policy);
        self.status = OperationStatus::Launching;
        self.phase = "Starting".to_string();
        vec![Effect::StartUpdate { request }]
    }

    pub fn launch_succeeded(&mut self, operation_id: OperationId) -> Vec<Effect> {
        if self.status != OperationStatus::Launching {
            hub_logging::hub_debug!("Dropping stale launch response for {}", operation_id);
            return Vec::new();
        }
        hub_logging::hub_info!("Update operation {} started", operation_id);
        self.attempts = 1;
        self.status = OperationStatus::Polling {
            operation_id: operation_id.clone(),
            awaiting: Awaiting::Response,
        };
        vec![Effect::PollProgress { operation_id }]
    }

    pub fn launch_failed(&mut self, message: String) -> Vec<Effect> {
        if self.status != OperationStatus::Launching {
            return Vec::new();
        }
        hub_logging::hub_warn!("Update launch failed: {}", message);
        self.fail(None, OperationError::Launch(message));
        Vec::new()
    }

    /// The timer armed by the last `SchedulePoll` fired.
    pub fn poll_due(&mut self, operation_id: &str) -> Vec<Effect> {
        let armed = matches!(
            &self.status,
            OperationStatus::Polling { operation_id: id, awaiting: Awaiting::Timer } if id == operation_id
        );
        if !armed {
            return Vec::new();
        }
        if self.policy.attempts_exhausted(self.attempts) {
            hub_logging::hub_warn!(
                "Operation {} exceeded {} status checks",
                operation_id,
                self.attempts
            );
            let attempts = self.attempts;
            return self.fail(
                Some(operation_id.to_string()),
                OperationError::TimedOut { attempts },
            );
        }
        self.attempts += 1;
        self.status = OperationStatus::Polling {
            operation_id: operation_id.to_string(),
            awaiting: Awaiting::Response,
        };
        vec![Effect::PollProgress {
            operation_id: operation_id.to_string(),
        }]
    }

    pub fn progress_received(&mut self, operation_id: &str, report: ProgressReport) -> Vec<Effect> {
        let in_flight = matches!(
            &self.status,
            OperationStatus::Polling { operation_id: id, awaiting: Awaiting::Response } if id == operation_id
        );
        if !in_flight {
            hub_logging::hub_debug!("Dropping progress for inactive operation {}", operation_id);
            return Vec::new();
        }

        if report.is_terminal() {
            hub_logging::hub_info!("Operation {} completed", operation_id);
            self.progress = 100;
            self.phase = COMPLETED_PHASE.to_string();
            self.message.clear();
            self.status = OperationStatus::Completed {
                operation_id: operation_id.to_string(),
            };
            self.result = ResultState::Pending;
            return vec![
                Effect::CancelPoll {
                    operation_id: operation_id.to_string(),
                },
                Effect::FetchResult {
                    operation_id: operation_id.to_string(),
                },
            ];
        }

        let percent = report.percent();
        if percent < self.progress {
            hub_logging::hub_debug!(
                "Operation {} reported {}% after {}%; keeping the higher value",
                operation_id,
                percent,
                self.progress
            );
        }
        self.progress = self.progress.max(percent);
        self.phase = report.phase;
        self.message = report.message;

        let delay = self.policy.next_delay(report.retry_after_seconds);
        self.status = OperationStatus::Polling {
            operation_id: operation_id.to_string(),
            awaiting: Awaiting::Timer,
        };
        vec![Effect::SchedulePoll {
            operation_id: operation_id.to_string(),
            delay,
        }]
    }

    pub fn poll_failed(&mut self, operation_id: &str, message: String) -> Vec<Effect> {
        if self.status.polling_id() != Some(operation_id) {
            return Vec::new();
        }
        hub_logging::hub_warn!("Polling {} failed: {}", operation_id, message);
        self.fail(Some(operation_id.to_string()), OperationError::Poll(message))
    }

    pub fn result_received(&mut self, operation_id: &str, result: OperationResult) {
        if self.awaits_result(operation_id) {
            self.result = ResultState::Ready(result);
        }
    }

    pub fn result_failed(&mut self, operation_id: &str, message: String) {
        if self.awaits_result(operation_id) {
            hub_logging::hub_warn!("Result for {} unavailable: {}", operation_id, message);
            self.result = ResultState::Unavailable;
            self.error = Some(OperationError::ResultUnavailable(message));
        }
    }

    /// The owning view went away: stop polling and forget the run.
    pub fn teardown(&mut self) -> Vec<Effect> {
        let effects = match &self.status {
            OperationStatus::Polling { operation_id, .. } => {
                hub_logging::hub_info!("Abandoning operation {}", operation_id);
                vec![Effect::CancelPoll {
                    operation_id: operation_id.clone(),
                }]
            }
            _ => Vec::new(),
        };
        *self = Self::new(self.policy);
        effects
    }

    fn awaits_result(&self, operation_id: &str) -> bool {
        matches!(&self.status, OperationStatus::Completed { operation_id: id } if id == operation_id)
            && self.result == ResultState::Pending
    }

    fn fail(&mut self, operation_id: Option<OperationId>, error: OperationError) -> Vec<Effect> {
        let effects = match &operation_id {
            Some(id) => vec![Effect::CancelPoll {
                operation_id: id.clone(),
            }],
            None => Vec::new(),
        };
        self.status = OperationStatus::Failed { operation_id };
        self.error = Some(error);
        effects
    }
}
