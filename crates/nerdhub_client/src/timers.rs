use std::collections::HashMap;
use std::sync::mpsc;
use std::time::Duration;

use hub_logging::hub_trace;
use nerdhub_core::OperationId;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::ClientEvent;

/// One pending poll timer per operation.
///
/// Arming a timer for an id replaces the previous one, so at most one
/// `PollDue` can be outstanding for any operation.
#[derive(Debug, Default)]
pub struct PollTimers {
    pending: HashMap<OperationId, CancellationToken>,
}

impl PollTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(
        &mut self,
        runtime: &Handle,
        operation_id: OperationId,
        delay: Duration,
        events: mpsc::Sender<ClientEvent>,
    ) {
        let token = CancellationToken::new();
        if let Some(previous) = self.pending.insert(operation_id.clone(), token.clone()) {
            previous.cancel();
        }
        hub_trace!("Poll for {} due in {:?}", operation_id, delay);

        runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = events.send(ClientEvent::PollDue { operation_id });
                }
            }
        });
    }

    /// Returns whether a timer was armed for the id.
    pub fn cancel(&mut self, operation_id: &str) -> bool {
        match self.pending.remove(operation_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, token) in self.pending.drain() {
            token.cancel();
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Drop for PollTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
