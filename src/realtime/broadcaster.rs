use tokio::sync::broadcast;
use tracing::debug;

use super::{PushSender, WorkflowEvent};

/// Fire-and-forget fan-out for workflow events.
///
/// Publishing never fails and never blocks: in-process subscribers get the
/// event through a broadcast channel, and the optional push sender runs on
/// a spawned task. Neither path participates in the database transaction
/// that produced the event.
#[derive(Clone)]
pub struct Broadcaster {
    tx: broadcast::Sender<WorkflowEvent>,
    push: Option<PushSender>,
}

impl Broadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, push: None }
    }

    pub fn with_push(mut self, push: Option<PushSender>) -> Self {
        self.push = push;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: WorkflowEvent) {
        // A send error only means nobody is subscribed right now.
        if self.tx.send(event.clone()).is_err() {
            debug!(kind = event.kind.as_str(), "No realtime subscribers");
        }

        // Push notifications cover mission-level events only; task and
        // quality-check churn stays in-process.
        if !event.kind.is_mission_level() {
            return;
        }
        if let Some(push) = &self.push {
            let push = push.clone();
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(async move { push.send(&event).await });
                }
                Err(_) => {
                    debug!(kind = event.kind.as_str(), "No async runtime; push skipped");
                }
            }
        }
    }
}
