use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Session lifecycle events surfaced by the bridge, for observers only.
/// Resolution logic never depends on these, and nothing requires that any
/// subscriber exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Pairing QR ready, as a `data:image/png;base64,...` payload.
    Qr { data_url: String },
    Authenticated,
    Ready,
    AuthFailure { message: String },
    Disconnected { reason: String },
}

impl SessionEvent {
    /// Stable event name, used for SSE event naming.
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Qr { .. } => "qr",
            SessionEvent::Authenticated => "authenticated",
            SessionEvent::Ready => "ready",
            SessionEvent::AuthFailure { .. } => "auth_failure",
            SessionEvent::Disconnected { .. } => "disconnected",
        }
    }
}

/// One-to-many fan-out of session events.
///
/// Thin wrapper over `tokio::sync::broadcast` so the bridge pump publishes
/// without knowing whether anyone is listening.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish to all current subscribers. Dropped silently when there are
    /// none.
    pub fn publish(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
