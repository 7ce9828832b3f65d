//! Events the agent emits toward the application layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use uuid::Uuid;

use crate::agent::request::InputField;

/// Opaque correlation handle for one connect-approval prompt.
///
/// Stands in for the original call's addressing data; the immediate wire reply
/// has already been sent by the time the application sees this, so it is
/// informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectContext {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
}

impl ConnectContext {
    pub(crate) fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            received_at: Utc::now(),
        }
    }
}

/// Notification delivered to whichever application layer holds the queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AgentEvent {
    /// The service wants the listed fields filled in for `service`.
    /// Fields appear in the order the service submitted them.
    InputRequested {
        service: String,
        fields: Vec<InputField>,
    },
    /// The outstanding input request was withdrawn by the service.
    InputCanceled,
    /// The service reported a failure worth surfacing to the user.
    ErrorReported { message: String },
    /// A connect-approval prompt passed the gate.
    ConnectionRequested,
    /// Companion to `ConnectionRequested`, carrying the correlation context.
    /// Always emitted second.
    UserConnectRequested { context: ConnectContext },
}

/// Receiving side of the agent's event queue.
///
/// Events arrive in emission order. Dropping this detaches the application
/// layer; the agent keeps running and drops further events.
pub struct AgentEvents {
    rx: mpsc::UnboundedReceiver<AgentEvent>,
}

impl AgentEvents {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<AgentEvent>) -> Self {
        Self { rx }
    }

    /// Wait for the next event; `None` once the agent is gone.
    pub async fn recv(&mut self) -> Option<AgentEvent> {
        self.rx.recv().await
    }

    /// Take an already-queued event without waiting.
    pub fn try_recv(&mut self) -> Option<AgentEvent> {
        self.rx.try_recv().ok()
    }

    /// Adapt the queue into a `Stream` for combinator-style consumers.
    pub fn into_stream(self) -> UnboundedReceiverStream<AgentEvent> {
        UnboundedReceiverStream::new(self.rx)
    }
}
