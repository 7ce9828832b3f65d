//! One-shot reply channel for delayed wire replies.
//!
//! An input request arrives with an implicit promise of exactly one reply:
//! either the filled-in values or an error. The agent holds the sending half
//! ([`ReplyChannel`]) until the application decides; the bus glue awaits the
//! receiving half ([`InputReply`]). A state tag enforces the exactly-once
//! contract, and a discarded channel (cancel, shutdown) is distinguishable
//! from both terminal replies because no message is ever sent on it.

use std::collections::HashMap;

use tokio::sync::oneshot;

/// Field name to filled-in value, as sent back to the service.
pub type ReplyValues = HashMap<String, String>;

/// Reason an input request was answered with an error reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReplyError {
    /// The user declined to supply the requested input.
    #[error("canceled by user")]
    Canceled,

    /// Another input request was already in flight.
    #[error("input request already in progress")]
    Busy,
}

impl ReplyError {
    /// Wire-level error name understood by the network service.
    pub fn wire_name(&self) -> &'static str {
        match self {
            ReplyError::Canceled => "net.connman.Agent.Error.Canceled",
            ReplyError::Busy => "net.connman.Agent.Error.Rejected",
        }
    }
}

/// Lifecycle tag for a reply channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyState {
    /// No reply sent yet; `resolve`, `reject`, and `discard` are all legal.
    Open,
    /// A success reply carrying values was sent.
    Resolved,
    /// An error reply was sent.
    Rejected,
    /// Dropped without any wire reply.
    Discarded,
}

/// The sending half of one delayed-reply transaction.
pub struct ReplyChannel {
    state: ReplyState,
    tx: Option<oneshot::Sender<Result<ReplyValues, ReplyError>>>,
}

impl ReplyChannel {
    /// Create a fresh channel and the receiving handle for the bus glue.
    pub fn new() -> (Self, InputReply) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                state: ReplyState::Open,
                tx: Some(tx),
            },
            InputReply { rx },
        )
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ReplyState {
        self.state
    }

    /// Send the success reply. Panics if the channel is not open.
    pub fn resolve(&mut self, values: ReplyValues) {
        let tx = self.take_open(ReplyState::Resolved);
        if tx.send(Ok(values)).is_err() {
            tracing::warn!("Could not deliver input reply; caller is gone");
        }
    }

    /// Send an error reply. Panics if the channel is not open.
    pub fn reject(&mut self, error: ReplyError) {
        let tx = self.take_open(ReplyState::Rejected);
        if tx.send(Err(error)).is_err() {
            tracing::warn!("Could not deliver {} reply; caller is gone", error.wire_name());
        }
    }

    /// Drop the channel without sending a wire reply.
    ///
    /// Used on cancel and on agent shutdown. Panics if the channel is not open.
    pub fn discard(&mut self) {
        let _ = self.take_open(ReplyState::Discarded);
    }

    fn take_open(&mut self, next: ReplyState) -> oneshot::Sender<Result<ReplyValues, ReplyError>> {
        assert_eq!(
            self.state,
            ReplyState::Open,
            "reply channel used twice (already {:?})",
            self.state
        );
        self.state = next;
        self.tx.take().expect("open channel holds a sender")
    }
}

/// The receiving half: the (delayed) wire reply the service is waiting on.
pub struct InputReply {
    rx: oneshot::Receiver<Result<ReplyValues, ReplyError>>,
}

impl InputReply {
    /// Wait for the reply.
    ///
    /// `None` means the request was withdrawn without a wire reply (canceled
    /// or the agent shut down); the service side experiences a timeout.
    pub async fn wait(self) -> Option<Result<ReplyValues, ReplyError>> {
        self.rx.await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_delivers_values_once() {
        let (mut channel, handle) = ReplyChannel::new();
        let values = ReplyValues::from([("Passphrase".to_string(), "secret".to_string())]);
        channel.resolve(values.clone());

        assert_eq!(channel.state(), ReplyState::Resolved);
        assert_eq!(handle.wait().await, Some(Ok(values)));
    }

    #[tokio::test]
    async fn test_reject_delivers_error() {
        let (mut channel, handle) = ReplyChannel::new();
        channel.reject(ReplyError::Canceled);

        assert_eq!(channel.state(), ReplyState::Rejected);
        assert_eq!(handle.wait().await, Some(Err(ReplyError::Canceled)));
    }

    #[tokio::test]
    async fn test_discard_closes_without_reply() {
        let (mut channel, handle) = ReplyChannel::new();
        channel.discard();

        assert_eq!(channel.state(), ReplyState::Discarded);
        assert_eq!(handle.wait().await, None);
    }

    #[tokio::test]
    async fn test_resolve_survives_dropped_receiver() {
        let (mut channel, handle) = ReplyChannel::new();
        drop(handle);
        // Logged, not fatal: the caller sees a timeout.
        channel.resolve(ReplyValues::new());
        assert_eq!(channel.state(), ReplyState::Resolved);
    }

    #[tokio::test]
    #[should_panic(expected = "reply channel used twice")]
    async fn test_double_use_panics() {
        let (mut channel, _handle) = ReplyChannel::new();
        channel.resolve(ReplyValues::new());
        channel.reject(ReplyError::Canceled);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            ReplyError::Canceled.wire_name(),
            "net.connman.Agent.Error.Canceled"
        );
        assert_eq!(
            ReplyError::Busy.wire_name(),
            "net.connman.Agent.Error.Rejected"
        );
        assert_eq!(ReplyError::Canceled.to_string(), "canceled by user");
    }
}
