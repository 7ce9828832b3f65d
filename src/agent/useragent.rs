//! The user agent: protocol endpoint for interactive connectivity prompts.
//!
//! The network-management service calls in with unsolicited requests
//! (`RequestInput`, `RequestConnect`, `Cancel`, `ReportError`); the agent
//! serializes them against a single pending-request slot, relays them to the
//! application as [`AgentEvent`]s, and later pushes the user's decision back
//! through the retained reply channel.
//!
//! All inbound calls and the gate-reset timer mutate agent state inside short
//! critical sections under one mutex, so overlapping calls cannot corrupt the
//! at-most-one-pending-request invariant. No lock is held while application
//! code runs.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;

use crate::agent::events::{AgentEvent, AgentEvents, ConnectContext};
use crate::agent::gate::{ConnectGate, GatePolicy};
use crate::agent::reply::{InputReply, ReplyChannel, ReplyError, ReplyValues};
use crate::agent::request::{InputField, PendingRequest};
use crate::error::AgentError;
use crate::manager::ManagerHandle;

/// Registration path used when the config does not override it.
pub const DEFAULT_AGENT_PATH: &str = "/ConnectivityUserAgent";

/// Configuration for the user agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Object path under which the agent registers with the service.
    pub path: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_AGENT_PATH.to_string(),
        }
    }
}

impl AgentConfig {
    /// Override the registration path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

struct AgentState {
    pending: Option<PendingRequest>,
    gate: ConnectGate,
}

/// Protocol endpoint registered with the network-management service to field
/// interactive authentication and connect-approval prompts.
pub struct UserAgent {
    config: AgentConfig,
    manager: Arc<dyn ManagerHandle>,
    state: Arc<Mutex<AgentState>>,
    events_tx: mpsc::UnboundedSender<AgentEvent>,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl UserAgent {
    /// Create the agent and register it with the service if the service is
    /// up. Registration failure is logged, not fatal; it is retried on the
    /// next availability notification (see [`Self::watch_availability`]).
    ///
    /// Returns the agent and the event queue for the application layer.
    pub async fn new(config: AgentConfig, manager: Arc<dyn ManagerHandle>) -> (Self, AgentEvents) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let agent = Self {
            config,
            manager,
            state: Arc::new(Mutex::new(AgentState {
                pending: None,
                gate: ConnectGate::new(),
            })),
            events_tx,
            watcher: Mutex::new(None),
        };

        if agent.manager.is_available().await {
            // Clear any stale registration from a previous incarnation first.
            if let Err(e) = agent.manager.unregister_agent(&agent.config.path).await {
                tracing::debug!("Pre-registration cleanup failed: {}", e);
            }
            if let Err(e) = agent.manager.register_agent(&agent.config.path).await {
                tracing::warn!("Agent registration failed: {}", e);
            }
        }

        (agent, AgentEvents::new(events_rx))
    }

    /// Registration path this agent answers on.
    pub fn path(&self) -> &str {
        &self.config.path
    }

    /// Inbound `RequestInput`: the service wants `fields` filled in for
    /// `service`. The returned handle is the delayed wire reply.
    ///
    /// A request arriving while another is pending is rejected immediately
    /// with a busy error; the first request stays untouched and no event is
    /// emitted for the rejected one.
    pub async fn request_input(
        &self,
        service: impl Into<String>,
        fields: Vec<InputField>,
    ) -> InputReply {
        let service = service.into();
        let (mut channel, handle) = ReplyChannel::new();

        let mut state = self.state.lock().await;
        if state.pending.is_some() {
            drop(state);
            tracing::warn!(
                "Input request for {} while another is pending; rejecting as busy",
                service
            );
            channel.reject(ReplyError::Busy);
            return handle;
        }

        tracing::debug!("Input requested for {} ({} fields)", service, fields.len());
        state.pending = Some(PendingRequest {
            service: service.clone(),
            fields: fields.clone(),
            reply: channel,
        });
        drop(state);

        self.emit(AgentEvent::InputRequested { service, fields });
        handle
    }

    /// Inbound `Cancel`: the service withdrew the outstanding input request.
    ///
    /// The retained reply channel is discarded without a wire reply. Calling
    /// this with nothing pending is a no-op, not an error.
    pub async fn cancel(&self) {
        let mut state = self.state.lock().await;
        let Some(mut pending) = state.pending.take() else {
            return;
        };
        drop(state);

        tracing::debug!("Input request for {} canceled by service", pending.service);
        pending.reply.discard();
        self.emit(AgentEvent::InputCanceled);
    }

    /// Inbound `ReportError`: fire-and-forget failure report from the
    /// service. `service` is informational only.
    pub fn report_error(&self, service: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("Service {} reported error: {}", service, message);
        self.emit(AgentEvent::ErrorReported { message });
    }

    /// Inbound `RequestConnect`: returns the immediate wire reply computed
    /// from the current gate policy.
    ///
    /// Unless the gate is already suppressing, this emits
    /// `ConnectionRequested` then `UserConnectRequested` and flips the gate
    /// to `Suppress` so repeat prompts are auto-answered until the
    /// application replies (or the reset timer fires).
    pub async fn request_connect(&self) -> String {
        let mut state = self.state.lock().await;
        let policy = state.gate.policy();
        let reply = policy.as_reply().to_string();

        if policy == GatePolicy::Suppress {
            return reply;
        }
        state.gate.set_policy(GatePolicy::Suppress);
        drop(state);

        self.emit(AgentEvent::ConnectionRequested);
        self.emit(AgentEvent::UserConnectRequested {
            context: ConnectContext::new(),
        });
        reply
    }

    /// Inbound `RequestBrowser`: the service wants a captive-portal URL
    /// opened. Acknowledged and logged only.
    pub fn request_browser(&self, service: &str, url: &str) {
        tracing::debug!("Service {} wants browser opened at {}", service, url);
    }

    /// Inbound `Release`: the service dropped our registration. No-op
    /// acknowledgment.
    pub fn release(&self) {
        tracing::debug!("Agent released by service");
    }

    /// Application decision for the outstanding input request.
    ///
    /// Non-empty `values` resolve the wire reply; empty `values` reject it as
    /// canceled by the user. Either way the pending slot is cleared. Without
    /// a pending request this is a logged no-op.
    pub async fn submit_user_reply(&self, values: ReplyValues) {
        let mut state = self.state.lock().await;
        let Some(mut pending) = state.pending.take() else {
            tracing::warn!("Got reply for non-existing request");
            return;
        };
        drop(state);

        if values.is_empty() {
            pending.reply.reject(ReplyError::Canceled);
        } else {
            pending.reply.resolve(values);
        }
    }

    /// Application reply to a connect-approval prompt.
    ///
    /// Sets the gate from `reply` ("Suppress", "Clear", anything else maps to
    /// the default policy) and arms a one-shot timer that forces the gate to
    /// `Clear` once `timeout` elapses, ending the suppression window.
    pub async fn submit_connect_reply(&self, reply: &str, timeout: Duration) {
        let mut state = self.state.lock().await;
        state.gate.set_policy(GatePolicy::from_reply(reply));

        let shared = Arc::clone(&self.state);
        state.gate.arm_reset(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            shared.lock().await.gate.set_policy(GatePolicy::Clear);
            tracing::debug!("Connect-request window elapsed; gate reset to Clear");
        }));
    }

    /// Current gate policy, as reported to `RequestConnect` callers.
    pub async fn connect_policy(&self) -> GatePolicy {
        self.state.lock().await.gate.policy()
    }

    /// Follow service availability: every transition to available
    /// re-registers the agent. Replaces any previous watcher.
    pub async fn watch_availability(&self, mut availability: watch::Receiver<bool>) {
        let manager = Arc::clone(&self.manager);
        let path = self.config.path.clone();
        let task = tokio::spawn(async move {
            while availability.changed().await.is_ok() {
                if !*availability.borrow() {
                    continue;
                }
                tracing::debug!("Service became available; re-registering agent at {}", path);
                if let Err(e) = manager.register_agent(&path).await {
                    tracing::warn!("Agent re-registration failed: {}", e);
                }
            }
        });

        if let Some(old) = self.watcher.lock().await.replace(task) {
            old.abort();
        }
    }

    /// Tear the agent down: stop the watcher and reset timer, discard any
    /// pending request without a wire reply, and unregister from the service.
    pub async fn shutdown(&self) -> Result<(), AgentError> {
        if let Some(task) = self.watcher.lock().await.take() {
            task.abort();
        }

        let mut state = self.state.lock().await;
        state.gate.disarm();
        if let Some(mut pending) = state.pending.take() {
            tracing::debug!("Discarding pending request for {} on shutdown", pending.service);
            pending.reply.discard();
        }
        drop(state);

        self.manager.unregister_agent(&self.config.path).await?;
        Ok(())
    }

    fn emit(&self, event: AgentEvent) {
        if self.events_tx.send(event).is_err() {
            tracing::debug!("No application layer attached; dropping agent event");
        }
    }
}
