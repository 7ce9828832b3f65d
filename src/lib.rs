//! User-agent state machine for interactive network connectivity prompts.
//!
//! A connectivity UI embeds [`UserAgent`] and registers it with the
//! network-management service. The service then calls in with authentication
//! requests and connect-approval prompts; the agent serializes them against a
//! single pending-request slot, forwards them to the UI as [`AgentEvent`]s,
//! and relays the user's decision back over the original call's delayed reply
//! channel.
//!
//! Flow: service → agent inbound call → [`AgentEvent`] → application decision
//! → [`UserAgent::submit_user_reply`] / [`UserAgent::submit_connect_reply`] →
//! wire reply.
//!
//! Bus plumbing stays outside: the service side is injected as a
//! [`ManagerHandle`], availability changes arrive over a `watch` channel, and
//! delayed replies surface as [`agent::InputReply`] handles for the glue to
//! await.

pub mod agent;
pub mod error;
pub mod manager;
pub mod technology;

pub use agent::{
    AgentConfig, AgentEvent, AgentEvents, ConnectContext, DEFAULT_AGENT_PATH, GatePolicy,
    InputField, InputReply, ReplyError, ReplyValues, UserAgent,
};
pub use error::{AgentError, ManagerError};
pub use manager::ManagerHandle;
pub use technology::{ScanError, Technology, TechnologyMirror};
