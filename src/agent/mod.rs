//! Core agent logic.
//!
//! The agent coordinates:
//! - Unsolicited inbound calls from the network-management service
//! - The single pending input-request slot and its delayed reply
//! - The connect-approval gate and its timed reset
//! - Event delivery to the application layer
//! - Registration against the service, including re-registration on
//!   availability changes

pub mod events;
pub mod gate;
pub mod reply;
pub mod request;
mod useragent;

pub use events::{AgentEvent, AgentEvents, ConnectContext};
pub use gate::GatePolicy;
pub use reply::{InputReply, ReplyChannel, ReplyError, ReplyState, ReplyValues};
pub use request::InputField;
pub use useragent::{AgentConfig, DEFAULT_AGENT_PATH, UserAgent};
