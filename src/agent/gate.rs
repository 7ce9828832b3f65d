//! Connect-approval gate: tri-state prompt suppression with a timed reset.
//!
//! After any connect prompt is answered, the gate flips to `Suppress` so a
//! burst of `RequestConnect` calls cannot stack prompts while the first
//! decision is still pending. The application's connect reply arms a one-shot
//! timer that later forces the gate to `Clear`, ending the suppression window.

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

/// Policy applied to an incoming connect-approval prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatePolicy {
    /// Prompt is shown and forwarded to the application.
    #[default]
    Default,
    /// Prompt is auto-replied with "Suppress" and not forwarded.
    Suppress,
    /// Prompt is auto-replied with "Clear" and not forwarded.
    Clear,
}

impl GatePolicy {
    /// Parse the application's reply string; anything unrecognized maps to
    /// `Default`.
    pub fn from_reply(reply: &str) -> Self {
        match reply {
            "Suppress" => GatePolicy::Suppress,
            "Clear" => GatePolicy::Clear,
            _ => GatePolicy::Default,
        }
    }

    /// Wire form of the policy; `Default` is the empty string.
    pub fn as_reply(&self) -> &'static str {
        match self {
            GatePolicy::Default => "",
            GatePolicy::Suppress => "Suppress",
            GatePolicy::Clear => "Clear",
        }
    }
}

/// Gate state plus the one-shot reset task, if armed.
pub(crate) struct ConnectGate {
    policy: GatePolicy,
    reset_task: Option<JoinHandle<()>>,
}

impl ConnectGate {
    pub fn new() -> Self {
        Self {
            policy: GatePolicy::Default,
            reset_task: None,
        }
    }

    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: GatePolicy) {
        self.policy = policy;
    }

    /// Install a new reset task, aborting any previously armed one.
    pub fn arm_reset(&mut self, task: JoinHandle<()>) {
        if let Some(old) = self.reset_task.replace(task) {
            old.abort();
        }
    }

    /// Abort the reset task so it cannot fire into a torn-down agent.
    pub fn disarm(&mut self) {
        if let Some(task) = self.reset_task.take() {
            task.abort();
        }
    }
}

impl Drop for ConnectGate {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_round_trip() {
        assert_eq!(GatePolicy::from_reply("Suppress"), GatePolicy::Suppress);
        assert_eq!(GatePolicy::from_reply("Clear"), GatePolicy::Clear);
        assert_eq!(GatePolicy::from_reply(""), GatePolicy::Default);
        assert_eq!(GatePolicy::from_reply("anything"), GatePolicy::Default);

        assert_eq!(GatePolicy::Suppress.as_reply(), "Suppress");
        assert_eq!(GatePolicy::Clear.as_reply(), "Clear");
        assert_eq!(GatePolicy::Default.as_reply(), "");
    }

    #[test]
    fn test_initial_policy_is_default() {
        assert_eq!(ConnectGate::new().policy(), GatePolicy::Default);
    }
}
