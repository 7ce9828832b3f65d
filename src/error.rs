//! Shared error types.

/// Error from the seam to the network-management service.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("network-management service is not available")]
    Unavailable,

    #[error("bus call {method} failed: {reason}")]
    Call { method: String, reason: String },
}

/// Error from agent lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Manager(#[from] ManagerError),
}
