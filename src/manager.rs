//! Seam to the network-management service that owns agent registration.
//!
//! The agent never reaches for a global service handle; whoever constructs it
//! injects one of these. Availability changes are delivered out-of-band as a
//! `tokio::sync::watch` channel fed by the bus glue (see
//! [`UserAgent::watch_availability`](crate::agent::UserAgent::watch_availability)).

use async_trait::async_trait;

use crate::error::ManagerError;

/// Handle to the network-management service, scoped to what the agent needs.
#[async_trait]
pub trait ManagerHandle: Send + Sync {
    /// Whether the service is currently reachable.
    async fn is_available(&self) -> bool;

    /// Register `path` as the interactive agent for this session.
    /// Registration is assumed idempotent on the service side.
    async fn register_agent(&self, path: &str) -> Result<(), ManagerError>;

    /// Remove a previous registration of `path`.
    async fn unregister_agent(&self, path: &str) -> Result<(), ManagerError>;
}
