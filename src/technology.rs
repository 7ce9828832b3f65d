//! Read-side mirror of per-technology properties.
//!
//! The bus glue seeds the mirror with a full snapshot at construction and
//! patches it one property at a time as change notifications arrive. Updates
//! are serialized by the bus dispatch, so a plain map suffices; there is no
//! coordination logic here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// Cached record for one technology object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Technology {
    pub name: String,
    /// "Type" on the wire, e.g. "wifi" or "ethernet".
    pub kind: String,
    pub powered: bool,
    pub connected: bool,
}

/// Error outcome of a scan operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("scan failed: {0}")]
    Failed(String),

    /// The glue dropped the completion without answering.
    #[error("scan abandoned")]
    Abandoned,
}

/// Pending scan operation, completed by the bus glue.
pub struct ScanHandle {
    rx: oneshot::Receiver<Result<(), String>>,
}

impl ScanHandle {
    /// Wait for the scan to finish.
    pub async fn wait(self) -> Result<(), ScanError> {
        match self.rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(reason)) => Err(ScanError::Failed(reason)),
            Err(_) => Err(ScanError::Abandoned),
        }
    }
}

/// Completion side handed to the bus glue when a scan is requested.
pub struct ScanCompletion {
    tx: oneshot::Sender<Result<(), String>>,
}

impl ScanCompletion {
    /// Report the scan outcome. Dropping instead marks the scan abandoned.
    pub fn finish(self, result: Result<(), String>) {
        let _ = self.tx.send(result);
    }
}

/// Mirror of technology records, keyed by object path.
#[derive(Default)]
pub struct TechnologyMirror {
    entries: HashMap<String, Technology>,
}

impl TechnologyMirror {
    /// Build the mirror from a full property snapshot.
    pub fn new(snapshot: impl IntoIterator<Item = (String, Technology)>) -> Self {
        Self {
            entries: snapshot.into_iter().collect(),
        }
    }

    pub fn get(&self, path: &str) -> Option<&Technology> {
        self.entries.get(path)
    }

    /// A technology appeared on the bus.
    pub fn insert(&mut self, path: impl Into<String>, technology: Technology) {
        self.entries.insert(path.into(), technology);
    }

    /// A technology disappeared from the bus.
    pub fn remove(&mut self, path: &str) -> Option<Technology> {
        self.entries.remove(path)
    }

    /// Patch one property from a change notification.
    ///
    /// Unknown paths, unknown properties, and mistyped values are ignored at
    /// debug level; the notification stream is not trusted to be exhaustive.
    pub fn apply_change(&mut self, path: &str, property: &str, value: &serde_json::Value) {
        let Some(entry) = self.entries.get_mut(path) else {
            tracing::debug!("Property change for unknown technology {}", path);
            return;
        };
        match (property, value) {
            ("Name", serde_json::Value::String(name)) => entry.name = name.clone(),
            ("Type", serde_json::Value::String(kind)) => entry.kind = kind.clone(),
            ("Powered", serde_json::Value::Bool(powered)) => entry.powered = *powered,
            ("Connected", serde_json::Value::Bool(connected)) => entry.connected = *connected,
            _ => {
                tracing::debug!("Ignoring property {} on {}", property, path);
            }
        }
    }

    /// Start a scan of `path`; the glue drives the wire call and reports back
    /// through the returned completion.
    pub fn request_scan(&self, path: &str) -> (ScanCompletion, ScanHandle) {
        tracing::debug!("Scan requested for {}", path);
        let (tx, rx) = oneshot::channel();
        (ScanCompletion { tx }, ScanHandle { rx })
    }
}
