//! Pub/Sub Transport Seam
//!
//! Replication logic never talks to a concrete channel: it publishes and
//! subscribes through the [`PubSub`] trait, so the same-origin browser
//! transport, a server relay, or the in-process bus used by tests can be
//! substituted without touching the replicator.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::warn;

use crate::session::protocol::{SessionDescriptor, SessionMessage};

/// Transport failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PubSubError {
    #[error("channel closed")]
    Closed,
}

/// A lossy, unordered, full-message pub/sub channel.
///
/// Subscribers that fall behind may miss messages; the protocol is
/// level-triggered (latest snapshot wins), so that is acceptable by
/// contract.
pub trait PubSub: Send + Sync {
    /// Publish a message to every current subscriber. Publishing with no
    /// subscribers is not an error; the message is simply lost.
    fn publish(&self, message: SessionMessage) -> Result<(), PubSubError>;

    /// Open a subscription for all subsequent messages.
    fn subscribe(&self) -> broadcast::Receiver<SessionMessage>;
}

/// In-process bus over a tokio broadcast channel. Stands in for the
/// same-origin browser channel in tests and the demo binary.
pub struct LocalBus {
    tx: broadcast::Sender<SessionMessage>,
}

impl LocalBus {
    /// Create a bus retaining up to `capacity` in-flight messages per
    /// subscriber before old ones are dropped.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl PubSub for LocalBus {
    fn publish(&self, message: SessionMessage) -> Result<(), PubSubError> {
        // send() errors only when no receiver exists; a lossy channel
        // treats that as silence, not failure.
        let _ = self.tx.send(message);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionMessage> {
        self.tx.subscribe()
    }
}

// =============================================================================
// DURABLE DESCRIPTOR
// =============================================================================

/// The session descriptor as persisted across reloads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDescriptor {
    #[serde(flatten)]
    pub config: SessionDescriptor,
    pub saved_at: DateTime<Utc>,
}

impl StoredDescriptor {
    /// Stamp a descriptor for storage.
    pub fn new(config: SessionDescriptor) -> Self {
        Self {
            config,
            saved_at: Utc::now(),
        }
    }
}

/// Durable storage for the last session descriptor. The host persists
/// on start; either role consults it opportunistically on startup to
/// rejoin after a reload.
pub trait DescriptorStore: Send + Sync {
    fn save(&self, descriptor: &StoredDescriptor);
    fn load(&self) -> Option<StoredDescriptor>;
    fn clear(&self);
}

/// In-memory store that round-trips through JSON, matching the behavior
/// of string-valued browser storage.
#[derive(Default)]
pub struct MemoryDescriptorStore {
    slot: Mutex<Option<String>>,
}

impl MemoryDescriptorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DescriptorStore for MemoryDescriptorStore {
    fn save(&self, descriptor: &StoredDescriptor) {
        match serde_json::to_string(descriptor) {
            Ok(json) => {
                *self.slot.lock().expect("descriptor store poisoned") = Some(json);
            }
            Err(err) => warn!("failed to serialize session descriptor: {err}"),
        }
    }

    fn load(&self) -> Option<StoredDescriptor> {
        let slot = self.slot.lock().expect("descriptor store poisoned");
        let json = slot.as_deref()?;
        match serde_json::from_str(json) {
            Ok(descriptor) => Some(descriptor),
            Err(err) => {
                // Opportunistic consult: stale or foreign data is not an
                // error surface, just absence.
                warn!("stored session descriptor unreadable: {err}");
                None
            }
        }
    }

    fn clear(&self) {
        *self.slot.lock().expect("descriptor store poisoned") = None;
    }
}

// =============================================================================
// TESTS
// =============================================================================
