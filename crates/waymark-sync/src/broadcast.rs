//! Best-effort wire message fan-out to replicas.
//!
//! Broadcast happens after the import has already been persisted, so a
//! replica being unreachable must never unwind the operation: each failure
//! is logged against its replica and the fan-out continues.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};
use waymark_core::{serialize_message, ReplicaId, SyncError, WireMessage};

/// The host's reliable, ordered, message-typed channel to its replicas.
///
/// Delivery order is guaranteed per replica by the host, not across
/// replicas.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Replicas currently connected.
    async fn connected(&self) -> Vec<ReplicaId>;

    /// Send one message to one replica.
    async fn send_to(&self, replica: &ReplicaId, bytes: Vec<u8>) -> Result<(), SyncError>;
}

/// How a fan-out went, for logging and operator notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BroadcastSummary {
    /// Replicas the message reached.
    pub delivered: usize,
    /// Replicas that could not be reached.
    pub unreachable: usize,
}

/// Fans wire messages out over the injected transport.
#[derive(Clone)]
pub struct Broadcaster {
    transport: Arc<dyn Transport>,
}

impl Broadcaster {
    /// Wrap a host transport handle.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send `msg` to every connected replica, isolating failures per
    /// replica.
    pub async fn broadcast(&self, msg: &WireMessage) -> Result<BroadcastSummary, SyncError> {
        let bytes = serialize_message(msg)?;
        let mut summary = BroadcastSummary::default();

        for replica in self.transport.connected().await {
            match self.transport.send_to(&replica, bytes.clone()).await {
                Ok(()) => {
                    debug!(%replica, "delivered broadcast message");
                    summary.delivered += 1;
                }
                Err(e) => {
                    let unavailable = SyncError::transport_unavailable(&replica, e);
                    warn!(%replica, error = %unavailable, "replica unreachable, continuing broadcast");
                    summary.unreachable += 1;
                }
            }
        }
        Ok(summary)
    }

    /// Send `msg` to a single replica. Used for GUI snapshot responses,
    /// which go to the requesting replica only.
    pub async fn send_to(&self, replica: &ReplicaId, msg: &WireMessage) -> Result<(), SyncError> {
        let bytes = serialize_message(msg)?;
        self.transport
            .send_to(replica, bytes)
            .await
            .map_err(|e| SyncError::transport_unavailable(replica, e))
    }
}
