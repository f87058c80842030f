//! Schema-versioned wire messages for server/replica traffic.
//!
//! The transport is an external collaborator: a reliable, ordered,
//! message-typed channel between one server and any number of client
//! replicas. This module only defines the payloads and the byte codec used
//! on that channel.

use crate::error::SyncError;
use crate::position::Vec3;
use crate::waypoint::Waypoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current wire schema version.
pub const WIRE_SCHEMA_VERSION: u16 = 1;

/// Identity of a connected client replica (the host's player uid).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReplicaId(pub String);

impl ReplicaId {
    /// Wrap a host player uid.
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }
}

impl fmt::Display for ReplicaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server -> all replicas: the accepted subset of a completed import merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportUpdate {
    /// Accepted waypoints, in the server's absolute frame.
    pub waypoints: Vec<Waypoint>,
    /// The server's (flattened) spawn origin at merge time.
    pub origin_pos: Vec3,
}

/// Replica -> server: one informational ack per processed [`ImportUpdate`].
///
/// Fire-and-forget: never retried, never required for correctness, consumed
/// only for an operator-visible notification line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportAck {
    /// Human-readable application summary, e.g. `"3 waypoints added to map."`
    pub summary: String,
}

/// Replica -> server: request the canonical waypoints for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuiSnapshotRequest;

/// Server -> requesting replica only: the canonical waypoints plus origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuiSnapshotResponse {
    /// Canonical waypoints in the server's absolute frame.
    pub waypoints: Vec<Waypoint>,
    /// The server's spawn origin.
    pub origin_pos: Vec3,
}

/// The typed payloads carried on the sync channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WirePayload {
    /// Merge delta fan-out after a successful import
    ImportUpdate(ImportUpdate),
    /// Informational application ack from a replica
    ImportAck(ImportAck),
    /// Replica request for display data
    GuiSnapshotRequest(GuiSnapshotRequest),
    /// Display data for the requesting replica
    GuiSnapshotResponse(GuiSnapshotResponse),
}

/// Envelope pairing a payload with the schema version that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Schema version of the sender.
    pub schema_version: u16,
    /// The carried payload.
    pub payload: WirePayload,
}

impl WireMessage {
    /// Wrap an import update.
    pub fn import_update(update: ImportUpdate) -> Self {
        Self {
            schema_version: WIRE_SCHEMA_VERSION,
            payload: WirePayload::ImportUpdate(update),
        }
    }

    /// Wrap an import ack.
    pub fn ack(ack: ImportAck) -> Self {
        Self {
            schema_version: WIRE_SCHEMA_VERSION,
            payload: WirePayload::ImportAck(ack),
        }
    }

    /// Wrap a GUI snapshot request.
    pub fn gui_request() -> Self {
        Self {
            schema_version: WIRE_SCHEMA_VERSION,
            payload: WirePayload::GuiSnapshotRequest(GuiSnapshotRequest),
        }
    }

    /// Wrap a GUI snapshot response.
    pub fn gui_response(response: GuiSnapshotResponse) -> Self {
        Self {
            schema_version: WIRE_SCHEMA_VERSION,
            payload: WirePayload::GuiSnapshotResponse(response),
        }
    }

    /// Extract the import update, if this message carries one.
    pub fn as_import_update(&self) -> Option<&ImportUpdate> {
        match &self.payload {
            WirePayload::ImportUpdate(update) => Some(update),
            _ => None,
        }
    }

    /// Extract the ack, if this message carries one.
    pub fn as_ack(&self) -> Option<&ImportAck> {
        match &self.payload {
            WirePayload::ImportAck(ack) => Some(ack),
            _ => None,
        }
    }
}

/// Serialize a wire message for the transport.
pub fn serialize_message(msg: &WireMessage) -> Result<Vec<u8>, SyncError> {
    bincode::serialize(msg).map_err(SyncError::serialization)
}

/// Deserialize a wire message received from the transport.
pub fn deserialize_message(bytes: &[u8]) -> Result<WireMessage, SyncError> {
    bincode::deserialize(bytes).map_err(SyncError::serialization)
}
