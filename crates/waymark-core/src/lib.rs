//! # Waymark Core - domain types and pure protocol logic
//!
//! This crate holds everything about the waypoint synchronization protocol
//! that needs no I/O:
//!
//! - **Positions**: the spawn-relative coordinate frame arithmetic used to
//!   compare waypoints exported from worlds with different spawn points.
//! - **Waypoints**: the named, colored, positioned marker record, including
//!   the legacy `text` title alias and its load-time backfill.
//! - **Snapshots**: the interchange unit (waypoint list + origin) and its
//!   dual-shape JSON codec.
//! - **Wire messages**: the schema-versioned envelope exchanged between the
//!   server and its replicas after an import.
//! - **Errors**: the unified [`SyncError`] type shared by every layer.
//!
//! Storage adapters live in `waymark-store`; the merge engine and the sync
//! coordinator live in `waymark-sync`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Spawn-relative coordinate frame arithmetic
pub mod position;

/// The waypoint record and its self-heal rules
pub mod waypoint;

/// Interchange snapshot type and dual-shape JSON codec
pub mod snapshot;

/// Schema-versioned wire messages for server/replica traffic
pub mod wire;

/// Unified error type for sync operations
pub mod error;

pub use error::{SyncError, SyncResult};
pub use position::{denormalize, normalize, Vec3};
pub use snapshot::Snapshot;
pub use waypoint::Waypoint;
pub use wire::{
    deserialize_message, serialize_message, ImportAck, ImportUpdate, ReplicaId, WireMessage,
    WirePayload,
};
