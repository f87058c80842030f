//! # Waymark Sync - merge engine and import/export coordination
//!
//! The server-side heart of waypoint sharing: snapshot the canonical list
//! into a portable file, merge an imported snapshot back in without
//! duplicating markers, persist the result, and fan the accepted delta out
//! to every connected replica.
//!
//! The pieces, leaf-first:
//!
//! - [`merge`]: the pure deduplication and ownership contract.
//! - [`interchange`]: the UTF-16 interchange file codec and its injected
//!   file-I/O seam.
//! - [`broadcast`]: best-effort fan-out of wire messages over the injected
//!   transport, failures isolated per replica.
//! - [`replica`]: the client-side application of an import update and its
//!   informational ack.
//! - [`coordinator`]: the operation state machines tying it all together
//!   under a single-writer lock on the canonical list.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Runtime configuration
pub mod config;

/// Pure merge engine: dedup, ownership stamping, frame alignment
pub mod merge;

/// UTF-16 interchange file codec and file-I/O seam
pub mod interchange;

/// Best-effort wire message fan-out to replicas
pub mod broadcast;

/// Replica-side update application and ack
pub mod replica;

/// Import/export orchestration
pub mod coordinator;

pub use broadcast::{BroadcastSummary, Broadcaster, Transport};
pub use config::SyncConfig;
pub use coordinator::{ExportReport, ImportReport, OperatorContext, ReplicaEvent, SyncCoordinator};
pub use merge::{merge, MergeOutcome};
pub use replica::{handle_import_update, WaypointApplier};
