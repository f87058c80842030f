//! Replica-side update application and ack.
//!
//! A replica holds a locally-applied, non-authoritative view of the
//! waypoints. How a waypoint becomes visible is the host's business (in the
//! original client it is replayed as a map-marker chat command); the
//! [`WaypointApplier`] seam keeps that outside the core. The ack produced
//! here is purely informational and is only ever logged server-side.

use async_trait::async_trait;
use tracing::warn;
use waymark_core::{ImportAck, ImportUpdate, SyncError, Waypoint};

/// Replays an accepted waypoint into the replica's local presentation.
#[async_trait]
pub trait WaypointApplier: Send + Sync {
    /// Make one waypoint visible locally.
    async fn apply(&self, waypoint: &Waypoint) -> Result<(), SyncError>;
}

/// Apply a received [`ImportUpdate`] and build the ack to send back.
///
/// Application failures are logged and skipped; the ack reports how many
/// waypoints actually landed.
pub async fn handle_import_update(
    applier: &dyn WaypointApplier,
    update: &ImportUpdate,
) -> ImportAck {
    let mut applied = 0usize;
    for waypoint in &update.waypoints {
        match applier.apply(waypoint).await {
            Ok(()) => applied += 1,
            Err(e) => {
                warn!(title = %waypoint.title, error = %e, "failed applying waypoint locally");
            }
        }
    }
    ImportAck {
        summary: format!("{applied} waypoints added to map."),
    }
}

/// Render the chat command the original client replays per waypoint.
///
/// Kept as a convenience for hosts whose applier is command-based.
pub fn chat_add_command(waypoint: &Waypoint) -> String {
    format!(
        "/waypoint addati {} {} {} {} {} {} {}",
        waypoint.icon,
        waypoint.position.x,
        waypoint.position.y,
        waypoint.position.z,
        waypoint.pinned,
        waypoint.color_hex(),
        waypoint.title,
    )
}
