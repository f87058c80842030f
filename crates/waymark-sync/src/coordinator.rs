//! Import/export orchestration.
//!
//! The coordinator owns the single-writer discipline around the canonical
//! waypoint list: export reads it, import read-modify-writes it, and the
//! two must never interleave, so every operation runs under one async lock.
//! Persistence is the durability boundary of an import; once the merged
//! list is saved, broadcast trouble can no longer fail the operation.

use crate::broadcast::{BroadcastSummary, Broadcaster, Transport};
use crate::config::SyncConfig;
use crate::interchange::{decode_utf16, encode_utf16le, InterchangeFiles};
use crate::merge::merge;
use async_lock::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use waymark_core::wire::GuiSnapshotResponse;
use waymark_core::{
    deserialize_message, ImportUpdate, ReplicaId, Snapshot, SyncError, Vec3, WireMessage,
    WirePayload,
};
use waymark_store::WaypointStore;

/// Host-session state an operation needs: who invoked it and where the
/// world's spawn currently is. Passed explicitly per call rather than held
/// as ambient coordinator state.
#[derive(Debug, Clone)]
pub struct OperatorContext {
    /// Identity stamped as owner on waypoints accepted from an import.
    pub operator_id: String,
    /// The server's present spawn position, the current coordinate origin.
    pub spawn_pos: Vec3,
}

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// How many waypoints were written.
    pub count: usize,
    /// Where the interchange file landed.
    pub path: PathBuf,
}

impl ExportReport {
    /// The one outcome line shown to the invoking operator.
    pub fn summary(&self) -> String {
        format!(
            "Exported {} waypoints to {}",
            self.count,
            self.path.display()
        )
    }
}

/// Outcome of a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Waypoints accepted into the canonical list.
    pub imported: usize,
    /// Incoming waypoints dropped as duplicates.
    pub duplicates: usize,
    /// How the update fan-out went.
    pub broadcast: BroadcastSummary,
}

impl ImportReport {
    /// The one outcome line shown to the invoking operator.
    pub fn summary(&self) -> String {
        format!(
            "Imported {} waypoints - {} were duplicates",
            self.imported, self.duplicates
        )
    }
}

/// What a replica message amounts to, for the host channel glue.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplicaEvent {
    /// An operator-visible notification line, e.g. a relayed import ack.
    Notice(String),
    /// A reply to deliver to the sending replica only.
    Reply(WireMessage),
}

/// Orchestrates export and import cycles against the canonical list.
pub struct SyncCoordinator {
    store: WaypointStore,
    broadcaster: Broadcaster,
    files: Arc<dyn InterchangeFiles>,
    config: SyncConfig,
    /// Serializes canonical-state operations; import's read-modify-write
    /// must not interleave with export's read.
    canonical_gate: Mutex<()>,
}

impl SyncCoordinator {
    /// Wire up the injected collaborators.
    pub fn new(
        store: WaypointStore,
        transport: Arc<dyn Transport>,
        files: Arc<dyn InterchangeFiles>,
        config: SyncConfig,
    ) -> Self {
        Self {
            store,
            broadcaster: Broadcaster::new(transport),
            files,
            config,
            canonical_gate: Mutex::new(()),
        }
    }

    /// Export the canonical list to the interchange file.
    ///
    /// Read-only with respect to canonical state; the only failure mode
    /// after reading is the file write itself.
    pub async fn export(&self, ctx: &OperatorContext) -> Result<ExportReport, SyncError> {
        let _gate = self.canonical_gate.lock().await;

        let waypoints = self.store.load().await?;
        info!(count = waypoints.len(), "found waypoints");

        let count = waypoints.len();
        let snapshot = Snapshot::capture(waypoints, ctx.spawn_pos);
        let text = snapshot.encode()?;

        let path = self.config.interchange_path();
        self.files.write(&path, encode_utf16le(&text)).await?;

        info!(count, path = %path.display(), "exported waypoints");
        Ok(ExportReport { count, path })
    }

    /// Import the interchange file into the canonical list and fan the
    /// accepted delta out to every connected replica.
    ///
    /// File-read, decode, and persistence failures abort the operation with
    /// no state mutated; a computed merge is discarded unless the save
    /// succeeds. Broadcast runs after the save and is best-effort.
    pub async fn import(&self, ctx: &OperatorContext) -> Result<ImportReport, SyncError> {
        let _gate = self.canonical_gate.lock().await;

        let path = self.config.interchange_path();
        let bytes = self.files.read(&path).await?;
        let snapshot = Snapshot::decode(&decode_utf16(&bytes)?)?;
        info!(count = snapshot.waypoints.len(), "importing waypoints");

        let canonical = self.store.load().await?;
        let outcome = merge(&canonical, snapshot, ctx.spawn_pos, &ctx.operator_id);

        self.store.save(&outcome.merged).await?;

        let update = WireMessage::import_update(ImportUpdate {
            waypoints: outcome.accepted.clone(),
            origin_pos: ctx.spawn_pos.without_y(),
        });
        let broadcast = match self.broadcaster.broadcast(&update).await {
            Ok(summary) => summary,
            Err(e) => {
                // Persistence already committed; the import stands.
                error!(error = %e, "failed broadcasting import update");
                BroadcastSummary::default()
            }
        };

        let report = ImportReport {
            imported: outcome.accepted.len(),
            duplicates: outcome.duplicates,
            broadcast,
        };
        info!(
            imported = report.imported,
            duplicates = report.duplicates,
            delivered = broadcast.delivered,
            unreachable = broadcast.unreachable,
            "import complete"
        );
        Ok(report)
    }

    /// Handle one message received from a replica.
    ///
    /// Acks are consumed for logging and surfaced as a notification line;
    /// GUI snapshot requests are answered with the canonical list. Anything
    /// else on the channel is logged and dropped.
    pub async fn handle_replica_message(
        &self,
        from: &ReplicaId,
        bytes: &[u8],
        spawn_pos: Vec3,
    ) -> Result<Option<ReplicaEvent>, SyncError> {
        let msg = deserialize_message(bytes)?;
        match msg.payload {
            WirePayload::ImportAck(ack) => {
                info!(%from, summary = %ack.summary, "import ack");
                Ok(Some(ReplicaEvent::Notice(format!(
                    "{from}: {}",
                    ack.summary
                ))))
            }
            WirePayload::GuiSnapshotRequest(_) => {
                let _gate = self.canonical_gate.lock().await;
                let waypoints = self.store.load().await?;
                Ok(Some(ReplicaEvent::Reply(WireMessage::gui_response(
                    GuiSnapshotResponse {
                        waypoints,
                        origin_pos: spawn_pos,
                    },
                ))))
            }
            other => {
                warn!(%from, ?other, "unexpected payload from replica");
                Ok(None)
            }
        }
    }
}
