//! End-to-end import/export cycles over in-memory collaborators.

use async_lock::Mutex;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use waymark_core::{
    deserialize_message, ReplicaId, SyncError, Vec3, Waypoint, WireMessage, WirePayload,
};
use waymark_store::{MemorySaveData, SaveData, WaypointStore};
use waymark_sync::interchange::{encode_utf16le, InterchangeFiles};
use waymark_sync::{
    handle_import_update, OperatorContext, ReplicaEvent, SyncConfig, SyncCoordinator, Transport,
    WaypointApplier,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("waymark_sync=debug,waymark_store=debug")
        .with_test_writer()
        .try_init();
}

/// In-memory interchange file store.
#[derive(Default)]
struct MemoryFiles {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
    fail_writes: bool,
}

#[async_trait]
impl InterchangeFiles for MemoryFiles {
    async fn read(&self, path: &Path) -> Result<Vec<u8>, SyncError> {
        self.files
            .lock()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| SyncError::io(format!("no such file: {}", path.display())))
    }

    async fn write(&self, path: &Path, bytes: Vec<u8>) -> Result<(), SyncError> {
        if self.fail_writes {
            return Err(SyncError::io("disk full"));
        }
        self.files.lock().await.insert(path.to_path_buf(), bytes);
        Ok(())
    }
}

/// Transport double capturing everything broadcast.
#[derive(Default)]
struct CapturingTransport {
    replicas: Vec<ReplicaId>,
    sent: Mutex<Vec<(ReplicaId, Vec<u8>)>>,
}

#[async_trait]
impl Transport for CapturingTransport {
    async fn connected(&self) -> Vec<ReplicaId> {
        self.replicas.clone()
    }

    async fn send_to(&self, replica: &ReplicaId, bytes: Vec<u8>) -> Result<(), SyncError> {
        self.sent.lock().await.push((replica.clone(), bytes));
        Ok(())
    }
}

/// Save store wrapper whose writes always fail.
struct ReadOnlySaveData(MemorySaveData);

#[async_trait]
impl SaveData for ReadOnlySaveData {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SyncError> {
        self.0.get(key).await
    }

    async fn put(&self, _key: &str, _bytes: Vec<u8>) -> Result<(), SyncError> {
        Err(SyncError::io("save game is read-only"))
    }
}

fn marker(title: &str, icon: &str, pos: Vec3) -> Waypoint {
    Waypoint {
        title: title.to_string(),
        icon: icon.to_string(),
        color: 0x0000_FF00,
        position: pos,
        pinned: false,
        owner_id: None,
        text: None,
    }
}

struct Harness {
    save: MemorySaveData,
    files: Arc<MemoryFiles>,
    transport: Arc<CapturingTransport>,
    coordinator: SyncCoordinator,
}

fn harness(replicas: &[&str]) -> Harness {
    init_tracing();
    let save = MemorySaveData::new();
    let files = Arc::new(MemoryFiles::default());
    let transport = Arc::new(CapturingTransport {
        replicas: replicas.iter().copied().map(ReplicaId::new).collect(),
        ..Default::default()
    });
    let coordinator = SyncCoordinator::new(
        WaypointStore::new(Arc::new(save.clone())),
        transport.clone(),
        files.clone(),
        SyncConfig::default(),
    );
    Harness {
        save,
        files,
        transport,
        coordinator,
    }
}

fn exporter_ctx() -> OperatorContext {
    OperatorContext {
        operator_id: "exporter-uid".to_string(),
        spawn_pos: Vec3::new(100.0, 20.0, 200.0),
    }
}

fn importer_ctx() -> OperatorContext {
    OperatorContext {
        operator_id: "importer-uid".to_string(),
        spawn_pos: Vec3::new(500.0, 50.0, 700.0),
    }
}

#[tokio::test]
async fn export_import_cycle_rebases_and_broadcasts() {
    let source = harness(&[]);
    let store = WaypointStore::new(Arc::new(source.save.clone()));
    store
        .save(&[
            marker("Mine", "pick", Vec3::new(110.0, 5.0, 205.0)),
            marker("Cave", "cave", Vec3::new(90.0, 12.0, 180.0)),
        ])
        .await
        .unwrap();

    let report = source.coordinator.export(&exporter_ctx()).await.unwrap();
    assert_eq!(report.count, 2);
    assert_eq!(report.summary(), format!("Exported 2 waypoints to {}", report.path.display()));

    // Carry the file over to a different world with a different spawn.
    let target = harness(&["replica-a", "replica-b"]);
    let exported = source.files.read(&report.path).await.unwrap();
    target.files.write(&report.path, exported).await.unwrap();

    let import = target.coordinator.import(&importer_ctx()).await.unwrap();
    assert_eq!(import.imported, 2);
    assert_eq!(import.duplicates, 0);
    assert_eq!(import.broadcast.delivered, 2);
    assert_eq!(
        import.summary(),
        "Imported 2 waypoints - 0 were duplicates"
    );

    // Positions re-rooted at the flattened target spawn, owners stamped.
    let canonical = WaypointStore::new(Arc::new(target.save.clone()))
        .load()
        .await
        .unwrap();
    assert_eq!(canonical.len(), 2);
    assert_eq!(canonical[0].position, Vec3::new(510.0, 5.0, 705.0));
    assert_eq!(canonical[0].owner_id.as_deref(), Some("importer-uid"));

    // Every replica received the accepted subset.
    let sent = target.transport.sent.lock().await;
    assert_eq!(sent.len(), 2);
    let msg = deserialize_message(&sent[0].1).unwrap();
    let update = msg.as_import_update().unwrap();
    assert_eq!(update.waypoints, canonical);
    assert_eq!(update.origin_pos, Vec3::new(500.0, 0.0, 700.0));
}

#[tokio::test]
async fn reimporting_the_same_file_is_all_duplicates() {
    let h = harness(&["replica-a"]);
    let store = WaypointStore::new(Arc::new(h.save.clone()));
    store
        .save(&[marker("Mine", "pick", Vec3::new(110.0, 5.0, 205.0))])
        .await
        .unwrap();

    let ctx = exporter_ctx();
    h.coordinator.export(&ctx).await.unwrap();

    let first = h.coordinator.import(&ctx).await.unwrap();
    assert_eq!(first.imported, 0);
    assert_eq!(first.duplicates, 1);

    let second = h.coordinator.import(&ctx).await.unwrap();
    assert_eq!(second.imported, 0);
    assert_eq!(second.duplicates, 1);
    assert_eq!(store.load().await.unwrap().len(), 1);
}

#[tokio::test]
async fn import_accepts_a_legacy_shape_file() {
    let h = harness(&[]);
    let legacy = r#"{
        "Waypoints": [{
            "Title": "Mine", "Icon": "pick", "Color": 1,
            "Position": {"X": 10.0, "Y": 5.0, "Z": 5.0}
        }],
        "WorldSpawnPos": {"X": 0.0, "Y": 0.0, "Z": 0.0}
    }"#;
    h.files
        .write(&SyncConfig::default().interchange_path(), encode_utf16le(legacy))
        .await
        .unwrap();

    let report = h
        .coordinator
        .import(&OperatorContext {
            operator_id: "importer-uid".to_string(),
            spawn_pos: Vec3::ZERO,
        })
        .await
        .unwrap();
    assert_eq!(report.imported, 1);
}

#[tokio::test]
async fn missing_file_aborts_import_without_mutation() {
    let h = harness(&["replica-a"]);
    let result = h.coordinator.import(&importer_ctx()).await;
    assert!(matches!(result, Err(SyncError::Io { .. })));
    assert!(!h.save.contains(waymark_store::PRIMARY_MARKERS_KEY).await);
    assert!(h.transport.sent.lock().await.is_empty());
}

#[tokio::test]
async fn garbled_file_aborts_import_without_mutation() {
    let h = harness(&["replica-a"]);
    h.files
        .write(
            &SyncConfig::default().interchange_path(),
            encode_utf16le("{ not a snapshot"),
        )
        .await
        .unwrap();

    let result = h.coordinator.import(&importer_ctx()).await;
    assert!(matches!(result, Err(SyncError::MalformedSnapshot { .. })));
    assert!(h.transport.sent.lock().await.is_empty());
}

#[tokio::test]
async fn persistence_failure_discards_the_merge_and_skips_broadcast() {
    init_tracing();
    let save = MemorySaveData::new();
    let files = Arc::new(MemoryFiles::default());
    let transport = Arc::new(CapturingTransport {
        replicas: vec![ReplicaId::new("replica-a")],
        ..Default::default()
    });
    let coordinator = SyncCoordinator::new(
        WaypointStore::new(Arc::new(ReadOnlySaveData(save.clone()))),
        transport.clone(),
        files.clone(),
        SyncConfig::default(),
    );

    let snapshot_text = r#"{
        "waypoints": [{"title": "Mine", "icon": "pick", "color": 1,
                       "position": {"x": 10.0, "y": 0.0, "z": 5.0}}],
        "worldSpawnPos": {"x": 0.0, "y": 0.0, "z": 0.0}
    }"#;
    files
        .write(
            &SyncConfig::default().interchange_path(),
            encode_utf16le(snapshot_text),
        )
        .await
        .unwrap();

    let result = coordinator.import(&importer_ctx()).await;
    assert!(matches!(result, Err(SyncError::Io { .. })));
    // Broadcast only happens after a successful save.
    assert!(transport.sent.lock().await.is_empty());
}

#[tokio::test]
async fn export_write_failure_surfaces_as_io() {
    init_tracing();
    let save = MemorySaveData::new();
    let files = Arc::new(MemoryFiles {
        fail_writes: true,
        ..Default::default()
    });
    let transport = Arc::new(CapturingTransport::default());
    let coordinator = SyncCoordinator::new(
        WaypointStore::new(Arc::new(save)),
        transport,
        files,
        SyncConfig::default(),
    );

    let result = coordinator.export(&exporter_ctx()).await;
    assert!(matches!(result, Err(SyncError::Io { .. })));
}

#[tokio::test]
async fn ack_from_replica_becomes_a_notice() {
    let h = harness(&[]);
    let ack = WireMessage::ack(waymark_core::ImportAck {
        summary: "2 waypoints added to map.".to_string(),
    });
    let bytes = waymark_core::serialize_message(&ack).unwrap();

    let event = h
        .coordinator
        .handle_replica_message(&ReplicaId::new("replica-a"), &bytes, Vec3::ZERO)
        .await
        .unwrap();
    assert_eq!(
        event,
        Some(ReplicaEvent::Notice(
            "replica-a: 2 waypoints added to map.".to_string()
        ))
    );
}

#[tokio::test]
async fn gui_request_is_answered_with_the_canonical_list() {
    let h = harness(&[]);
    let store = WaypointStore::new(Arc::new(h.save.clone()));
    let waypoints = vec![marker("Mine", "pick", Vec3::new(110.0, 5.0, 205.0))];
    store.save(&waypoints).await.unwrap();

    let request = waymark_core::serialize_message(&WireMessage::gui_request()).unwrap();
    let spawn = Vec3::new(100.0, 20.0, 200.0);
    let event = h
        .coordinator
        .handle_replica_message(&ReplicaId::new("replica-a"), &request, spawn)
        .await
        .unwrap();

    match event {
        Some(ReplicaEvent::Reply(reply)) => match reply.payload {
            WirePayload::GuiSnapshotResponse(response) => {
                assert_eq!(response.waypoints, waypoints);
                assert_eq!(response.origin_pos, spawn);
            }
            other => panic!("unexpected reply payload: {other:?}"),
        },
        other => panic!("expected a reply, got {other:?}"),
    }
}

#[tokio::test]
async fn replica_applies_update_and_acks() {
    #[derive(Default)]
    struct CountingApplier(Mutex<usize>);

    #[async_trait]
    impl WaypointApplier for CountingApplier {
        async fn apply(&self, _waypoint: &Waypoint) -> Result<(), SyncError> {
            *self.0.lock().await += 1;
            Ok(())
        }
    }

    let h = harness(&["replica-a"]);
    let store = WaypointStore::new(Arc::new(h.save.clone()));
    store
        .save(&[marker("Mine", "pick", Vec3::new(110.0, 5.0, 205.0))])
        .await
        .unwrap();

    let ctx = exporter_ctx();
    h.coordinator.export(&ctx).await.unwrap();

    // A second world imports the file; its replica applies the update.
    let target = harness(&["replica-b"]);
    let path = SyncConfig::default().interchange_path();
    let exported = h.files.read(&path).await.unwrap();
    target.files.write(&path, exported).await.unwrap();
    target.coordinator.import(&importer_ctx()).await.unwrap();

    let sent = target.transport.sent.lock().await;
    let update = deserialize_message(&sent[0].1)
        .unwrap()
        .as_import_update()
        .cloned()
        .unwrap();

    let applier = CountingApplier::default();
    let ack = handle_import_update(&applier, &update).await;
    assert_eq!(*applier.0.lock().await, 1);
    assert_eq!(ack.summary, "1 waypoints added to map.");
}
