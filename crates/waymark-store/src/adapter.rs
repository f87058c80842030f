//! Schema-aware adapter over the host save store.

use crate::save_data::SaveData;
use std::sync::Arc;
use tracing::{error, info, warn};
use waymark_core::snapshot::legacy::LegacyWaypoint;
use waymark_core::{SyncError, Waypoint};

/// Primary save key: bincode-encoded `Vec<Waypoint>`, current schema.
pub const PRIMARY_MARKERS_KEY: &str = "playerMapMarkers_v2";

/// Legacy save key: JSON list in the capitalized shape. Read-only fallback.
pub const LEGACY_MARKERS_KEY: &str = "playerMapMarkers";

/// Reads and writes the canonical waypoint list.
///
/// Loads are fail-open: a missing key yields an empty list and corrupt bytes
/// are logged and treated as "waypoints absent" rather than crashing the
/// server over garbled save data. Only backing-store I/O failures propagate.
#[derive(Clone)]
pub struct WaypointStore {
    save: Arc<dyn SaveData>,
}

impl WaypointStore {
    /// Wrap a host save store handle.
    pub fn new(save: Arc<dyn SaveData>) -> Self {
        Self { save }
    }

    /// Load the canonical waypoint list.
    ///
    /// Tries the primary key first, then the legacy key, then gives up and
    /// returns an empty list. Entries are healed on the way out; once a
    /// legacy list has been read, the next [`save`](Self::save) migrates it
    /// to the primary key implicitly.
    pub async fn load(&self) -> Result<Vec<Waypoint>, SyncError> {
        if let Some(bytes) = self.save.get(PRIMARY_MARKERS_KEY).await? {
            return Ok(self.decode_primary(&bytes));
        }
        if let Some(bytes) = self.save.get(LEGACY_MARKERS_KEY).await? {
            return Ok(self.decode_legacy(&bytes));
        }
        Ok(Vec::new())
    }

    /// Persist the full list under the primary key, overwriting prior content.
    pub async fn save(&self, waypoints: &[Waypoint]) -> Result<(), SyncError> {
        let bytes = bincode::serialize(waypoints).map_err(SyncError::serialization)?;
        self.save.put(PRIMARY_MARKERS_KEY, bytes).await
    }

    fn decode_primary(&self, bytes: &[u8]) -> Vec<Waypoint> {
        match bincode::deserialize::<Vec<Waypoint>>(bytes) {
            Ok(waypoints) => {
                info!(count = waypoints.len(), "loaded waypoints");
                waypoints.into_iter().map(Waypoint::heal).collect()
            }
            Err(e) => {
                let corrupt = SyncError::storage_corrupt(e);
                error!(key = PRIMARY_MARKERS_KEY, error = %corrupt, "failed deserializing waypoints, treating as absent");
                Vec::new()
            }
        }
    }

    /// Decode the legacy JSON list entry by entry, building a fresh output
    /// list so a null or unreadable entry is dropped instead of poisoning
    /// the whole load.
    fn decode_legacy(&self, bytes: &[u8]) -> Vec<Waypoint> {
        let raw: Vec<serde_json::Value> = match serde_json::from_slice(bytes) {
            Ok(raw) => raw,
            Err(e) => {
                let corrupt = SyncError::storage_corrupt(e);
                error!(key = LEGACY_MARKERS_KEY, error = %corrupt, "failed deserializing legacy waypoints, treating as absent");
                return Vec::new();
            }
        };

        let mut waypoints = Vec::with_capacity(raw.len());
        for (index, value) in raw.into_iter().enumerate() {
            match serde_json::from_value::<LegacyWaypoint>(value) {
                Ok(legacy) => waypoints.push(Waypoint::from(legacy)),
                Err(e) => {
                    warn!(index, error = %e, "dropping unreadable legacy waypoint entry");
                }
            }
        }
        info!(
            count = waypoints.len(),
            key = LEGACY_MARKERS_KEY,
            "loaded waypoints from legacy key"
        );
        waypoints
    }
}
