//! The interchange snapshot and its dual-shape JSON codec.
//!
//! A snapshot is the exportable unit: the waypoint list in the exporter's
//! absolute frame plus the exporter's spawn origin, so an importer can
//! re-express the positions in its own frame. Two field-naming shapes exist
//! in the wild: the current lower-camel-case shape and a capitalized legacy
//! shape produced by older exporters. Decoding tries the current shape first
//! and falls back to the legacy one, normalizing both into [`Snapshot`]
//! immediately so nothing downstream ever sees the wire mirrors.

use crate::error::SyncError;
use crate::position::Vec3;
use crate::waypoint::Waypoint;
use serde::{Deserialize, Serialize};

/// An exportable bundle of waypoints plus the origin they relate to.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Waypoints in the exporter's absolute world frame.
    pub waypoints: Vec<Waypoint>,
    /// The exporter's spawn position, the origin the positions should be
    /// made relative to when merging.
    pub origin_pos: Vec3,
}

impl Snapshot {
    /// Bind a waypoint list to the origin it was captured under.
    pub fn capture(waypoints: Vec<Waypoint>, origin_pos: Vec3) -> Self {
        Self {
            waypoints,
            origin_pos,
        }
    }

    /// Encode in the canonical lower-camel-case shape.
    pub fn encode(&self) -> Result<String, SyncError> {
        let shape = CurrentShape {
            waypoints: Some(self.waypoints.clone()),
            world_spawn_pos: self.origin_pos,
        };
        serde_json::to_string(&shape).map_err(SyncError::serialization)
    }

    /// Decode interchange text, accepting either field-naming shape.
    ///
    /// A missing or `null` waypoint list decodes to an empty vec, never an
    /// error: an importer pointed at a snapshot with no waypoints simply
    /// imports nothing.
    pub fn decode(text: &str) -> Result<Self, SyncError> {
        match serde_json::from_str::<CurrentShape>(text) {
            Ok(shape) => Ok(Self {
                waypoints: shape.waypoints.unwrap_or_default(),
                origin_pos: shape.world_spawn_pos,
            }),
            Err(current_err) => match serde_json::from_str::<legacy::LegacyShape>(text) {
                Ok(shape) => Ok(Self {
                    waypoints: shape
                        .waypoints
                        .unwrap_or_default()
                        .into_iter()
                        .map(Waypoint::from)
                        .collect(),
                    origin_pos: shape.world_spawn_pos.into(),
                }),
                Err(_) => Err(SyncError::malformed_snapshot(current_err)),
            },
        }
    }
}

/// Current interchange shape: lower-camel-case field names.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentShape {
    #[serde(default)]
    waypoints: Option<Vec<Waypoint>>,
    world_spawn_pos: Vec3,
}

/// Mirrors of the capitalized legacy shape.
///
/// Also the shape of the legacy `playerMapMarkers` save key, which is why
/// these types are public; they never escape a decode otherwise.
pub mod legacy {
    use crate::position::Vec3;
    use crate::waypoint::Waypoint;
    use serde::{Deserialize, Serialize};

    /// Legacy snapshot container with capitalized field names.
    #[derive(Debug, Serialize, Deserialize)]
    pub(super) struct LegacyShape {
        #[serde(rename = "Waypoints", default)]
        pub(super) waypoints: Option<Vec<LegacyWaypoint>>,
        #[serde(rename = "WorldSpawnPos")]
        pub(super) world_spawn_pos: LegacyVec3,
    }

    /// Legacy waypoint record with capitalized field names.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct LegacyWaypoint {
        /// Display name.
        #[serde(rename = "Title", default)]
        pub title: String,
        /// Icon identifier.
        #[serde(rename = "Icon")]
        pub icon: String,
        /// 24-bit RGB color.
        #[serde(rename = "Color")]
        pub color: u32,
        /// Position in the exporter's absolute frame.
        #[serde(rename = "Position")]
        pub position: LegacyVec3,
        /// Map-edge pin flag.
        #[serde(rename = "Pinned", default)]
        pub pinned: bool,
        /// Owning player uid, if any.
        #[serde(rename = "OwningPlayerUid", default)]
        pub owner_id: Option<String>,
        /// Legacy title alias.
        #[serde(rename = "Text", default)]
        pub text: Option<String>,
    }

    /// Legacy position triple with capitalized components.
    #[derive(Debug, Clone, Copy, Serialize, Deserialize)]
    pub struct LegacyVec3 {
        /// East/west component.
        #[serde(rename = "X")]
        pub x: f64,
        /// Vertical component.
        #[serde(rename = "Y")]
        pub y: f64,
        /// North/south component.
        #[serde(rename = "Z")]
        pub z: f64,
    }

    impl From<LegacyVec3> for Vec3 {
        fn from(v: LegacyVec3) -> Vec3 {
            Vec3::new(v.x, v.y, v.z)
        }
    }

    impl From<LegacyWaypoint> for Waypoint {
        fn from(w: LegacyWaypoint) -> Waypoint {
            Waypoint {
                title: w.title,
                icon: w.icon,
                color: w.color,
                position: w.position.into(),
                pinned: w.pinned,
                owner_id: w.owner_id,
                text: w.text,
            }
            .heal()
        }
    }
}
