//! The waypoint record.

use crate::position::Vec3;
use serde::{Deserialize, Serialize};

/// A named, colored, iconified point of interest on the world map.
///
/// Serialized in lower-camel-case, the canonical shape used by the primary
/// save key, the wire messages, and freshly written interchange files. The
/// capitalized legacy shape is handled by [`crate::snapshot::legacy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    /// Display name. Never empty after a store load; see [`Waypoint::heal`].
    #[serde(default)]
    pub title: String,
    /// Icon identifier, an open set of host-defined names ("circle", "pick", ...).
    pub icon: String,
    /// 24-bit RGB color.
    pub color: u32,
    /// Position in the absolute world frame.
    pub position: Vec3,
    /// Whether the marker stays visible at the map edge.
    #[serde(default)]
    pub pinned: bool,
    /// Player that owns this waypoint. `None` for unowned / legacy entries;
    /// stamped with the importer's id when accepted from an import.
    ///
    /// Serialized unconditionally: the primary save key is bincode, which
    /// reads fields positionally and cannot tolerate skipped fields.
    #[serde(default)]
    pub owner_id: Option<String>,
    /// Legacy alias of `title`. Older save data stored the display name
    /// here; kept only so it can be backfilled into `title` at load time.
    #[serde(default)]
    pub text: Option<String>,
}

impl Waypoint {
    /// Backfill `title` from the legacy `text` field if `title` is empty.
    ///
    /// Old save data sometimes carries the display name in `text` only.
    pub fn heal(mut self) -> Self {
        if self.title.is_empty() {
            if let Some(text) = &self.text {
                self.title = text.clone();
            }
        }
        self
    }

    /// Render the 24-bit color as a `#RRGGBB` hex string.
    pub fn color_hex(&self) -> String {
        format!("#{:06X}", self.color & 0x00FF_FFFF)
    }
}
