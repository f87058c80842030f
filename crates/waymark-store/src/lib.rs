//! # Waymark Store - canonical waypoint persistence
//!
//! The server's authoritative waypoint list lives in the host's opaque
//! key-value save store, injected here behind the [`SaveData`] trait. The
//! [`WaypointStore`] adapter layers the schema rules on top:
//!
//! - primary key `playerMapMarkers_v2` holds the current bincode schema,
//! - legacy key `playerMapMarkers` holds an older JSON shape and is read
//!   only when the primary key is absent (never written back),
//! - corrupt bytes are recovered fail-open as an empty list so the server
//!   stays usable after garbled save data,
//! - malformed entries are healed or dropped during load, never propagated.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Injected host key-value save store
pub mod save_data;

/// Schema-aware adapter over the save store
pub mod adapter;

pub use adapter::{WaypointStore, LEGACY_MARKERS_KEY, PRIMARY_MARKERS_KEY};
pub use save_data::{MemorySaveData, SaveData};
