//! Pure merge engine: dedup, ownership stamping, frame alignment.
//!
//! An imported snapshot carries positions in the exporter's absolute frame
//! plus the exporter's spawn origin. Comparing against the canonical list
//! only makes sense once both sides are expressed in a common frame, so the
//! merge re-expresses every position relative to its own origin (flattened,
//! the vertical spawn offset carries no meaning) before applying the exact
//! dedup predicate. Accepted waypoints are pushed back out into the current
//! server's absolute frame so they land correctly in the canonical list.

use waymark_core::{denormalize, normalize, Snapshot, Vec3, Waypoint};

/// Result of merging an imported snapshot into the canonical list.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// Canonical list followed by the accepted waypoints, order preserved.
    pub merged: Vec<Waypoint>,
    /// Incoming waypoints that survived dedup, ownership stamped, positions
    /// in the current server's absolute frame.
    pub accepted: Vec<Waypoint>,
    /// How many incoming waypoints were dropped as already known.
    pub duplicates: usize,
}

/// Merge `incoming` into `canonical` under the dedup and ownership contract.
///
/// An incoming waypoint is a duplicate iff some canonical waypoint has the
/// same title, the same icon, and the exact same position in the common
/// spawn-relative frame. Everything else is stamped with `importer_id` and
/// appended; canonical entries are never reordered, rewritten, or removed.
///
/// Idempotent: merging the same snapshot into the merged result accepts
/// nothing the second time.
pub fn merge(
    canonical: &[Waypoint],
    incoming: Snapshot,
    current_origin: Vec3,
    importer_id: &str,
) -> MergeOutcome {
    let current_origin = current_origin.without_y();
    let incoming_origin = incoming.origin_pos.without_y();

    let canonical_rel: Vec<(&Waypoint, Vec3)> = canonical
        .iter()
        .map(|wp| (wp, normalize(wp.position, current_origin)))
        .collect();

    let incoming_count = incoming.waypoints.len();
    let mut accepted = Vec::new();
    for mut wp in incoming.waypoints {
        wp.position = normalize(wp.position, incoming_origin);
        wp.owner_id = Some(importer_id.to_string());

        let duplicate = canonical_rel.iter().any(|(known, known_rel)| {
            known.title == wp.title && known.icon == wp.icon && *known_rel == wp.position
        });
        if duplicate {
            continue;
        }

        wp.position = denormalize(wp.position, current_origin);
        accepted.push(wp);
    }

    let mut merged = canonical.to_vec();
    merged.extend(accepted.iter().cloned());

    MergeOutcome {
        merged,
        duplicates: incoming_count - accepted.len(),
        accepted,
    }
}
