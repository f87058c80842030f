//! Unified error type for sync operations.

use thiserror::Error;

/// Convenience alias for sync results.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during waypoint synchronization.
///
/// Propagation policy differs per kind: `MalformedSnapshot` and `Io` abort
/// the invoking operation and surface to the operator; `StorageCorrupt` is
/// recovered fail-open at the store boundary and only ever logged;
/// `TransportUnavailable` is isolated per replica during broadcast.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Interchange text unparsable in any accepted shape
    #[error("Malformed snapshot: {reason}")]
    MalformedSnapshot {
        /// Decode failure from the canonical shape attempt
        reason: String,
    },

    /// Canonical storage bytes failed to deserialize
    #[error("Canonical waypoint storage corrupt: {reason}")]
    StorageCorrupt {
        /// The underlying deserialization failure
        reason: String,
    },

    /// File or storage I/O failure
    #[error("I/O failure: {reason}")]
    Io {
        /// The underlying I/O failure, surfaced to the operator verbatim
        reason: String,
    },

    /// A replica could not be reached during broadcast
    #[error("Transport unavailable for replica {replica}: {reason}")]
    TransportUnavailable {
        /// The unreachable replica
        replica: String,
        /// The underlying transport failure
        reason: String,
    },

    /// Serialization of an in-memory value failed
    #[error("Serialization error: {reason}")]
    Serialization {
        /// The underlying serialization failure
        reason: String,
    },
}

impl SyncError {
    /// Build a [`SyncError::MalformedSnapshot`] from any displayable cause.
    pub fn malformed_snapshot(reason: impl ToString) -> Self {
        Self::MalformedSnapshot {
            reason: reason.to_string(),
        }
    }

    /// Build a [`SyncError::StorageCorrupt`] from any displayable cause.
    pub fn storage_corrupt(reason: impl ToString) -> Self {
        Self::StorageCorrupt {
            reason: reason.to_string(),
        }
    }

    /// Build a [`SyncError::Io`] from any displayable cause.
    pub fn io(reason: impl ToString) -> Self {
        Self::Io {
            reason: reason.to_string(),
        }
    }

    /// Build a [`SyncError::TransportUnavailable`] for one replica.
    pub fn transport_unavailable(replica: impl ToString, reason: impl ToString) -> Self {
        Self::TransportUnavailable {
            replica: replica.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`SyncError::Serialization`] from any displayable cause.
    pub fn serialization(reason: impl ToString) -> Self {
        Self::Serialization {
            reason: reason.to_string(),
        }
    }
}

impl From<std::io::Error> for SyncError {
    fn from(e: std::io::Error) -> Self {
        Self::io(e)
    }
}
