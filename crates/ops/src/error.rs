//! Store and command errors

use sortie_domain::{ResourceKind, ValidationError};
use thiserror::Error;

/// Store and command errors
#[derive(Debug, Error)]
pub enum OpsError {
    /// Snapshot file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot document is not valid JSON
    #[error("Snapshot format error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] sortie_core::Error),

    /// A value failed record validation
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// No record with this id
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Record kind (`pilot`, `drone`, `mission`)
        kind: &'static str,
        /// Requested id
        id: String,
    },

    /// A record with this id already exists
    #[error("{kind} already exists: {id}")]
    Duplicate {
        /// Record kind
        kind: &'static str,
        /// Conflicting id
        id: String,
    },

    /// Mission is completed and can no longer be staffed
    #[error("Mission {0} is completed")]
    MissionClosed(String),

    /// Resource cannot take the mission
    #[error("{kind} {id} cannot take mission {mission_id}: {reason}")]
    Unavailable {
        /// Slot being filled
        kind: ResourceKind,
        /// Resource id
        id: String,
        /// Mission being staffed
        mission_id: String,
        /// Every blocking reason, joined
        reason: String,
    },

    /// Command is missing something it needs
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

/// Result type for store and command operations
pub type Result<T> = std::result::Result<T, OpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = OpsError::NotFound {
            kind: "pilot",
            id: "P9".to_string(),
        };
        assert_eq!(err.to_string(), "pilot not found: P9");

        let err = OpsError::Unavailable {
            kind: ResourceKind::Drone,
            id: "D1".to_string(),
            mission_id: "M1".to_string(),
            reason: "booked on M2".to_string(),
        };
        assert_eq!(err.to_string(), "drone D1 cannot take mission M1: booked on M2");
    }

    #[test]
    fn test_validation_passes_through() {
        let err: OpsError = ValidationError::new("status", "unknown pilot status 'Busy'").into();
        assert!(matches!(err, OpsError::Invalid(_)));
        assert!(err.to_string().contains("status"));
    }
}
