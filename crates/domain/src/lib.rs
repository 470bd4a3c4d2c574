//! Record model for Sortie
//!
//! This crate contains pure domain logic with no I/O dependencies:
//! - Pilot, drone and mission records parsed from raw field maps
//! - Shared value types (date ranges, token sets)
//! - Validation errors and partial-result batch ingest

pub mod error;
pub mod fields;
pub mod ingest;
pub mod records;
pub mod resource;
pub mod types;

pub use error::{Result, ValidationError};
pub use fields::RawRecord;
pub use ingest::{ingest, ingest_drones, ingest_missions, ingest_pilots, Ingest, Rejection};
pub use records::{
    Drone, DroneStatus, ExperienceLevel, FromRecord, Mission, MissionStatus, Pilot, PilotStatus,
    Priority, DRONE_EXPERIENCE_WEIGHT,
};
pub use resource::{Resource, ResourceKind};
pub use types::{locations_match, DateRange, TokenSet};
