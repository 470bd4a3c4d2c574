//! Typed pilot, drone and mission records
//!
//! Records are parsed from raw field maps and are immutable snapshots for
//! the duration of a detection pass.

pub mod drone;
pub mod mission;
pub mod pilot;

pub use drone::{Drone, DroneStatus, DRONE_EXPERIENCE_WEIGHT};
pub use mission::{Mission, MissionStatus, Priority};
pub use pilot::{ExperienceLevel, Pilot, PilotStatus};

use crate::error::Result;
use crate::fields::{self, RawRecord};

pub(crate) use crate::fields::RowBuilder;

/// Record kinds stored as raw rows
pub trait FromRecord: Sized {
    /// Kind label used in reports and logs
    const KIND: &'static str;

    /// Field names the id may be stored under, preferred first
    const ID_FIELDS: &'static [&'static str];

    fn from_record(record: &RawRecord) -> Result<Self>;

    fn record_id(&self) -> &str;

    /// Row in the store format; `from_record` reads it back unchanged
    fn to_record(&self) -> RawRecord;

    /// Best-effort id of a row that may fail to parse
    fn raw_id(record: &RawRecord) -> Option<String> {
        fields::text(record, Self::ID_FIELDS)
    }
}
