//! Assignable resource abstraction
//!
//! Pilots and drones are both staffed onto missions. The scheduler treats
//! them uniformly through this trait.

use crate::types::{DateRange, TokenSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which assignment slot of a mission a resource fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Human operator
    Pilot,
    /// Airframe
    Drone,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Pilot => "pilot",
            ResourceKind::Drone => "drone",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource trait - pilots and drones implement this
pub trait Resource {
    /// Get the unique resource identifier
    fn resource_id(&self) -> &str;

    /// Get the slot this resource fills
    fn kind(&self) -> ResourceKind;

    /// Get current location
    fn location(&self) -> &str;

    /// Skills for pilots, capabilities for drones
    fn tokens(&self) -> &TokenSet;

    /// Weight used when ranking replacement candidates
    fn experience_weight(&self) -> f64;

    /// Why the resource cannot take work in `range`, judged from its own
    /// record only (status, windows, derived maintenance state).
    fn unavailability(&self, range: &DateRange) -> Option<String>;

    /// Check if resource is ready for work in `range`
    fn is_ready_for(&self, range: &DateRange) -> bool {
        self.unavailability(range).is_none()
    }
}
