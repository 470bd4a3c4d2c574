//! Scheduling engine for Sortie
//!
//! Pure computation over one snapshot of pilots, drones and missions:
//! - Availability index (who is booked when)
//! - Conflict detection
//! - Ranked reassignment suggestions
//! - A detection pass tying the three together
//!
//! Nothing in this crate touches the filesystem or holds state between calls.

pub mod availability;
pub mod conflicts;
pub mod pass;
pub mod recommender;

pub use availability::{is_entity_available, AvailabilityIndex, Blocker, Booking};
pub use conflicts::{detect_conflicts, detect_conflicts_with, Conflict, ConflictKind, DetectOptions};
pub use pass::{run_pass, FleetSnapshot, PassOptions, PassReport, DEFAULT_TOP_K};
pub use recommender::{
    fit_score, suggest_for_conflicts, suggest_reassignment, Fit, Suggestion, EXPERIENCE_WEIGHT,
    LOCATION_WEIGHT, SKILL_WEIGHT,
};
