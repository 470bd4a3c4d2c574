//! Detection pass
//!
//! One call that takes a snapshot through detection and recommendation and
//! reports the result together with any rows ingest had to drop.

use crate::conflicts::{detect_conflicts_with, Conflict, DetectOptions};
use crate::recommender::{suggest_reassignment, Suggestion};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sortie_domain::{
    ingest_drones, ingest_missions, ingest_pilots, Drone, Mission, Pilot, RawRecord, Rejection,
};
use tracing::info;

/// Default number of suggestions kept per conflict
pub const DEFAULT_TOP_K: usize = 3;

/// Parsed records for one pass plus the rows that failed to parse
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub pilots: Vec<Pilot>,
    pub drones: Vec<Drone>,
    pub missions: Vec<Mission>,
    #[serde(default)]
    pub rejected: Vec<Rejection>,
}

impl FleetSnapshot {
    /// Snapshot of already-validated records
    pub fn new(pilots: Vec<Pilot>, drones: Vec<Drone>, missions: Vec<Mission>) -> Self {
        Self {
            pilots,
            drones,
            missions,
            rejected: Vec::new(),
        }
    }

    /// Ingest raw rows, keeping every rejection
    pub fn from_records(pilots: &[RawRecord], drones: &[RawRecord], missions: &[RawRecord]) -> Self {
        let pilots = ingest_pilots(pilots);
        let drones = ingest_drones(drones);
        let missions = ingest_missions(missions);

        let mut rejected = pilots.rejected;
        rejected.extend(drones.rejected);
        rejected.extend(missions.rejected);

        Self {
            pilots: pilots.records,
            drones: drones.records,
            missions: missions.records,
            rejected,
        }
    }
}

/// Pass knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassOptions {
    /// Skip missions that ended before this day
    pub as_of: Option<NaiveDate>,
    /// Suggestions kept per conflict
    pub top_k: usize,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self {
            as_of: None,
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Outcome of one pass. Rejections are warnings: the pass still ran over
/// every row that parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassReport {
    /// Conflicts in detection order
    pub conflicts: Vec<Conflict>,
    /// Suggestions for every conflict, grouped in conflict order
    pub suggestions: Vec<Suggestion>,
    /// Rows excluded at ingest
    pub rejected: Vec<Rejection>,
}

impl PassReport {
    /// Check if nothing needs attention
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty() && self.rejected.is_empty()
    }

    /// Suggestions for the slot one conflict concerns
    pub fn suggestions_for<'a>(
        &'a self,
        conflict: &'a Conflict,
    ) -> impl Iterator<Item = &'a Suggestion> + 'a {
        self.suggestions
            .iter()
            .filter(move |s| s.mission_id == conflict.mission_id && s.resource == conflict.resource)
    }
}

/// Detect and recommend over `snapshot`
pub fn run_pass(snapshot: &FleetSnapshot, options: &PassOptions) -> PassReport {
    let detect = DetectOptions {
        as_of: options.as_of,
    };
    let conflicts = detect_conflicts_with(
        &detect,
        &snapshot.pilots,
        &snapshot.drones,
        &snapshot.missions,
    );

    let mut suggestions = Vec::new();
    for conflict in &conflicts {
        // Several conflicts on one slot share a candidate list.
        let seen = suggestions.iter().any(|s: &Suggestion| {
            s.mission_id == conflict.mission_id && s.resource == conflict.resource
        });
        if !seen {
            suggestions.extend(suggest_reassignment(
                conflict,
                &snapshot.pilots,
                &snapshot.drones,
                &snapshot.missions,
                options.top_k,
            ));
        }
    }

    info!(
        pilots = snapshot.pilots.len(),
        drones = snapshot.drones.len(),
        missions = snapshot.missions.len(),
        conflicts = conflicts.len(),
        suggestions = suggestions.len(),
        rejected = snapshot.rejected.len(),
        "detection pass complete"
    );

    PassReport {
        conflicts,
        suggestions,
        rejected: snapshot.rejected.clone(),
    }
}
