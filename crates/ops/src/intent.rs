//! Command intents
//!
//! Every operation a coordinator can perform, as plain data. Front ends
//! (the CLI, a chat layer, a web form) parse their input into a [`Command`]
//! and render the [`CommandOutcome`] that comes back.

use crate::store::StatusSummary;
use serde::{Deserialize, Serialize};
use sortie_domain::{Drone, DroneStatus, Mission, Pilot, PilotStatus};
use sortie_scheduler::{PassReport, Suggestion};

/// Operator request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Fleet totals
    Status,

    /// Pilots free today
    ListAvailablePilots {
        /// Required skill
        #[serde(default)]
        skill: Option<String>,
        /// Required base location
        #[serde(default)]
        location: Option<String>,
    },

    /// Drones free today
    ListAvailableDrones {
        /// Required capability
        #[serde(default)]
        capability: Option<String>,
        /// Required base location
        #[serde(default)]
        location: Option<String>,
    },

    /// Full detection pass with suggestions
    CheckConflicts,

    /// Replacement candidates for one mission's conflicts
    Suggest {
        /// Mission to re-staff
        mission_id: String,
    },

    /// Put a pilot and/or drone on a mission
    Reassign {
        /// Mission to staff
        mission_id: String,
        /// New pilot, if the pilot slot changes
        #[serde(default)]
        pilot_id: Option<String>,
        /// New drone, if the drone slot changes
        #[serde(default)]
        drone_id: Option<String>,
    },

    /// Change a pilot's duty status
    UpdatePilotStatus {
        /// Pilot to update
        pilot_id: String,
        /// New status
        status: PilotStatus,
    },

    /// Change a drone's stored status
    UpdateDroneStatus {
        /// Drone to update
        drone_id: String,
        /// New status
        status: DroneStatus,
    },

    /// Add a mission
    CreateMission {
        /// Mission to add
        mission: Mission,
    },
}

impl Command {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Status => "status",
            Command::ListAvailablePilots { .. } => "list_available_pilots",
            Command::ListAvailableDrones { .. } => "list_available_drones",
            Command::CheckConflicts => "check_conflicts",
            Command::Suggest { .. } => "suggest",
            Command::Reassign { .. } => "reassign",
            Command::UpdatePilotStatus { .. } => "update_pilot_status",
            Command::UpdateDroneStatus { .. } => "update_drone_status",
            Command::CreateMission { .. } => "create_mission",
        }
    }

    /// Check if the command changes the store
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Reassign { .. }
                | Command::UpdatePilotStatus { .. }
                | Command::UpdateDroneStatus { .. }
                | Command::CreateMission { .. }
        )
    }
}

/// Result of a successfully executed command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// Fleet totals
    Status(StatusSummary),

    /// Matching pilots, by id
    Pilots {
        /// Pilots that matched
        pilots: Vec<Pilot>,
    },

    /// Matching drones, by id
    Drones {
        /// Drones that matched
        drones: Vec<Drone>,
    },

    /// Detection pass result
    Conflicts(PassReport),

    /// Ranked candidates for one mission
    Suggestions {
        /// Mission being re-staffed
        mission_id: String,
        /// Candidates, grouped by conflict
        suggestions: Vec<Suggestion>,
    },

    /// Slots changed on a mission
    Reassigned {
        /// Mission staffed
        mission_id: String,
        /// Pilot now in the slot, when it changed
        pilot_id: Option<String>,
        /// Drone now in the slot, when it changed
        drone_id: Option<String>,
    },

    /// Pilot status changed
    PilotUpdated {
        /// Pilot updated
        pilot_id: String,
        /// Status before the change
        previous: PilotStatus,
        /// Status after the change
        status: PilotStatus,
    },

    /// Drone status changed
    DroneUpdated {
        /// Drone updated
        drone_id: String,
        /// Status before the change
        previous: DroneStatus,
        /// Status after the change
        status: DroneStatus,
    },

    /// Mission added
    MissionCreated {
        /// New mission id
        mission_id: String,
    },
}
