//! Command execution
//!
//! The coordinator owns the record store and runs [`Command`]s against it,
//! calling into the scheduling engine for detection and ranking. Writes are
//! checked against the same availability rules detection uses, so a
//! reassignment the coordinator accepts never introduces a double booking.

use crate::error::{OpsError, Result};
use crate::intent::{Command, CommandOutcome};
use crate::store::RecordStore;
use chrono::NaiveDate;
use sortie_core::EngineConfig;
use sortie_domain::{Mission, MissionStatus, Resource, ResourceKind};
use sortie_scheduler::{run_pass, AvailabilityIndex, Blocker, PassOptions};
use tracing::{debug, info, warn};

/// Runs commands against a store
#[derive(Debug)]
pub struct Coordinator {
    store: RecordStore,
    options: PassOptions,
    today: NaiveDate,
}

impl Coordinator {
    /// Coordinator using the engine configuration. `today` drives the
    /// availability listings and the status view.
    pub fn new(store: RecordStore, engine: &EngineConfig, today: NaiveDate) -> Self {
        Self {
            store,
            options: PassOptions {
                as_of: engine.as_of,
                top_k: engine.top_k,
            },
            today,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn into_store(self) -> RecordStore {
        self.store
    }

    /// Execute one command
    pub fn execute(&mut self, command: Command) -> Result<CommandOutcome> {
        debug!(command = command.name(), "executing command");

        let outcome = match command {
            Command::Status => CommandOutcome::Status(self.store.status_summary(self.today)),

            Command::ListAvailablePilots { skill, location } => CommandOutcome::Pilots {
                pilots: self
                    .store
                    .available_pilots(skill.as_deref(), location.as_deref(), self.today)
                    .into_iter()
                    .cloned()
                    .collect(),
            },

            Command::ListAvailableDrones {
                capability,
                location,
            } => CommandOutcome::Drones {
                drones: self
                    .store
                    .available_drones(capability.as_deref(), location.as_deref(), self.today)
                    .into_iter()
                    .cloned()
                    .collect(),
            },

            Command::CheckConflicts => {
                CommandOutcome::Conflicts(run_pass(&self.store.snapshot(), &self.options))
            }

            Command::Suggest { mission_id } => self.suggest(mission_id)?,

            Command::Reassign {
                mission_id,
                pilot_id,
                drone_id,
            } => self.reassign(mission_id, pilot_id, drone_id)?,

            Command::UpdatePilotStatus { pilot_id, status } => {
                let previous = self.store.update_pilot_status(&pilot_id, status)?;
                CommandOutcome::PilotUpdated {
                    pilot_id,
                    previous,
                    status,
                }
            }

            Command::UpdateDroneStatus { drone_id, status } => {
                let previous = self.store.update_drone_status(&drone_id, status)?;
                CommandOutcome::DroneUpdated {
                    drone_id,
                    previous,
                    status,
                }
            }

            Command::CreateMission { mission } => {
                let mission_id = mission.id.clone();
                self.store.create_mission(mission)?;
                CommandOutcome::MissionCreated { mission_id }
            }
        };

        Ok(outcome)
    }

    fn suggest(&self, mission_id: String) -> Result<CommandOutcome> {
        if self.store.mission(&mission_id).is_none() {
            return Err(OpsError::NotFound {
                kind: "mission",
                id: mission_id,
            });
        }

        let options = PassOptions {
            as_of: None,
            ..self.options
        };
        let report = run_pass(&self.store.snapshot(), &options);
        let suggestions = report
            .suggestions
            .into_iter()
            .filter(|s| s.mission_id == mission_id)
            .collect();

        Ok(CommandOutcome::Suggestions {
            mission_id,
            suggestions,
        })
    }

    fn reassign(
        &mut self,
        mission_id: String,
        pilot_id: Option<String>,
        drone_id: Option<String>,
    ) -> Result<CommandOutcome> {
        if pilot_id.is_none() && drone_id.is_none() {
            return Err(OpsError::InvalidCommand(
                "reassign needs a pilot, a drone or both".to_string(),
            ));
        }

        let mission = self
            .store
            .mission(&mission_id)
            .ok_or_else(|| OpsError::NotFound {
                kind: "mission",
                id: mission_id.clone(),
            })?;
        if mission.status == MissionStatus::Completed {
            return Err(OpsError::MissionClosed(mission_id));
        }

        // Check both slots before touching either.
        let snapshot = self.store.snapshot();
        let index = AvailabilityIndex::excluding(&snapshot.missions, &mission_id);
        if let Some(id) = pilot_id.as_deref() {
            let pilot = self.store.pilot(id).ok_or_else(|| OpsError::NotFound {
                kind: "pilot",
                id: id.to_string(),
            })?;
            check_free(&index, pilot, mission)?;
        }
        if let Some(id) = drone_id.as_deref() {
            let drone = self.store.drone(id).ok_or_else(|| OpsError::NotFound {
                kind: "drone",
                id: id.to_string(),
            })?;
            check_free(&index, drone, mission)?;
        }

        if let Some(id) = pilot_id.as_deref() {
            self.store.assign(&mission_id, ResourceKind::Pilot, Some(id))?;
        }
        if let Some(id) = drone_id.as_deref() {
            self.store.assign(&mission_id, ResourceKind::Drone, Some(id))?;
        }

        info!(
            mission_id = %mission_id,
            pilot = pilot_id.as_deref().unwrap_or("-"),
            drone = drone_id.as_deref().unwrap_or("-"),
            "mission reassigned"
        );

        Ok(CommandOutcome::Reassigned {
            mission_id,
            pilot_id,
            drone_id,
        })
    }
}

/// Refuse a resource that is not ready or already booked over the mission.
/// Being based elsewhere is allowed; detection reports it as a location
/// mismatch.
fn check_free<R: Resource>(index: &AvailabilityIndex, resource: &R, mission: &Mission) -> Result<()> {
    let mut reasons = Vec::new();
    for blocker in index.blockers(resource, &mission.schedule, &mission.location) {
        match blocker {
            Blocker::NotReady(reason) => reasons.push(reason),
            Blocker::Booked(booking) => reasons.push(format!(
                "booked on mission {} ({})",
                booking.mission_id, booking.range
            )),
            Blocker::Elsewhere { location } => warn!(
                resource_id = resource.resource_id(),
                based = %location,
                mission_location = %mission.location,
                "assigning resource based off site"
            ),
        }
    }

    if reasons.is_empty() {
        Ok(())
    } else {
        Err(OpsError::Unavailable {
            kind: resource.kind(),
            id: resource.resource_id().to_string(),
            mission_id: mission.id.clone(),
            reason: reasons.join("; "),
        })
    }
}
