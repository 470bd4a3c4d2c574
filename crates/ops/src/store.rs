//! In-memory record store
//!
//! Holds the pilot roster, drone fleet and mission list keyed by id. The
//! engine never sees the store directly: each pass gets a cloned
//! [`FleetSnapshot`], so writes between passes cannot disturb a pass in
//! progress.

use crate::error::{OpsError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sortie_core::StoreConfig;
use sortie_domain::{
    ingest, locations_match, DateRange, Drone, DroneStatus, FromRecord, Mission, MissionStatus,
    Pilot, PilotStatus, Priority, RawRecord, Rejection, Resource, ResourceKind, TokenSet,
};
use sortie_scheduler::{FleetSnapshot, Suggestion};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// On-disk snapshot: raw rows per record kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub pilots: Vec<RawRecord>,
    #[serde(default)]
    pub drones: Vec<RawRecord>,
    #[serde(default)]
    pub missions: Vec<RawRecord>,
}

/// Fleet totals for the status view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    /// Pilots on the roster
    pub pilots: usize,
    /// Pilots free to take work on the summary day
    pub available_pilots: usize,
    /// Drones in the fleet
    pub drones: usize,
    /// Drones free to fly on the summary day
    pub available_drones: usize,
    /// Missions on record
    pub missions: usize,
    /// Missions under way
    pub active_missions: usize,
    /// Missions still being planned
    pub planned_missions: usize,
    /// Open missions at High or Critical priority
    pub high_priority_missions: usize,
    /// Rows skipped when the snapshot was loaded
    pub rejected_rows: usize,
}

/// Keyed record collections plus the rows that failed to load
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    pilots: BTreeMap<String, Pilot>,
    drones: BTreeMap<String, Drone>,
    missions: BTreeMap<String, Mission>,
    rejected: Vec<Rejection>,
    /// Rows that failed to parse, written back untouched on save
    unparsed: SnapshotDocument,
    /// Loaded row per record id; columns the model does not carry are
    /// written back from here
    source: SourceRows,
}

#[derive(Debug, Clone, Default)]
struct SourceRows {
    pilots: BTreeMap<String, RawRecord>,
    drones: BTreeMap<String, RawRecord>,
    missions: BTreeMap<String, RawRecord>,
}

impl RecordStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the snapshot named by the store configuration
    pub fn open(config: &StoreConfig) -> Result<Self> {
        Self::load(&config.snapshot_path)
    }

    /// Load a JSON snapshot document
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let document: SnapshotDocument = serde_json::from_str(&content)?;
        let store = Self::from_document(document);

        info!(
            path = %path.display(),
            pilots = store.pilots.len(),
            drones = store.drones.len(),
            missions = store.missions.len(),
            rejected = store.rejected.len(),
            "snapshot loaded"
        );

        Ok(store)
    }

    /// Ingest raw rows. Malformed rows are kept aside, not fatal.
    pub fn from_document(document: SnapshotDocument) -> Self {
        let mut store = Self::new();

        let batch = split::<Pilot>(document.pilots, &mut store.rejected);
        store.pilots = batch.records;
        store.source.pilots = batch.source;
        store.unparsed.pilots = batch.failed;

        let batch = split::<Drone>(document.drones, &mut store.rejected);
        store.drones = batch.records;
        store.source.drones = batch.source;
        store.unparsed.drones = batch.failed;

        let batch = split::<Mission>(document.missions, &mut store.rejected);
        store.missions = batch.records;
        store.source.missions = batch.source;
        store.unparsed.missions = batch.failed;

        store
    }

    /// Current records as raw rows, followed by any rows that never parsed.
    /// Each record is written over the row it was loaded from, so extra
    /// spreadsheet columns survive a save.
    pub fn to_document(&self) -> SnapshotDocument {
        let mut document = SnapshotDocument {
            pilots: merged_rows(&self.pilots, &self.source.pilots),
            drones: merged_rows(&self.drones, &self.source.drones),
            missions: merged_rows(&self.missions, &self.source.missions),
        };
        document.pilots.extend(self.unparsed.pilots.iter().cloned());
        document.drones.extend(self.unparsed.drones.iter().cloned());
        document.missions.extend(self.unparsed.missions.iter().cloned());
        document
    }

    /// Write the store back as a JSON snapshot
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(&self.to_document())?;
        fs::write(path, content)?;
        debug!(path = %path.display(), "snapshot saved");
        Ok(())
    }

    /// Copy of every record for one detection pass
    pub fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot {
            pilots: self.pilots.values().cloned().collect(),
            drones: self.drones.values().cloned().collect(),
            missions: self.missions.values().cloned().collect(),
            rejected: self.rejected.clone(),
        }
    }

    pub fn pilot(&self, id: &str) -> Option<&Pilot> {
        self.pilots.get(id)
    }

    pub fn drone(&self, id: &str) -> Option<&Drone> {
        self.drones.get(id)
    }

    pub fn mission(&self, id: &str) -> Option<&Mission> {
        self.missions.get(id)
    }

    pub fn pilots(&self) -> impl Iterator<Item = &Pilot> {
        self.pilots.values()
    }

    pub fn drones(&self) -> impl Iterator<Item = &Drone> {
        self.drones.values()
    }

    pub fn missions(&self) -> impl Iterator<Item = &Mission> {
        self.missions.values()
    }

    /// Rows skipped at load
    pub fn rejected(&self) -> &[Rejection] {
        &self.rejected
    }

    /// Pilots ready to work on `day`, optionally holding `skill` and based
    /// at `location`
    pub fn available_pilots(
        &self,
        skill: Option<&str>,
        location: Option<&str>,
        day: NaiveDate,
    ) -> Vec<&Pilot> {
        self.pilots
            .values()
            .filter(|p| matches_filters(*p, skill, location, day))
            .collect()
    }

    /// Drones ready to fly on `day`, optionally with `capability` and based
    /// at `location`. Lapsed maintenance counts as unavailable.
    pub fn available_drones(
        &self,
        capability: Option<&str>,
        location: Option<&str>,
        day: NaiveDate,
    ) -> Vec<&Drone> {
        self.drones
            .values()
            .filter(|d| matches_filters(*d, capability, location, day))
            .collect()
    }

    /// Fleet totals as of `day`
    pub fn status_summary(&self, day: NaiveDate) -> StatusSummary {
        let open = || self.missions.values().filter(|m| m.is_active());

        StatusSummary {
            pilots: self.pilots.len(),
            available_pilots: self.available_pilots(None, None, day).len(),
            drones: self.drones.len(),
            available_drones: self.available_drones(None, None, day).len(),
            missions: self.missions.len(),
            active_missions: open()
                .filter(|m| m.status == MissionStatus::Active)
                .count(),
            planned_missions: open()
                .filter(|m| m.status == MissionStatus::Planning)
                .count(),
            high_priority_missions: open()
                .filter(|m| m.priority >= Priority::High)
                .count(),
            rejected_rows: self.rejected.len(),
        }
    }

    /// Set a pilot's duty status, returning the previous one
    pub fn update_pilot_status(&mut self, id: &str, status: PilotStatus) -> Result<PilotStatus> {
        let pilot = self.pilots.get_mut(id).ok_or_else(|| not_found("pilot", id))?;
        let previous = std::mem::replace(&mut pilot.status, status);
        info!(pilot_id = id, from = %previous, to = %status, "pilot status updated");
        Ok(previous)
    }

    /// Set a drone's stored status, returning the previous one
    pub fn update_drone_status(&mut self, id: &str, status: DroneStatus) -> Result<DroneStatus> {
        let drone = self.drones.get_mut(id).ok_or_else(|| not_found("drone", id))?;
        let previous = std::mem::replace(&mut drone.status, status);
        info!(drone_id = id, from = %previous, to = %status, "drone status updated");
        Ok(previous)
    }

    /// Fill or clear one slot of a mission. Both ids must be on record.
    ///
    /// Returns the id previously in the slot.
    pub fn assign(
        &mut self,
        mission_id: &str,
        kind: ResourceKind,
        resource_id: Option<&str>,
    ) -> Result<Option<String>> {
        if let Some(id) = resource_id {
            let known = match kind {
                ResourceKind::Pilot => self.pilots.contains_key(id),
                ResourceKind::Drone => self.drones.contains_key(id),
            };
            if !known {
                return Err(not_found(kind.as_str(), id));
            }
        }

        let mission = self
            .missions
            .get_mut(mission_id)
            .ok_or_else(|| not_found("mission", mission_id))?;
        if mission.status == MissionStatus::Completed {
            return Err(OpsError::MissionClosed(mission_id.to_string()));
        }

        let previous = mission.assigned(kind).map(str::to_string);
        mission.assign(kind, resource_id.map(str::to_string));

        info!(
            mission_id,
            slot = %kind,
            from = previous.as_deref().unwrap_or("-"),
            to = resource_id.unwrap_or("-"),
            "assignment changed"
        );

        Ok(previous)
    }

    /// Add a new mission. Assigned ids must already be on record.
    pub fn create_mission(&mut self, mission: Mission) -> Result<()> {
        if self.missions.contains_key(&mission.id) {
            return Err(OpsError::Duplicate {
                kind: "mission",
                id: mission.id,
            });
        }
        if let Some(id) = mission.assigned_pilot.as_deref() {
            if !self.pilots.contains_key(id) {
                return Err(not_found("pilot", id));
            }
        }
        if let Some(id) = mission.assigned_drone.as_deref() {
            if !self.drones.contains_key(id) {
                return Err(not_found("drone", id));
            }
        }

        info!(mission_id = %mission.id, schedule = %mission.schedule, "mission created");
        self.missions.insert(mission.id.clone(), mission);
        Ok(())
    }

    /// Put a suggested candidate into the slot it was ranked for
    pub fn apply_suggestion(&mut self, suggestion: &Suggestion) -> Result<Option<String>> {
        self.assign(
            &suggestion.mission_id,
            suggestion.resource,
            Some(&suggestion.candidate_id),
        )
    }

    pub fn insert_pilot(&mut self, pilot: Pilot) -> Result<()> {
        if self.pilots.contains_key(&pilot.id) {
            return Err(OpsError::Duplicate {
                kind: "pilot",
                id: pilot.id,
            });
        }
        self.pilots.insert(pilot.id.clone(), pilot);
        Ok(())
    }

    pub fn insert_drone(&mut self, drone: Drone) -> Result<()> {
        if self.drones.contains_key(&drone.id) {
            return Err(OpsError::Duplicate {
                kind: "drone",
                id: drone.id,
            });
        }
        self.drones.insert(drone.id.clone(), drone);
        Ok(())
    }
}

fn not_found(kind: &'static str, id: &str) -> OpsError {
    OpsError::NotFound {
        kind,
        id: id.to_string(),
    }
}

fn matches_filters<R: Resource>(
    resource: &R,
    token: Option<&str>,
    location: Option<&str>,
    day: NaiveDate,
) -> bool {
    // A blank filter matches everything.
    let holds = |t: &str| TokenSet::normalize(t).map_or(true, |t| resource.tokens().contains(&t));

    resource.is_ready_for(&DateRange::day(day))
        && token.map_or(true, holds)
        && location.map_or(true, |l| locations_match(resource.location(), l))
}

/// Ingest one kind of row, keyed by id. Rows that fail are returned as-is.
/// One record kind after ingest
struct Split<T> {
    records: BTreeMap<String, T>,
    /// Row each record was parsed from
    source: BTreeMap<String, RawRecord>,
    /// Rows that were rejected
    failed: Vec<RawRecord>,
}

fn split<T: FromRecord>(rows: Vec<RawRecord>, rejected: &mut Vec<Rejection>) -> Split<T> {
    let batch = ingest::<T>(&rows);
    let failed_rows: BTreeSet<usize> = batch.rejected.iter().map(|r| r.row).collect();
    rejected.extend(batch.rejected);

    let mut source = BTreeMap::new();
    let mut failed = Vec::new();
    for (index, row) in rows.into_iter().enumerate() {
        if failed_rows.contains(&index) {
            failed.push(row);
        } else if let Some(id) = T::raw_id(&row) {
            source.entry(id).or_insert(row);
        }
    }

    let records = batch
        .records
        .into_iter()
        .map(|record| (record.record_id().to_string(), record))
        .collect();

    Split {
        records,
        source,
        failed,
    }
}

fn merged_rows<T: FromRecord>(
    records: &BTreeMap<String, T>,
    source: &BTreeMap<String, RawRecord>,
) -> Vec<RawRecord> {
    records
        .iter()
        .map(|(id, record)| {
            let mut row = source.get(id).cloned().unwrap_or_default();
            row.extend(record.to_record());
            row
        })
        .collect()
}
