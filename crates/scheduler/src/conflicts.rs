//! Conflict detection
//!
//! Scans every Planning/Active mission of a snapshot and flags rule
//! violations in its staffing. Each check runs independently, so one mission
//! can raise several conflicts. Output is ordered by mission id, then by the
//! order the checks run in, and is identical across repeated runs.

use crate::availability::AvailabilityIndex;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sortie_domain::{
    locations_match, Drone, Mission, MissionStatus, Pilot, Resource, ResourceKind, TokenSet,
};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Kind of rule a mission's staffing breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConflictKind {
    /// Resource also holds another overlapping active mission
    DoubleBooking,
    /// Pilot lacks required skills
    SkillMismatch,
    /// Pilot lacks required certifications
    CertificationMismatch,
    /// Drone lacks capabilities matching required skills
    CapabilityMismatch,
    /// Resource is based somewhere other than the mission
    LocationMismatch,
    /// Resource status (or derived maintenance state) rules it out, or the
    /// assigned id is not on the roster
    ResourceUnavailable,
    /// Active mission has an empty slot
    MissingAssignment,
}

impl ConflictKind {
    pub fn label(&self) -> &'static str {
        match self {
            ConflictKind::DoubleBooking => "double booking",
            ConflictKind::SkillMismatch => "skill mismatch",
            ConflictKind::CertificationMismatch => "certification mismatch",
            ConflictKind::CapabilityMismatch => "capability mismatch",
            ConflictKind::LocationMismatch => "location mismatch",
            ConflictKind::ResourceUnavailable => "resource unavailable",
            ConflictKind::MissingAssignment => "missing assignment",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Detected violation for one mission. Derived fresh on every pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Mission the conflict belongs to
    pub mission_id: String,

    /// Rule broken
    pub kind: ConflictKind,

    /// Slot the conflict concerns; decides the replacement pool
    pub resource: ResourceKind,

    /// Human-readable explanation
    pub description: String,

    /// Every mission, pilot or drone id involved, this mission first
    pub involved: Vec<String>,
}

impl Conflict {
    fn new(
        mission: &Mission,
        kind: ConflictKind,
        resource: ResourceKind,
        description: String,
        others: &[&str],
    ) -> Self {
        let mut involved = Vec::with_capacity(others.len() + 1);
        involved.push(mission.id.clone());
        involved.extend(others.iter().map(|id| id.to_string()));

        Self {
            mission_id: mission.id.clone(),
            kind,
            resource,
            description,
            involved,
        }
    }

    /// Check if `id` is one of the involved entities
    pub fn involves(&self, id: &str) -> bool {
        self.involved.iter().any(|i| i == id)
    }
}

/// Detection knobs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectOptions {
    /// When set, missions that ended before this day are skipped
    pub as_of: Option<NaiveDate>,
}

/// Scan a snapshot with default options.
///
/// Total for well-formed records: never fails, returns an empty list when
/// nothing is wrong.
pub fn detect_conflicts(pilots: &[Pilot], drones: &[Drone], missions: &[Mission]) -> Vec<Conflict> {
    detect_conflicts_with(&DetectOptions::default(), pilots, drones, missions)
}

/// Scan a snapshot
pub fn detect_conflicts_with(
    options: &DetectOptions,
    pilots: &[Pilot],
    drones: &[Drone],
    missions: &[Mission],
) -> Vec<Conflict> {
    let pilots: HashMap<&str, &Pilot> = pilots.iter().map(|p| (p.id.as_str(), p)).collect();
    let drones: HashMap<&str, &Drone> = drones.iter().map(|d| (d.id.as_str(), d)).collect();
    let index = AvailabilityIndex::build(missions);

    let mut scanned: Vec<&Mission> = missions
        .iter()
        .filter(|m| m.is_active())
        .filter(|m| options.as_of.map_or(true, |day| m.schedule.end >= day))
        .collect();
    scanned.sort_by(|a, b| a.id.cmp(&b.id));

    let mut conflicts = Vec::new();
    for mission in scanned {
        let before = conflicts.len();
        let pilot = mission
            .assigned_pilot
            .as_deref()
            .map(|id| (id, pilots.get(id).copied()));
        let drone = mission
            .assigned_drone
            .as_deref()
            .map(|id| (id, drones.get(id).copied()));

        check_double_booking(mission, &index, &mut conflicts);

        if let Some((_, Some(pilot))) = pilot {
            check_missing(
                mission,
                pilot,
                &mission.required_skills,
                &pilot.skills,
                ConflictKind::SkillMismatch,
                "skills",
                &mut conflicts,
            );
            check_missing(
                mission,
                pilot,
                &mission.required_certifications,
                &pilot.certifications,
                ConflictKind::CertificationMismatch,
                "certifications",
                &mut conflicts,
            );
        }
        if let Some((_, Some(drone))) = drone {
            check_missing(
                mission,
                drone,
                &mission.required_skills,
                &drone.capabilities,
                ConflictKind::CapabilityMismatch,
                "capabilities",
                &mut conflicts,
            );
        }

        if let Some((_, Some(pilot))) = pilot {
            check_location(mission, pilot, &mut conflicts);
        }
        if let Some((_, Some(drone))) = drone {
            check_location(mission, drone, &mut conflicts);
        }

        if let Some((id, pilot)) = pilot {
            check_unavailable(mission, ResourceKind::Pilot, id, pilot, &mut conflicts);
        }
        if let Some((id, drone)) = drone {
            check_unavailable(mission, ResourceKind::Drone, id, drone, &mut conflicts);
        }

        if mission.status == MissionStatus::Active {
            for kind in [ResourceKind::Pilot, ResourceKind::Drone] {
                if mission.assigned(kind).is_none() {
                    conflicts.push(Conflict::new(
                        mission,
                        ConflictKind::MissingAssignment,
                        kind,
                        format!("active mission {} has no {} assigned", mission.id, kind),
                        &[],
                    ));
                }
            }
        }

        if conflicts.len() > before {
            debug!(
                mission_id = %mission.id,
                found = conflicts.len() - before,
                "mission has conflicts"
            );
        }
    }

    conflicts
}

fn check_double_booking(mission: &Mission, index: &AvailabilityIndex, out: &mut Vec<Conflict>) {
    for kind in [ResourceKind::Pilot, ResourceKind::Drone] {
        let Some(resource_id) = mission.assigned(kind) else {
            continue;
        };
        for booking in index
            .clashes(kind, resource_id, &mission.schedule)
            .filter(|b| b.mission_id != mission.id)
        {
            out.push(Conflict::new(
                mission,
                ConflictKind::DoubleBooking,
                kind,
                format!(
                    "{} {} is also assigned to mission {} ({}), overlapping mission {} ({})",
                    kind,
                    resource_id,
                    booking.mission_id,
                    booking.range,
                    mission.id,
                    mission.schedule
                ),
                &[booking.mission_id.as_str(), resource_id],
            ));
        }
    }
}

fn check_missing<R: Resource>(
    mission: &Mission,
    resource: &R,
    required: &TokenSet,
    held: &TokenSet,
    kind: ConflictKind,
    noun: &str,
    out: &mut Vec<Conflict>,
) {
    let missing = required.missing_from(held);
    if missing.is_empty() {
        return;
    }
    out.push(Conflict::new(
        mission,
        kind,
        resource.kind(),
        format!(
            "{} {} lacks required {} for mission {}: {}",
            resource.kind(),
            resource.resource_id(),
            noun,
            mission.id,
            missing.join(", ")
        ),
        &[resource.resource_id()],
    ));
}

fn check_location<R: Resource>(mission: &Mission, resource: &R, out: &mut Vec<Conflict>) {
    if locations_match(resource.location(), &mission.location) {
        return;
    }
    out.push(Conflict::new(
        mission,
        ConflictKind::LocationMismatch,
        resource.kind(),
        format!(
            "{} {} is in {} but mission {} is in {}",
            resource.kind(),
            resource.resource_id(),
            resource.location(),
            mission.id,
            mission.location
        ),
        &[resource.resource_id()],
    ));
}

fn check_unavailable<R: Resource>(
    mission: &Mission,
    kind: ResourceKind,
    resource_id: &str,
    resource: Option<&R>,
    out: &mut Vec<Conflict>,
) {
    let description = match resource {
        None => format!(
            "{} {} assigned to mission {} is not on record",
            kind, resource_id, mission.id
        ),
        Some(resource) => match resource.unavailability(&mission.schedule) {
            Some(reason) => format!("{} for mission {}", reason, mission.id),
            None => return,
        },
    };
    out.push(Conflict::new(
        mission,
        ConflictKind::ResourceUnavailable,
        kind,
        description,
        &[resource_id],
    ));
}
