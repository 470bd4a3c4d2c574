//! Reassignment recommender
//!
//! Ranks replacement pilots or drones for the slot a conflict concerns.
//! Pure function of the snapshot: nothing is mutated and the same inputs
//! always produce the same ranking.

use crate::availability::AvailabilityIndex;
use crate::conflicts::{Conflict, ConflictKind};
use serde::{Deserialize, Serialize};
use sortie_domain::{locations_match, Drone, Mission, Pilot, Resource, ResourceKind, TokenSet};
use std::cmp::Ordering;
use tracing::debug;

/// Weight of required-skill coverage in the fit score
pub const SKILL_WEIGHT: f64 = 0.5;

/// Weight of the experience tier in the fit score
pub const EXPERIENCE_WEIGHT: f64 = 0.3;

/// Weight of a location match in the fit score
pub const LOCATION_WEIGHT: f64 = 0.2;

/// Ranked replacement candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Kind of conflict being resolved
    pub conflict: ConflictKind,

    /// Mission to re-staff
    pub mission_id: String,

    /// Slot the candidate would fill
    pub resource: ResourceKind,

    /// Replacement pilot or drone id
    pub candidate_id: String,

    /// Fit score in [0, 1]
    pub score: f64,

    /// Human-readable breakdown of the score
    pub rationale: String,
}

/// Score components for one candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    /// Share of required tokens the candidate holds (1.0 when none required)
    pub coverage: f64,
    /// Experience tier weight
    pub experience: f64,
    /// 1.0 when based at the mission location
    pub location: f64,
}

impl Fit {
    pub fn score(&self) -> f64 {
        self.coverage * SKILL_WEIGHT
            + self.experience * EXPERIENCE_WEIGHT
            + self.location * LOCATION_WEIGHT
    }
}

/// Fit of `candidate` for `mission`
pub fn fit_score<R: Resource + ?Sized>(candidate: &R, mission: &Mission) -> Fit {
    let required = &mission.required_skills;
    let coverage = if required.is_empty() {
        1.0
    } else {
        required.overlap(candidate.tokens()) as f64 / required.len() as f64
    };

    Fit {
        coverage,
        experience: candidate.experience_weight(),
        location: if locations_match(candidate.location(), &mission.location) {
            1.0
        } else {
            0.0
        },
    }
}

/// Ranked replacements for the slot `conflict` concerns, best first, at
/// most `top_k` long. Empty when the mission is unknown or completed, or
/// when nobody qualifies.
pub fn suggest_reassignment(
    conflict: &Conflict,
    pilots: &[Pilot],
    drones: &[Drone],
    missions: &[Mission],
    top_k: usize,
) -> Vec<Suggestion> {
    let Some(mission) = missions.iter().find(|m| m.id == conflict.mission_id) else {
        debug!(mission_id = %conflict.mission_id, "no such mission, nothing to suggest");
        return Vec::new();
    };
    if !mission.is_active() {
        return Vec::new();
    }

    let index = AvailabilityIndex::excluding(missions, &mission.id);
    let mut suggestions = match conflict.resource {
        ResourceKind::Pilot => rank(conflict, mission, &index, pilots, |p| {
            mission.required_certifications.is_subset(&p.certifications)
        }),
        ResourceKind::Drone => rank(conflict, mission, &index, drones, |_| true),
    };

    suggestions.sort_by(compare);
    suggestions.truncate(top_k);

    debug!(
        mission_id = %mission.id,
        resource = %conflict.resource,
        kept = suggestions.len(),
        "ranked replacements"
    );

    suggestions
}

/// Suggestions for every conflict, in conflict order
pub fn suggest_for_conflicts(
    conflicts: &[Conflict],
    pilots: &[Pilot],
    drones: &[Drone],
    missions: &[Mission],
    top_k: usize,
) -> Vec<(Conflict, Vec<Suggestion>)> {
    conflicts
        .iter()
        .map(|c| {
            (
                c.clone(),
                suggest_reassignment(c, pilots, drones, missions, top_k),
            )
        })
        .collect()
}

fn rank<R: Resource>(
    conflict: &Conflict,
    mission: &Mission,
    index: &AvailabilityIndex,
    pool: &[R],
    qualifies: impl Fn(&R) -> bool,
) -> Vec<Suggestion> {
    let current = mission.assigned(conflict.resource);

    pool.iter()
        .filter(|c| Some(c.resource_id()) != current)
        .filter(|c| index.is_available(*c, &mission.schedule, &mission.location))
        .filter(|c| mission.required_skills.is_subset(c.tokens()))
        .filter(|c| qualifies(*c))
        .map(|candidate| {
            let fit = fit_score(candidate, mission);
            Suggestion {
                conflict: conflict.kind,
                mission_id: mission.id.clone(),
                resource: candidate.kind(),
                candidate_id: candidate.resource_id().to_string(),
                score: fit.score(),
                rationale: rationale(candidate, &mission.required_skills, &fit),
            }
        })
        .collect()
}

fn compare(a: &Suggestion, b: &Suggestion) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.candidate_id.cmp(&b.candidate_id))
}

fn rationale<R: Resource + ?Sized>(candidate: &R, required: &TokenSet, fit: &Fit) -> String {
    let coverage = if required.is_empty() {
        "no required skills".to_string()
    } else {
        format!(
            "covers {}/{} required skills",
            required.overlap(candidate.tokens()),
            required.len()
        )
    };
    format!(
        "{} {}: {}, experience weight {:.1}, {} (score {:.2})",
        candidate.kind(),
        candidate.resource_id(),
        coverage,
        fit.experience,
        if fit.location > 0.0 {
            "on site"
        } else {
            "off site"
        },
        fit.score()
    )
}
