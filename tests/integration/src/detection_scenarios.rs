//! End-to-end detection scenarios
//!
//! Raw rows go through ingest, detection and ranking exactly as the store
//! hands them to the engine.

use crate::test_utils::{date, fleet_document, init_test_logging};
use sortie_domain::{DateRange, Drone, Mission, MissionStatus, Pilot, ResourceKind};
use sortie_scheduler::{
    detect_conflicts, is_entity_available, run_pass, suggest_reassignment, ConflictKind,
    FleetSnapshot, PassOptions,
};

fn fleet() -> FleetSnapshot {
    let document = fleet_document();
    FleetSnapshot::from_records(&document.pilots, &document.drones, &document.missions)
}

fn summary(snapshot: &FleetSnapshot) -> Vec<(String, ConflictKind, ResourceKind)> {
    detect_conflicts(&snapshot.pilots, &snapshot.drones, &snapshot.missions)
        .into_iter()
        .map(|c| (c.mission_id, c.kind, c.resource))
        .collect()
}

#[test]
fn test_fleet_ingest_skips_malformed_rows() {
    init_test_logging();
    let snapshot = fleet();

    assert_eq!(snapshot.pilots.len(), 5);
    assert_eq!(snapshot.drones.len(), 4);
    assert_eq!(snapshot.missions.len(), 5);

    let rejected: Vec<(&str, &str)> = snapshot
        .rejected
        .iter()
        .map(|r| (r.kind.as_str(), r.error.field.as_str()))
        .collect();
    assert_eq!(rejected, vec![("pilot", "pilot_id"), ("mission", "end_date")]);
}

#[test]
fn test_fleet_conflicts() {
    init_test_logging();
    let snapshot = fleet();

    let expected = vec![
        ("M1".to_string(), ConflictKind::LocationMismatch, ResourceKind::Pilot),
        ("M2".to_string(), ConflictKind::DoubleBooking, ResourceKind::Pilot),
        ("M3".to_string(), ConflictKind::DoubleBooking, ResourceKind::Pilot),
        ("M3".to_string(), ConflictKind::ResourceUnavailable, ResourceKind::Drone),
        ("M4".to_string(), ConflictKind::MissingAssignment, ResourceKind::Drone),
    ];
    assert_eq!(summary(&snapshot), expected);
}

#[test]
fn test_fleet_pass_suggestions() {
    init_test_logging();
    let report = run_pass(&fleet(), &PassOptions::default());

    let picks: Vec<(&str, &str)> = report
        .suggestions
        .iter()
        .map(|s| (s.mission_id.as_str(), s.candidate_id.as_str()))
        .collect();
    assert_eq!(
        picks,
        vec![("M1", "P2"), ("M1", "P3"), ("M4", "D1"), ("M4", "D4")]
    );

    // Equal scores for D1 and D4 fall back to id order.
    let m4: Vec<f64> = report
        .suggestions
        .iter()
        .filter(|s| s.mission_id == "M4")
        .map(|s| s.score)
        .collect();
    assert_eq!(m4[0], m4[1]);
    assert_eq!(report.rejected.len(), 2);
}

#[test]
fn test_pass_as_of_skips_finished_missions() {
    let options = PassOptions {
        as_of: Some(date(2024, 6, 7)),
        top_k: 1,
    };
    let report = run_pass(&fleet(), &options);

    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.conflicts[0].mission_id, "M4");
    assert_eq!(report.suggestions.len(), 1);
    assert_eq!(report.suggestions[0].candidate_id, "D1");
}

#[test]
fn test_location_mismatch_example() {
    let pilots = vec![Pilot::new("P1", "Arjun", "Austin").with_skills("thermal, mapping")];
    let missions = vec![Mission::new(
        "M1",
        "Client",
        "Dallas",
        DateRange::new(date(2024, 6, 1), date(2024, 6, 3)).unwrap(),
    )
    .with_required_skills("thermal")
    .with_pilot("P1")];

    let conflicts = detect_conflicts(&pilots, &[], &missions);
    assert!(conflicts.iter().any(|c| c.kind == ConflictKind::LocationMismatch));
    assert!(!conflicts.iter().any(|c| c.kind == ConflictKind::SkillMismatch));
}

#[test]
fn test_maintenance_lapse_example() {
    let drone = Drone::new("D1", "M300", "Dallas").with_maintenance_due(date(2024, 5, 1));
    assert!(!is_entity_available(
        &drone,
        &DateRange::day(date(2024, 6, 1)),
        "Dallas",
        &[]
    ));
}

#[test]
fn test_resolving_conflicts_clears_them() {
    let mut snapshot = fleet();
    let report = run_pass(&snapshot, &PassOptions::default());

    // Apply the top pick for M1 and M4; M2 and M3 have no candidates.
    for mission_id in ["M1", "M4"] {
        let best = report
            .suggestions
            .iter()
            .find(|s| s.mission_id == mission_id)
            .unwrap();
        let mission = snapshot
            .missions
            .iter_mut()
            .find(|m| m.id == mission_id)
            .unwrap();
        mission.assign(best.resource, Some(best.candidate_id.clone()));
    }

    let remaining = summary(&snapshot);
    assert_eq!(remaining.len(), 3);
    assert!(remaining.iter().all(|(id, _, _)| id == "M2" || id == "M3"));
}

#[test]
fn test_completed_missions_release_their_crew() {
    let snapshot = fleet();
    let m5 = snapshot.missions.iter().find(|m| m.id == "M5").unwrap();
    assert_eq!(m5.status, MissionStatus::Completed);

    let p2 = snapshot.pilots.iter().find(|p| p.id == "P2").unwrap();
    assert!(is_entity_available(p2, &m5.schedule, "Dallas", &snapshot.missions));
}

#[test]
fn test_suggestions_never_mutate_the_snapshot() {
    let snapshot = fleet();
    let before = snapshot.clone();
    let conflicts = detect_conflicts(&snapshot.pilots, &snapshot.drones, &snapshot.missions);

    for conflict in &conflicts {
        suggest_reassignment(conflict, &snapshot.pilots, &snapshot.drones, &snapshot.missions, 3);
    }
    assert_eq!(snapshot, before);
}

mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn detection_ignores_mission_input_order(seed in any::<u64>()) {
            let snapshot = fleet();
            let mut shuffled = snapshot.missions.clone();
            // Deterministic rotation driven by the seed.
            let len = shuffled.len();
            shuffled.rotate_left((seed % len as u64) as usize);
            if seed % 2 == 0 {
                shuffled.reverse();
            }

            let a = detect_conflicts(&snapshot.pilots, &snapshot.drones, &snapshot.missions);
            let b = detect_conflicts(&snapshot.pilots, &snapshot.drones, &shuffled);
            prop_assert_eq!(a, b);
        }
    }
}
