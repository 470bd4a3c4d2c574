//! Store and coordinator workflows
//!
//! Drives the operations layer the way the CLI does: load a snapshot file,
//! run commands, save, reload.

use crate::test_utils::{date, fleet_document, init_test_logging, temp_path, write_snapshot};
use sortie_core::Config;
use sortie_domain::{PilotStatus, ResourceKind};
use sortie_ops::{Command, CommandOutcome, Coordinator, OpsError, RecordStore};
use sortie_scheduler::ConflictKind;
use std::fs;

fn conflicts(coordinator: &mut Coordinator) -> sortie_scheduler::PassReport {
    match coordinator.execute(Command::CheckConflicts).unwrap() {
        CommandOutcome::Conflicts(report) => report,
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_reassign_save_reload_cycle() {
    init_test_logging();
    let path = write_snapshot(&fleet_document());
    let config = Config::default();

    let store = RecordStore::load(&path).unwrap();
    let mut coordinator = Coordinator::new(store, &config.engine, date(2024, 6, 1));
    assert_eq!(conflicts(&mut coordinator).conflicts.len(), 5);

    coordinator
        .execute(Command::Reassign {
            mission_id: "M1".to_string(),
            pilot_id: Some("P2".to_string()),
            drone_id: None,
        })
        .unwrap();
    coordinator
        .execute(Command::Reassign {
            mission_id: "M4".to_string(),
            pilot_id: None,
            drone_id: Some("D1".to_string()),
        })
        .unwrap();
    coordinator.store().save(&path).unwrap();

    let reloaded = RecordStore::load(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(reloaded.mission("M1").unwrap().assigned_pilot.as_deref(), Some("P2"));
    assert_eq!(reloaded.mission("M4").unwrap().assigned_drone.as_deref(), Some("D1"));
    // Malformed rows are carried through the save untouched.
    assert_eq!(reloaded.rejected().len(), 2);

    let mut coordinator = Coordinator::new(reloaded, &config.engine, date(2024, 6, 1));
    let report = conflicts(&mut coordinator);
    let kinds: Vec<ConflictKind> = report.conflicts.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ConflictKind::DoubleBooking,
            ConflictKind::DoubleBooking,
            ConflictKind::ResourceUnavailable
        ]
    );
}

#[test]
fn test_reassign_refuses_lapsed_and_booked_drone() {
    let store = RecordStore::from_document(fleet_document());
    let mut coordinator = Coordinator::new(store, &Config::default().engine, date(2024, 6, 1));

    let err = coordinator
        .execute(Command::Reassign {
            mission_id: "M2".to_string(),
            pilot_id: None,
            drone_id: Some("D3".to_string()),
        })
        .unwrap_err();

    match err {
        OpsError::Unavailable {
            kind, id, reason, ..
        } => {
            assert_eq!(kind, ResourceKind::Drone);
            assert_eq!(id, "D3");
            assert!(reason.contains("maintenance"));
            assert!(reason.contains("M3"));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(
        coordinator.store().mission("M2").unwrap().assigned_drone.as_deref(),
        Some("D2")
    );
}

#[test]
fn test_status_change_surfaces_as_conflict() {
    let store = RecordStore::from_document(fleet_document());
    let mut coordinator = Coordinator::new(store, &Config::default().engine, date(2024, 6, 1));

    coordinator
        .execute(Command::UpdatePilotStatus {
            pilot_id: "P3".to_string(),
            status: PilotStatus::OnLeave,
        })
        .unwrap();

    let report = conflicts(&mut coordinator);
    assert!(report.conflicts.iter().any(|c| c.mission_id == "M4"
        && c.kind == ConflictKind::ResourceUnavailable
        && c.resource == ResourceKind::Pilot));
}

#[test]
fn test_config_drives_engine() {
    let config = Config::from_toml_str(
        r#"
[engine]
top_k = 1
as_of = "2024-06-07"

[store]
snapshot_path = "unused.json"
"#,
    )
    .unwrap();

    let store = RecordStore::from_document(fleet_document());
    let mut coordinator = Coordinator::new(store, &config.engine, date(2024, 6, 7));
    let report = conflicts(&mut coordinator);

    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.suggestions.len(), 1);
    assert_eq!(report.suggestions[0].candidate_id, "D1");
}

#[test]
fn test_open_uses_store_config() {
    let path = temp_path("missing");
    let mut config = Config::default();
    config.store.snapshot_path = path;

    assert!(matches!(RecordStore::open(&config.store), Err(OpsError::Io(_))));
}

#[test]
fn test_outcomes_serialize_for_front_ends() {
    let store = RecordStore::from_document(fleet_document());
    let mut coordinator = Coordinator::new(store, &Config::default().engine, date(2024, 6, 1));

    let outcome = coordinator
        .execute(Command::ListAvailablePilots {
            skill: Some("thermal".to_string()),
            location: Some("Dallas".to_string()),
        })
        .unwrap();
    let value = serde_json::to_value(&outcome).unwrap();

    assert_eq!(value["outcome"], "pilots");
    let ids: Vec<&str> = value["pilots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["P2", "P3"]);
}
