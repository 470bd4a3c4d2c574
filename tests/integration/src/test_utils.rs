//! Shared fixtures for cross-crate scenarios

use chrono::NaiveDate;
use serde_json::json;
use sortie_ops::SnapshotDocument;
use std::path::PathBuf;
use std::sync::Once;

static LOGGING: Once = Once::new();

/// Route engine logs to the test harness. Safe to call from every test.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Unique path under the system temp directory
pub fn temp_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("sortie-{}-{}.json", label, uuid::Uuid::new_v4()))
}

/// Write `document` to a fresh temp file and return its path
pub fn write_snapshot(document: &SnapshotDocument) -> PathBuf {
    let path = temp_path("snapshot");
    std::fs::write(&path, serde_json::to_string_pretty(document).unwrap()).unwrap();
    path
}

/// Small fleet in the spreadsheet export format.
///
/// - M1 (Dallas, Active) is flown by P1 who is based in Austin
/// - M2 and M3 share pilot P4 on overlapping days
/// - M4 is Active with no drone
/// - D3 is past its maintenance date and staffed on M3
/// - one pilot row and one mission row are malformed
pub fn fleet_document() -> SnapshotDocument {
    serde_json::from_value(json!({
        "pilots": [
            {"pilot_id": "P1", "name": "Arjun", "skills": "Thermal, Mapping",
             "certifications": "DGCA", "experience_level": "Expert",
             "current_location": "Austin", "status": "Available"},
            {"pilot_id": "P2", "name": "Neha", "skills": "thermal, survey",
             "certifications": "DGCA", "experience_level": "Senior",
             "current_location": "Dallas", "status": "Available"},
            {"pilot_id": "P3", "name": "Rohit", "skills": "thermal",
             "experience_years": 1, "current_location": "Dallas", "status": "Available"},
            {"pilot_id": "P4", "name": "Sneha", "skills": "mapping, survey",
             "experience_level": "Senior", "current_location": "Houston", "status": "Available"},
            {"pilot_id": "P5", "name": "Vik", "skills": "thermal",
             "experience_level": "Expert", "current_location": "Dallas", "status": "On Leave"},
            {"pilot_id": "", "name": "Nameless", "current_location": "Dallas", "status": "Available"}
        ],
        "drones": [
            {"drone_id": "D1", "model": "DJI M300", "capabilities": "thermal, lidar",
             "status": "Available", "location": "Dallas", "battery_health": 92,
             "maintenance_due_date": "2024-12-01", "flight_hours": 310},
            {"drone_id": "D2", "model": "DJI Mavic 3", "capabilities": "mapping",
             "status": "Available", "location": "Houston", "battery_health": "88%"},
            {"drone_id": "D3", "model": "Skydio X10", "capabilities": "mapping, survey",
             "status": "Available", "location": "Houston", "battery_health": 70,
             "maintenance_due_date": "2024-05-15"},
            {"drone_id": "D4", "model": "DJI M30T", "capabilities": "thermal",
             "status": "Available", "location": "Dallas", "battery_health": 95}
        ],
        "missions": [
            {"mission_id": "M1", "client_name": "Lone Star Solar", "location": "Dallas",
             "required_skills": "thermal", "start_date": "2024-06-01", "end_date": "2024-06-03",
             "priority": "High", "status": "Active", "assigned_pilot": "P1", "assigned_drone": "D1"},
            {"mission_id": "M2", "client_name": "Gulf Survey", "location": "Houston",
             "required_skills": "mapping", "start_date": "2024-06-02", "end_date": "2024-06-05",
             "priority": "Medium", "status": "Planning", "assigned_pilot": "P4", "assigned_drone": "D2"},
            {"mission_id": "M3", "client_name": "Gulf Survey", "location": "Houston",
             "required_skills": "survey", "start_date": "2024-06-05", "end_date": "2024-06-06",
             "priority": "Critical", "status": "Active", "assigned_pilot": "P4", "assigned_drone": "D3"},
            {"mission_id": "M4", "client_name": "Metro Roads", "location": "Dallas",
             "required_skills": "thermal", "start_date": "2024-06-10", "end_date": "2024-06-11",
             "status": "Active", "assigned_pilot": "P3", "assigned_drone": "None"},
            {"mission_id": "M5", "client_name": "Old Job", "location": "Dallas",
             "start_date": "2024-05-01", "end_date": "2024-05-02",
             "status": "Completed", "assigned_pilot": "P2", "assigned_drone": "D4"},
            {"mission_id": "M6", "location": "Dallas",
             "start_date": "2024-06-09", "end_date": "2024-06-01"}
        ]
    }))
    .unwrap()
}
