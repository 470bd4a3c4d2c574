//! Drone fleet records

use crate::error::{Result, ValidationError};
use crate::fields::{self, RawRecord};
use crate::records::{FromRecord, RowBuilder};
use crate::resource::{Resource, ResourceKind};
use crate::types::{DateRange, TokenSet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const ID_FIELDS: &[&str] = &["drone_id", "id"];

/// Drones carry no experience attribute; they rank with a neutral weight.
pub const DRONE_EXPERIENCE_WEIGHT: f64 = 0.6;

/// Stored drone status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DroneStatus {
    /// Ready for assignment
    Available,
    /// Grounded for servicing
    Maintenance,
    /// Out on a mission
    Deployed,
}

impl FromStr for DroneStatus {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self> {
        match fields::vocabulary_key(raw).as_str() {
            "available" => Ok(DroneStatus::Available),
            "maintenance" | "inactive" => Ok(DroneStatus::Maintenance),
            "deployed" | "assigned" => Ok(DroneStatus::Deployed),
            _ => Err(ValidationError::new(
                "status",
                format!("unknown drone status '{}'", raw),
            )),
        }
    }
}

impl fmt::Display for DroneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Fleet airframe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drone {
    /// Unique drone identifier
    pub id: String,

    /// Airframe model
    pub model: String,

    /// Normalised capability tokens
    pub capabilities: TokenSet,

    /// Current base location
    pub location: String,

    /// Status as stored; see [`Drone::effective_status`]
    pub status: DroneStatus,

    /// Next scheduled service (optional)
    pub maintenance_due: Option<NaiveDate>,

    /// Battery health percentage (0-100)
    pub battery_health: u8,

    /// Accumulated flight hours (optional)
    pub flight_hours: Option<u32>,
}

impl Drone {
    pub fn new(id: impl Into<String>, model: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            capabilities: TokenSet::new(),
            location: location.into(),
            status: DroneStatus::Available,
            maintenance_due: None,
            battery_health: 100,
            flight_hours: None,
        }
    }

    pub fn with_capabilities(mut self, capabilities: &str) -> Self {
        self.capabilities = TokenSet::parse(capabilities);
        self
    }

    pub fn with_status(mut self, status: DroneStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_maintenance_due(mut self, due: NaiveDate) -> Self {
        self.maintenance_due = Some(due);
        self
    }

    /// Maintenance falls due on or before the last day of `range`, so the
    /// airframe cannot fly the whole range without service.
    pub fn maintenance_lapsed(&self, range: &DateRange) -> bool {
        self.maintenance_due.is_some_and(|due| due <= range.end)
    }

    /// Stored status with the maintenance rule applied: a lapsed airframe
    /// reads as `Maintenance` whatever the stored field says.
    pub fn effective_status(&self, range: &DateRange) -> DroneStatus {
        if self.maintenance_lapsed(range) {
            DroneStatus::Maintenance
        } else {
            self.status
        }
    }

    /// Parse a fleet row
    pub fn from_record(record: &RawRecord) -> Result<Self> {
        let id = fields::required_text(record, ID_FIELDS)?;
        let location = fields::required_text(record, &["location", "current_location"])?;
        let status: DroneStatus = fields::required_text(record, &["status"])?.parse()?;

        let battery_health = match fields::optional_number(record, &["battery_health"])? {
            Some(value) if (0.0..=100.0).contains(&value) => value.round() as u8,
            Some(value) => {
                return Err(ValidationError::new(
                    "battery_health",
                    format!("must be within 0-100, got {}", value),
                ))
            }
            None => return Err(ValidationError::missing("battery_health")),
        };

        let flight_hours = match fields::optional_number(record, &["flight_hours"])? {
            Some(hours) if hours >= 0.0 => Some(hours.round() as u32),
            Some(hours) => {
                return Err(ValidationError::new(
                    "flight_hours",
                    format!("must not be negative, got {}", hours),
                ))
            }
            None => None,
        };

        Ok(Self {
            id,
            model: fields::text(record, &["model"]).unwrap_or_default(),
            capabilities: fields::tokens(record, &["capabilities"]),
            location,
            status,
            maintenance_due: fields::optional_date(
                record,
                &["maintenance_due_date", "maintenance_due"],
            )?,
            battery_health,
            flight_hours,
        })
    }
}

impl FromRecord for Drone {
    const KIND: &'static str = "drone";
    const ID_FIELDS: &'static [&'static str] = ID_FIELDS;

    fn from_record(record: &RawRecord) -> Result<Self> {
        Drone::from_record(record)
    }

    fn record_id(&self) -> &str {
        &self.id
    }

    fn to_record(&self) -> RawRecord {
        let row = RowBuilder::new()
            .text("drone_id", &self.id)
            .text("model", &self.model)
            .tokens("capabilities", &self.capabilities)
            .text("status", self.status.to_string())
            .text("location", &self.location)
            .optional_date("maintenance_due_date", self.maintenance_due)
            .number("battery_health", self.battery_health);
        match self.flight_hours {
            Some(hours) => row.number("flight_hours", hours).finish(),
            None => row.finish(),
        }
    }
}

impl Resource for Drone {
    fn resource_id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Drone
    }

    fn location(&self) -> &str {
        &self.location
    }

    fn tokens(&self) -> &TokenSet {
        &self.capabilities
    }

    fn experience_weight(&self) -> f64 {
        DRONE_EXPERIENCE_WEIGHT
    }

    fn unavailability(&self, range: &DateRange) -> Option<String> {
        if self.maintenance_lapsed(range) {
            if let Some(due) = self.maintenance_due {
                return Some(format!("drone {} maintenance due {}", self.id, due));
            }
        }
        match self.status {
            DroneStatus::Available => None,
            other => Some(format!("drone {} is {}", self.id, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> RawRecord {
        serde_json::from_value(value).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_fleet_row() {
        let drone = Drone::from_record(&record(json!({
            "drone_id": "D001",
            "model": "DJI M300",
            "capabilities": "LiDAR, RGB",
            "status": "Available",
            "location": "Bangalore",
            "maintenance_due_date": "2024-07-01",
            "battery_health": "88",
            "flight_hours": 120
        })))
        .unwrap();

        assert_eq!(drone.id, "D001");
        assert!(drone.capabilities.contains("lidar"));
        assert_eq!(drone.maintenance_due, Some(date(2024, 7, 1)));
        assert_eq!(drone.battery_health, 88);
        assert_eq!(drone.flight_hours, Some(120));
    }

    #[test]
    fn test_battery_out_of_range_rejected() {
        let err = Drone::from_record(&record(json!({
            "drone_id": "D002",
            "status": "Available",
            "location": "Austin",
            "battery_health": 140
        })))
        .unwrap_err();
        assert_eq!(err.field, "battery_health");
        assert!(err.reason.contains("140"));
    }

    #[test]
    fn test_missing_battery_rejected() {
        let err = Drone::from_record(&record(json!({
            "drone_id": "D002",
            "status": "Available",
            "location": "Austin"
        })))
        .unwrap_err();
        assert_eq!(err.field, "battery_health");
    }

    #[test]
    fn test_status_vocabulary() {
        assert_eq!("Assigned".parse::<DroneStatus>().unwrap(), DroneStatus::Deployed);
        assert_eq!("inactive".parse::<DroneStatus>().unwrap(), DroneStatus::Maintenance);
        assert!("Flying".parse::<DroneStatus>().is_err());
    }

    #[test]
    fn test_lapsed_maintenance_overrides_stored_status() {
        let drone = Drone::new("D1", "M300", "Austin").with_maintenance_due(date(2024, 5, 1));
        let query = DateRange::day(date(2024, 6, 1));

        assert_eq!(drone.status, DroneStatus::Available);
        assert_eq!(drone.effective_status(&query), DroneStatus::Maintenance);
        assert!(!drone.is_ready_for(&query));
        assert!(drone.unavailability(&query).unwrap().contains("2024-05-01"));
    }

    #[test]
    fn test_maintenance_due_mid_range_lapses() {
        let drone = Drone::new("D1", "M300", "Austin").with_maintenance_due(date(2024, 6, 2));
        let before = DateRange::day(date(2024, 6, 1));
        let spanning = DateRange::new(date(2024, 6, 1), date(2024, 6, 3)).unwrap();

        assert!(drone.is_ready_for(&before));
        assert!(!drone.is_ready_for(&spanning));
    }

    #[test]
    fn test_stored_status_respected() {
        let drone = Drone::new("D1", "M300", "Austin").with_status(DroneStatus::Deployed);
        assert!(!drone.is_ready_for(&DateRange::day(date(2024, 6, 1))));
        assert_eq!(drone.experience_weight(), DRONE_EXPERIENCE_WEIGHT);
    }
}
