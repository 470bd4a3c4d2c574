//! Mission records

use crate::error::{Result, ValidationError};
use crate::fields::{self, RawRecord};
use crate::records::{FromRecord, RowBuilder};
use crate::resource::ResourceKind;
use crate::types::{DateRange, TokenSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const ID_FIELDS: &[&str] = &["mission_id", "project_id", "id"];

/// Mission priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self> {
        match fields::vocabulary_key(raw).as_str() {
            "low" => Ok(Priority::Low),
            "medium" | "normal" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" | "urgent" => Ok(Priority::Critical),
            _ => Err(ValidationError::new(
                "priority",
                format!("unknown priority '{}'", raw),
            )),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Mission lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionStatus {
    /// Being planned; assignments may be incomplete
    Planning,
    /// Under way; needs both a pilot and a drone
    Active,
    /// Finished or called off; never scanned
    Completed,
}

impl MissionStatus {
    /// Planning and Active missions hold their resources
    pub fn is_active(&self) -> bool {
        matches!(self, MissionStatus::Planning | MissionStatus::Active)
    }
}

impl FromStr for MissionStatus {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self> {
        match fields::vocabulary_key(raw).as_str() {
            "planning" | "pending" | "planned" => Ok(MissionStatus::Planning),
            "active" | "assigned" | "inprogress" => Ok(MissionStatus::Active),
            "completed" | "complete" | "cancelled" | "canceled" => Ok(MissionStatus::Completed),
            _ => Err(ValidationError::new(
                "status",
                format!("unknown mission status '{}'", raw),
            )),
        }
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Client mission with its staffing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    /// Unique mission identifier
    pub id: String,

    /// Client the mission is flown for
    pub client: String,

    /// Where the mission is flown
    pub location: String,

    /// Skills the pilot must hold; drones must offer them as capabilities
    pub required_skills: TokenSet,

    /// Certifications the pilot must hold
    pub required_certifications: TokenSet,

    /// Scheduled days (inclusive)
    pub schedule: DateRange,

    /// Priority
    pub priority: Priority,

    /// Lifecycle status
    pub status: MissionStatus,

    /// Assigned pilot (if any)
    pub assigned_pilot: Option<String>,

    /// Assigned drone (if any)
    pub assigned_drone: Option<String>,

    /// Free-text notes
    pub description: String,
}

impl Mission {
    pub fn new(
        id: impl Into<String>,
        client: impl Into<String>,
        location: impl Into<String>,
        schedule: DateRange,
    ) -> Self {
        Self {
            id: id.into(),
            client: client.into(),
            location: location.into(),
            required_skills: TokenSet::new(),
            required_certifications: TokenSet::new(),
            schedule,
            priority: Priority::Medium,
            status: MissionStatus::Planning,
            assigned_pilot: None,
            assigned_drone: None,
            description: String::new(),
        }
    }

    pub fn with_required_skills(mut self, skills: &str) -> Self {
        self.required_skills = TokenSet::parse(skills);
        self
    }

    pub fn with_required_certifications(mut self, certifications: &str) -> Self {
        self.required_certifications = TokenSet::parse(certifications);
        self
    }

    pub fn with_status(mut self, status: MissionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_pilot(mut self, pilot_id: impl Into<String>) -> Self {
        self.assigned_pilot = Some(pilot_id.into());
        self
    }

    pub fn with_drone(mut self, drone_id: impl Into<String>) -> Self {
        self.assigned_drone = Some(drone_id.into());
        self
    }

    /// Check if the mission holds its resources
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Id assigned to the given slot
    pub fn assigned(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::Pilot => self.assigned_pilot.as_deref(),
            ResourceKind::Drone => self.assigned_drone.as_deref(),
        }
    }

    /// Fill or clear the given slot
    pub fn assign(&mut self, kind: ResourceKind, resource_id: Option<String>) {
        match kind {
            ResourceKind::Pilot => self.assigned_pilot = resource_id,
            ResourceKind::Drone => self.assigned_drone = resource_id,
        }
    }

    /// Parse a mission row
    pub fn from_record(record: &RawRecord) -> Result<Self> {
        let id = fields::required_text(record, ID_FIELDS)?;
        let location = fields::required_text(record, &["location"])?;

        let start = fields::required_date(record, &["start_date"])?;
        let end = fields::required_date(record, &["end_date"])?;
        let schedule = DateRange::new(start, end).ok_or_else(|| {
            ValidationError::new(
                "end_date",
                format!("end date {} is before start date {}", end, start),
            )
        })?;

        let priority = match fields::text(record, &["priority"]) {
            Some(raw) => raw.parse::<Priority>()?,
            None => Priority::Medium,
        };
        let status = match fields::text(record, &["status"]) {
            Some(raw) => raw.parse::<MissionStatus>()?,
            None => MissionStatus::Planning,
        };

        Ok(Self {
            id,
            client: fields::text(record, &["client", "client_name"]).unwrap_or_default(),
            location,
            required_skills: fields::tokens(record, &["required_skills"]),
            required_certifications: fields::tokens(record, &["required_certifications"]),
            schedule,
            priority,
            status,
            assigned_pilot: fields::text(record, &["assigned_pilot"]),
            assigned_drone: fields::text(record, &["assigned_drone"]),
            description: fields::text(record, &["description"]).unwrap_or_default(),
        })
    }
}

impl FromRecord for Mission {
    const KIND: &'static str = "mission";
    const ID_FIELDS: &'static [&'static str] = ID_FIELDS;

    fn from_record(record: &RawRecord) -> Result<Self> {
        Mission::from_record(record)
    }

    fn record_id(&self) -> &str {
        &self.id
    }

    fn to_record(&self) -> RawRecord {
        RowBuilder::new()
            .text("mission_id", &self.id)
            .text("client", &self.client)
            .text("location", &self.location)
            .tokens("required_skills", &self.required_skills)
            .tokens("required_certifications", &self.required_certifications)
            .date("start_date", self.schedule.start)
            .date("end_date", self.schedule.end)
            .text("priority", self.priority.to_string())
            .text("status", self.status.to_string())
            .optional_text("assigned_pilot", self.assigned_pilot.as_deref())
            .optional_text("assigned_drone", self.assigned_drone.as_deref())
            .text("description", &self.description)
            .finish()
    }
}
