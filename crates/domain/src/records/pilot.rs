//! Pilot roster records

use crate::error::{Result, ValidationError};
use crate::fields::{self, RawRecord};
use crate::records::{FromRecord, RowBuilder};
use crate::resource::{Resource, ResourceKind};
use crate::types::{DateRange, TokenSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const ID_FIELDS: &[&str] = &["pilot_id", "id"];

/// Pilot duty status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PilotStatus {
    /// Free to take assignments
    Available,
    /// On leave
    OnLeave,
    /// Unavailable for any other reason (including already on assignment)
    Unavailable,
}

impl FromStr for PilotStatus {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self> {
        match fields::vocabulary_key(raw).as_str() {
            "available" => Ok(PilotStatus::Available),
            "onleave" | "leave" => Ok(PilotStatus::OnLeave),
            "unavailable" | "assigned" | "onassignment" => Ok(PilotStatus::Unavailable),
            _ => Err(ValidationError::new(
                "status",
                format!("unknown pilot status '{}'", raw),
            )),
        }
    }
}

impl fmt::Display for PilotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PilotStatus::Available => "Available",
            PilotStatus::OnLeave => "On Leave",
            PilotStatus::Unavailable => "Unavailable",
        };
        f.write_str(label)
    }
}

/// Pilot experience tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Junior,
    Senior,
    Expert,
}

impl ExperienceLevel {
    /// Ranking weight used by the recommender
    pub fn weight(&self) -> f64 {
        match self {
            ExperienceLevel::Junior => 0.3,
            ExperienceLevel::Senior => 0.6,
            ExperienceLevel::Expert => 1.0,
        }
    }

    /// Tier implied by years flown, for rosters that only track years
    pub fn from_years(years: f64) -> Self {
        if years >= 8.0 {
            ExperienceLevel::Expert
        } else if years >= 3.0 {
            ExperienceLevel::Senior
        } else {
            ExperienceLevel::Junior
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self> {
        match fields::vocabulary_key(raw).as_str() {
            "junior" => Ok(ExperienceLevel::Junior),
            "senior" => Ok(ExperienceLevel::Senior),
            "expert" => Ok(ExperienceLevel::Expert),
            _ => Err(ValidationError::new(
                "experience_level",
                format!("unknown experience level '{}'", raw),
            )),
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Pilot roster entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pilot {
    /// Unique pilot identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Normalised skill tokens
    pub skills: TokenSet,

    /// Normalised certification tokens
    pub certifications: TokenSet,

    /// Current base location
    pub location: String,

    /// Duty status as stored
    pub status: PilotStatus,

    /// Experience tier
    pub experience: ExperienceLevel,

    /// Window the pilot can be scheduled in, when the roster restricts it
    pub availability: Option<DateRange>,

    /// Contact address (optional)
    pub contact: Option<String>,
}

impl Pilot {
    /// Create an available pilot with no skills or restrictions
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            skills: TokenSet::new(),
            certifications: TokenSet::new(),
            location: location.into(),
            status: PilotStatus::Available,
            experience: ExperienceLevel::Junior,
            availability: None,
            contact: None,
        }
    }

    pub fn with_skills(mut self, skills: &str) -> Self {
        self.skills = TokenSet::parse(skills);
        self
    }

    pub fn with_certifications(mut self, certifications: &str) -> Self {
        self.certifications = TokenSet::parse(certifications);
        self
    }

    pub fn with_status(mut self, status: PilotStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_experience(mut self, experience: ExperienceLevel) -> Self {
        self.experience = experience;
        self
    }

    pub fn with_availability(mut self, window: DateRange) -> Self {
        self.availability = Some(window);
        self
    }

    /// Parse a roster row
    pub fn from_record(record: &RawRecord) -> Result<Self> {
        let id = fields::required_text(record, ID_FIELDS)?;
        let name = fields::text(record, &["name"]).unwrap_or_else(|| id.clone());
        let location = fields::required_text(record, &["current_location", "location"])?;
        let status: PilotStatus = fields::required_text(record, &["status"])?.parse()?;

        let experience = match fields::text(record, &["experience_level", "experience"]) {
            Some(raw) => raw.parse::<ExperienceLevel>()?,
            None => match fields::optional_number(record, &["experience_years"])? {
                Some(years) if years >= 0.0 => ExperienceLevel::from_years(years),
                Some(years) => {
                    return Err(ValidationError::new(
                        "experience_years",
                        format!("must not be negative, got {}", years),
                    ))
                }
                None => return Err(ValidationError::missing("experience_level")),
            },
        };

        let start = fields::optional_date(record, &["availability_start"])?;
        let end = fields::optional_date(record, &["availability_end"])?;
        let availability = match (start, end) {
            (Some(start), Some(end)) => Some(DateRange::new(start, end).ok_or_else(|| {
                ValidationError::new(
                    "availability_end",
                    format!("availability ends {} before it starts {}", end, start),
                )
            })?),
            (None, None) => None,
            (Some(_), None) => return Err(ValidationError::missing("availability_end")),
            (None, Some(_)) => return Err(ValidationError::missing("availability_start")),
        };

        Ok(Self {
            id,
            name,
            skills: fields::tokens(record, &["skills"]),
            certifications: fields::tokens(record, &["certifications"]),
            location,
            status,
            experience,
            availability,
            contact: fields::text(record, &["contact", "contact_email", "contact_info"]),
        })
    }
}

impl FromRecord for Pilot {
    const KIND: &'static str = "pilot";
    const ID_FIELDS: &'static [&'static str] = ID_FIELDS;

    fn from_record(record: &RawRecord) -> Result<Self> {
        Pilot::from_record(record)
    }

    fn record_id(&self) -> &str {
        &self.id
    }

    fn to_record(&self) -> RawRecord {
        let window = self.availability;
        RowBuilder::new()
            .text("pilot_id", &self.id)
            .text("name", &self.name)
            .tokens("skills", &self.skills)
            .tokens("certifications", &self.certifications)
            .text("experience_level", self.experience.to_string())
            .text("current_location", &self.location)
            .text("status", self.status.to_string())
            .optional_date("availability_start", window.map(|w| w.start))
            .optional_date("availability_end", window.map(|w| w.end))
            .optional_text("contact", self.contact.as_deref())
            .finish()
    }
}

impl Resource for Pilot {
    fn resource_id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Pilot
    }

    fn location(&self) -> &str {
        &self.location
    }

    fn tokens(&self) -> &TokenSet {
        &self.skills
    }

    fn experience_weight(&self) -> f64 {
        self.experience.weight()
    }

    fn unavailability(&self, range: &DateRange) -> Option<String> {
        if self.status != PilotStatus::Available {
            return Some(format!("pilot {} is {}", self.id, self.status));
        }
        match self.availability {
            Some(window) if !window.contains(range) => Some(format!(
                "pilot {} is only available {}",
                self.id, window
            )),
            _ => None,
        }
    }
}
