use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One availability window within a day. Times are `HH:MM` strings and are
/// compared as text, so they must share a zero-padded format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(rename = "inicio")]
    pub start: String,
    #[serde(rename = "fin")]
    pub end: String,
}

impl TimeRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Day label → ranges, in the order the client sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklySchedule(BTreeMap<String, Vec<TimeRange>>);

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day(mut self, day: impl Into<String>, ranges: Vec<TimeRange>) -> Self {
        self.0.insert(day.into(), ranges);
        self
    }

    pub fn days(&self) -> impl Iterator<Item = (&str, &[TimeRange])> {
        self.0.iter().map(|(day, ranges)| (day.as_str(), ranges.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialist {
    pub id: Uuid,
    #[serde(rename = "nombre_completo")]
    pub full_name: String,
    #[serde(rename = "especialidad")]
    pub specialty: String,
    #[serde(rename = "registro_profesional")]
    pub registration_number: String,
    #[serde(rename = "dias_horarios")]
    pub weekly_schedule: WeeklySchedule,
    #[serde(rename = "activo")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Specialist {
    /// Merge supplied fields; anything left `None` keeps its prior value.
    pub fn apply(&mut self, patch: SpecialistPatch) {
        if let Some(full_name) = patch.full_name {
            self.full_name = full_name;
        }
        if let Some(specialty) = patch.specialty {
            self.specialty = specialty;
        }
        if let Some(registration_number) = patch.registration_number {
            self.registration_number = registration_number;
        }
        if let Some(weekly_schedule) = patch.weekly_schedule {
            self.weekly_schedule = weekly_schedule;
        }
    }
}

/// A validated specialist awaiting persistence. The store assigns the id
/// and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSpecialist {
    pub full_name: String,
    pub specialty: String,
    pub registration_number: String,
    pub weekly_schedule: WeeklySchedule,
}

/// Validated partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialistPatch {
    pub full_name: Option<String>,
    pub specialty: Option<String>,
    pub registration_number: Option<String>,
    pub weekly_schedule: Option<WeeklySchedule>,
}

/// Request body for create and update. Every field is optional on the wire
/// and stays untyped until validation, so a value of the wrong JSON type is
/// reported by the validation step that owns the field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpecialistPayload {
    pub nombre_completo: Option<serde_json::Value>,
    pub especialidad: Option<serde_json::Value>,
    pub registro_profesional: Option<serde_json::Value>,
    pub dias_horarios: Option<serde_json::Value>,
}
