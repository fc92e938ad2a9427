//! Raw source-entity snapshots as handed over by the task, alert and
//! appointment providers.
//!
//! Timestamps stay as strings here; parsing happens once, at normalization,
//! so a malformed value is reported against the record that carried it.

use std::collections::HashMap;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::scheduling::AppointmentLike;
use crate::types::{AlertSeverity, AppointmentType, Priority};
use crate::util::{parse_optional_timestamp, parse_timestamp};

/// A task (or follow-up) row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prospect_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

/// A portfolio alert row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub severity: AlertSeverity,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub action_required: bool,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prospect_id: Option<String>,
}

/// A calendar appointment row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRecord {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    #[serde(rename = "type", default)]
    pub appointment_type: AppointmentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prospect_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl AppointmentRecord {
    /// Parse into the minimal appointment shape used by scheduling.
    pub fn to_appointment_like(&self, tz: Option<Tz>) -> Result<AppointmentLike, EngineError> {
        let start_time = parse_timestamp("startTime", &self.start_time, tz)?;
        let end_time = parse_timestamp("endTime", &self.end_time, tz)?;
        if end_time <= start_time {
            return Err(EngineError::InvalidRange {
                start: self.start_time.clone(),
                end: self.end_time.clone(),
            });
        }

        Ok(AppointmentLike {
            title: self.title.clone(),
            description: self.description.clone(),
            start_time,
            end_time,
            appointment_type: self.appointment_type,
            priority: Priority::parse_or_default(self.priority.as_deref()),
            client_name: self
                .client_name
                .clone()
                .filter(|name| !name.trim().is_empty()),
            location: self.location.clone(),
        })
    }

    pub(crate) fn parsed_created_at(
        &self,
        tz: Option<Tz>,
    ) -> Result<Option<chrono::NaiveDateTime>, EngineError> {
        parse_optional_timestamp("createdAt", self.created_at.as_deref(), tz)
    }
}

/// One source record, tagged with the stream it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "kebab-case")]
pub enum SourceRecord {
    Task(TaskRecord),
    FollowUp(TaskRecord),
    Alert(AlertRecord),
    Appointment(AppointmentRecord),
}

impl SourceRecord {
    pub fn source_id(&self) -> &str {
        match self {
            Self::Task(r) | Self::FollowUp(r) => &r.id,
            Self::Alert(r) => &r.id,
            Self::Appointment(r) => &r.id,
        }
    }
}

/// Cached display names for the entities items link to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayNames {
    #[serde(default)]
    pub clients: HashMap<String, String>,
    #[serde(default)]
    pub prospects: HashMap<String, String>,
}

impl DisplayNames {
    pub fn client(&self, id: Option<&str>) -> Option<String> {
        id.and_then(|id| self.clients.get(id)).cloned()
    }

    pub fn prospect(&self, id: Option<&str>) -> Option<String> {
        id.and_then(|id| self.prospects.get(id)).cloned()
    }
}

/// Everything the providers loaded for one view render.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSnapshot {
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    #[serde(default)]
    pub follow_ups: Vec<TaskRecord>,
    #[serde(default)]
    pub alerts: Vec<AlertRecord>,
    #[serde(default)]
    pub appointments: Vec<AppointmentRecord>,
    #[serde(default)]
    pub display_names: DisplayNames,
}

impl SourceSnapshot {
    /// All records in provider order: tasks, follow-ups, alerts, appointments.
    pub fn records(&self) -> Vec<SourceRecord> {
        let total = self.tasks.len()
            + self.follow_ups.len()
            + self.alerts.len()
            + self.appointments.len();
        let mut records = Vec::with_capacity(total);
        records.extend(self.tasks.iter().cloned().map(SourceRecord::Task));
        records.extend(self.follow_ups.iter().cloned().map(SourceRecord::FollowUp));
        records.extend(self.alerts.iter().cloned().map(SourceRecord::Alert));
        records.extend(
            self.appointments
                .iter()
                .cloned()
                .map(SourceRecord::Appointment),
        );
        records
    }
}
