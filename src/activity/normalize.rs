//! Source record -> `UnifiedItem` mapping.
//!
//! Pure: no provider, storage or network access. Timestamps are parsed here;
//! a present but unparsable value rejects the record, an absent one simply
//! disables the urgency rules that depend on it.

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use serde::Serialize;

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::records::{AlertRecord, AppointmentRecord, DisplayNames, SourceRecord, TaskRecord};
use crate::types::{ItemType, Priority};
use crate::util::{parse_optional_timestamp, parse_timestamp};

use super::item::{ItemKind, ItemParts, UnifiedItem};

/// A record that could not be normalized.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRecord {
    pub item_type: ItemType,
    pub source_id: String,
    pub reason: String,
}

/// Result of normalizing a whole snapshot.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub items: Vec<UnifiedItem>,
    pub rejected: Vec<RejectedRecord>,
}

/// Normalize a single record.
pub fn to_unified_item(
    record: &SourceRecord,
    names: &DisplayNames,
    clock: &dyn Clock,
    config: &EngineConfig,
) -> Result<UnifiedItem, EngineError> {
    let tz = config.tz()?;
    normalize_at(record, names, clock.now(), tz, config)
}

/// Normalize many records against one clock reading. Bad records are logged
/// and reported instead of failing the batch.
pub fn normalize_batch(
    records: &[SourceRecord],
    names: &DisplayNames,
    clock: &dyn Clock,
    config: &EngineConfig,
) -> Result<NormalizedBatch, EngineError> {
    let tz = config.tz()?;
    let now = clock.now();
    let mut batch = NormalizedBatch {
        items: Vec::with_capacity(records.len()),
        rejected: Vec::new(),
    };

    for record in records {
        match normalize_at(record, names, now, tz, config) {
            Ok(item) => batch.items.push(item),
            Err(e) => {
                let item_type = record_type(record);
                log::warn!(
                    "Skipping {} {}: {}",
                    item_type.as_str(),
                    record.source_id(),
                    e
                );
                batch.rejected.push(RejectedRecord {
                    item_type,
                    source_id: record.source_id().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    log::debug!(
        "Normalized {} of {} records",
        batch.items.len(),
        records.len()
    );
    Ok(batch)
}

fn record_type(record: &SourceRecord) -> ItemType {
    match record {
        SourceRecord::Task(_) => ItemType::Task,
        SourceRecord::FollowUp(_) => ItemType::FollowUp,
        SourceRecord::Alert(_) => ItemType::Alert,
        SourceRecord::Appointment(_) => ItemType::Appointment,
    }
}

fn normalize_at(
    record: &SourceRecord,
    names: &DisplayNames,
    now: NaiveDateTime,
    tz: Option<Tz>,
    config: &EngineConfig,
) -> Result<UnifiedItem, EngineError> {
    let metadata = serde_json::to_value(record).map_err(|e| EngineError::Parse(e.to_string()))?;

    let parts = match record {
        SourceRecord::Task(task) => task_parts(task, false, names, tz, metadata)?,
        SourceRecord::FollowUp(task) => task_parts(task, true, names, tz, metadata)?,
        SourceRecord::Alert(alert) => alert_parts(alert, names, tz, metadata)?,
        SourceRecord::Appointment(apt) => appointment_parts(apt, names, tz, metadata)?,
    };

    Ok(UnifiedItem::from_parts(parts, now, config))
}

fn task_parts(
    task: &TaskRecord,
    follow_up: bool,
    names: &DisplayNames,
    tz: Option<Tz>,
    metadata: serde_json::Value,
) -> Result<ItemParts, EngineError> {
    let due_date = parse_optional_timestamp("dueDate", task.due_date.as_deref(), tz)?;
    let kind = if follow_up {
        ItemKind::FollowUp {
            due_date,
            completed: task.completed,
        }
    } else {
        ItemKind::Task {
            due_date,
            completed: task.completed,
        }
    };

    Ok(ItemParts {
        source_id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        created_at: parse_timestamp("createdAt", &task.created_at, tz)?,
        priority: Priority::parse_or_default(task.priority.as_deref()),
        client_id: task.client_id.clone(),
        client_name: names.client(task.client_id.as_deref()),
        prospect_id: task.prospect_id.clone(),
        prospect_name: names.prospect(task.prospect_id.as_deref()),
        assigned_to: task.assigned_to.clone(),
        kind,
        metadata,
    })
}

fn alert_parts(
    alert: &AlertRecord,
    names: &DisplayNames,
    tz: Option<Tz>,
    metadata: serde_json::Value,
) -> Result<ItemParts, EngineError> {
    Ok(ItemParts {
        source_id: alert.id.clone(),
        title: alert.title.clone(),
        description: alert.description.clone(),
        created_at: parse_timestamp("createdAt", &alert.created_at, tz)?,
        priority: alert.severity.mapped_priority(),
        client_id: alert.client_id.clone(),
        client_name: names.client(alert.client_id.as_deref()),
        prospect_id: alert.prospect_id.clone(),
        prospect_name: names.prospect(alert.prospect_id.as_deref()),
        assigned_to: None,
        kind: ItemKind::Alert {
            severity: alert.severity,
            read: alert.read,
            action_required: alert.action_required,
        },
        metadata,
    })
}

fn appointment_parts(
    apt: &AppointmentRecord,
    names: &DisplayNames,
    tz: Option<Tz>,
    metadata: serde_json::Value,
) -> Result<ItemParts, EngineError> {
    let start_time = parse_timestamp("startTime", &apt.start_time, tz)?;
    let end_time = parse_timestamp("endTime", &apt.end_time, tz)?;
    if end_time <= start_time {
        return Err(EngineError::InvalidRange {
            start: apt.start_time.clone(),
            end: apt.end_time.clone(),
        });
    }
    let created_at = apt.parsed_created_at(tz)?.unwrap_or(start_time);

    // Prefer the directory name; fall back to the name stored on the appointment.
    let client_name = names
        .client(apt.client_id.as_deref())
        .or_else(|| apt.client_name.clone());

    Ok(ItemParts {
        source_id: apt.id.clone(),
        title: apt.title.clone(),
        description: apt.description.clone(),
        created_at,
        priority: Priority::parse_or_default(apt.priority.as_deref()),
        client_id: apt.client_id.clone(),
        client_name,
        prospect_id: apt.prospect_id.clone(),
        prospect_name: names.prospect(apt.prospect_id.as_deref()),
        assigned_to: None,
        kind: ItemKind::Appointment {
            start_time,
            end_time,
            location: apt.location.clone(),
            appointment_type: apt.appointment_type,
        },
        metadata,
    })
}
