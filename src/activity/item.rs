//! Unified work-item model.
//!
//! Tasks, follow-ups, alerts and appointments share one comparable shape.
//! Type-specific fields live on `ItemKind`, so an alert cannot carry a due
//! date and a task cannot carry a severity.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::types::{AlertSeverity, AppointmentType, ItemType, Priority, UrgencyTier};

use super::urgency::{classify, UrgencySignals};

/// Per-source fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ItemKind {
    Task {
        due_date: Option<NaiveDateTime>,
        completed: bool,
    },
    FollowUp {
        due_date: Option<NaiveDateTime>,
        completed: bool,
    },
    Alert {
        severity: AlertSeverity,
        read: bool,
        action_required: bool,
    },
    Appointment {
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        location: Option<String>,
        appointment_type: AppointmentType,
    },
}

impl ItemKind {
    pub fn item_type(&self) -> ItemType {
        match self {
            Self::Task { .. } => ItemType::Task,
            Self::FollowUp { .. } => ItemType::FollowUp,
            Self::Alert { .. } => ItemType::Alert,
            Self::Appointment { .. } => ItemType::Appointment,
        }
    }
}

/// A normalized unit of work.
///
/// `priority`, `kind` and `urgency` are private: urgency is derived from the
/// other two, so they can only change together through the setters below.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedItem {
    pub id: String,
    pub source_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    priority: Priority,
    urgency: UrgencyTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prospect_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prospect_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(flatten)]
    kind: ItemKind,
    /// The untouched source record, for consumers needing fields outside
    /// the unified shape.
    pub metadata: serde_json::Value,
}

/// Everything except the derived urgency.
#[derive(Debug, Clone)]
pub struct ItemParts {
    pub source_id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub priority: Priority,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub prospect_id: Option<String>,
    pub prospect_name: Option<String>,
    pub assigned_to: Option<String>,
    pub kind: ItemKind,
    pub metadata: serde_json::Value,
}

impl UnifiedItem {
    /// Build an item, classifying it at `now`.
    pub fn from_parts(parts: ItemParts, now: NaiveDateTime, config: &EngineConfig) -> Self {
        let id = format!("{}-{}", parts.kind.item_type().as_str(), parts.source_id);
        let mut item = Self {
            id,
            source_id: parts.source_id,
            title: parts.title,
            description: parts.description,
            created_at: parts.created_at,
            priority: parts.priority,
            urgency: UrgencyTier::Scheduled,
            client_id: parts.client_id,
            client_name: parts.client_name,
            prospect_id: parts.prospect_id,
            prospect_name: parts.prospect_name,
            assigned_to: parts.assigned_to,
            kind: parts.kind,
            metadata: parts.metadata,
        };
        item.urgency = classify(&item.signals(), now, config);
        item
    }

    pub fn item_type(&self) -> ItemType {
        self.kind.item_type()
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn urgency(&self) -> UrgencyTier {
        self.urgency
    }

    pub fn set_priority(&mut self, priority: Priority, clock: &dyn Clock, config: &EngineConfig) {
        self.priority = priority;
        self.reclassify(clock, config);
    }

    /// Replace the type-specific fields. The item type may not change, since
    /// the composite id encodes it.
    pub fn set_kind(&mut self, kind: ItemKind, clock: &dyn Clock, config: &EngineConfig) -> bool {
        if kind.item_type() != self.item_type() {
            return false;
        }
        self.kind = kind;
        self.reclassify(clock, config);
        true
    }

    /// Recompute urgency against the current time.
    pub fn reclassify(&mut self, clock: &dyn Clock, config: &EngineConfig) {
        self.urgency = classify(&self.signals(), clock.now(), config);
    }

    /// Classifier inputs relevant to this item's type.
    pub fn signals(&self) -> UrgencySignals {
        let mut signals = UrgencySignals::new(self.priority);
        match &self.kind {
            ItemKind::Task {
                due_date,
                completed,
            }
            | ItemKind::FollowUp {
                due_date,
                completed,
            } => {
                signals.due_date = *due_date;
                signals.completed = *completed;
            }
            ItemKind::Alert {
                severity,
                action_required,
                ..
            } => {
                signals.severity = Some(*severity);
                signals.action_required = *action_required;
            }
            ItemKind::Appointment { start_time, .. } => {
                signals.start_time = Some(*start_time);
            }
        }
        signals
    }

    pub fn due_date(&self) -> Option<NaiveDateTime> {
        match &self.kind {
            ItemKind::Task { due_date, .. } | ItemKind::FollowUp { due_date, .. } => *due_date,
            _ => None,
        }
    }

    pub fn start_time(&self) -> Option<NaiveDateTime> {
        match &self.kind {
            ItemKind::Appointment { start_time, .. } => Some(*start_time),
            _ => None,
        }
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        match &self.kind {
            ItemKind::Appointment { end_time, .. } => Some(*end_time),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(
            self.kind,
            ItemKind::Task {
                completed: true,
                ..
            } | ItemKind::FollowUp {
                completed: true,
                ..
            }
        )
    }

    pub fn is_read(&self) -> bool {
        matches!(self.kind, ItemKind::Alert { read: true, .. })
    }

    /// Due date, else start time, else creation time.
    pub fn effective_timestamp(&self) -> NaiveDateTime {
        self.due_date()
            .or_else(|| self.start_time())
            .unwrap_or(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{Duration, NaiveDate};

    fn noon() -> NaiveDateTime {
        // Wednesday
        NaiveDate::from_ymd_opt(2026, 3, 4)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn task_parts(due: Option<NaiveDateTime>) -> ItemParts {
        ItemParts {
            source_id: "42".to_string(),
            title: "Send rebalancing proposal".to_string(),
            description: None,
            created_at: noon() - Duration::days(3),
            priority: Priority::Low,
            client_id: None,
            client_name: None,
            prospect_id: None,
            prospect_name: None,
            assigned_to: None,
            kind: ItemKind::Task {
                due_date: due,
                completed: false,
            },
            metadata: serde_json::Value::Null,
        }
    }

    #[test]
    fn composite_id_includes_type() {
        let item = UnifiedItem::from_parts(task_parts(None), noon(), &EngineConfig::default());
        assert_eq!(item.id, "task-42");
        assert_eq!(item.item_type(), ItemType::Task);
    }

    #[test]
    fn changing_inputs_recomputes_urgency() {
        let config = EngineConfig::default();
        let clock = FixedClock::new(noon());
        let mut item = UnifiedItem::from_parts(
            task_parts(Some(noon() + Duration::days(30))),
            noon(),
            &config,
        );
        assert_eq!(item.urgency(), UrgencyTier::Scheduled);

        item.set_priority(Priority::Critical, &clock, &config);
        assert_eq!(item.urgency(), UrgencyTier::Now);

        item.set_priority(Priority::Low, &clock, &config);
        let moved = item.set_kind(
            ItemKind::Task {
                due_date: Some(noon()),
                completed: false,
            },
            &clock,
            &config,
        );
        assert!(moved);
        assert_eq!(item.urgency(), UrgencyTier::Now);
    }

    #[test]
    fn set_kind_rejects_type_change() {
        let config = EngineConfig::default();
        let clock = FixedClock::new(noon());
        let mut item = UnifiedItem::from_parts(task_parts(None), noon(), &config);
        let changed = item.set_kind(
            ItemKind::Alert {
                severity: AlertSeverity::Critical,
                read: false,
                action_required: true,
            },
            &clock,
            &config,
        );
        assert!(!changed);
        assert_eq!(item.item_type(), ItemType::Task);
    }

    #[test]
    fn effective_timestamp_prefers_due_date() {
        let config = EngineConfig::default();
        let due = noon() + Duration::days(2);
        let with_due = UnifiedItem::from_parts(task_parts(Some(due)), noon(), &config);
        assert_eq!(with_due.effective_timestamp(), due);

        let without = UnifiedItem::from_parts(task_parts(None), noon(), &config);
        assert_eq!(without.effective_timestamp(), noon() - Duration::days(3));
    }

    #[test]
    fn serializes_flat_with_type_tag() {
        let item = UnifiedItem::from_parts(task_parts(None), noon(), &EngineConfig::default());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "task");
        assert_eq!(json["urgency"], "scheduled");
        assert_eq!(json["completed"], false);
        assert_eq!(json["sourceId"], "42");
    }
}
