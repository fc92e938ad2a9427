//! Appointment intelligence: open-slot search, appointment type
//! recommendation and no-show risk.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::{AppointmentType, Priority};

pub mod recommend;
pub mod risk;
pub mod slots;

pub use recommend::{
    recommend_appointment, recommend_type, AppointmentRecommendation, TypeRecommendation,
    TypeVoteWeights,
};
pub use risk::{assess, assess_at, RiskWeights, ShowUpAssessment};
pub use slots::{find_slot, FallbackPolicy, Slot, SlotOrigin};

/// Minimal appointment shape shared by the scheduling components.
/// Times are local wall time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentLike {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}
