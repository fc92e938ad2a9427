//! No-show risk heuristic.
//!
//! Additive adjustments on a base show-up likelihood, clamped, then bucketed
//! into a risk tier. Every adjustment that fires appends an explanatory
//! signal, in application order.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::types::{AppointmentType, Priority, RiskLevel};

use super::AppointmentLike;

/// Weight table for the show-up likelihood.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskWeights {
    pub base_likelihood: f64,
    pub high_priority: f64,
    pub low_priority: f64,
    pub video_call: f64,
    pub in_person_meeting: f64,
    /// Applied when the start is within `imminent_hours`.
    pub imminent: f64,
    pub imminent_hours: f64,
    /// Applied when the start is more than `far_advance_hours` away.
    pub far_advance: f64,
    pub far_advance_hours: f64,
    pub missing_contact: f64,
    pub min_likelihood: f64,
    pub max_likelihood: f64,
    /// Below this the risk is high.
    pub high_risk_below: f64,
    /// Below this (and not high) the risk is medium.
    pub medium_risk_below: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            base_likelihood: 0.78,
            high_priority: 0.12,
            low_priority: -0.10,
            video_call: -0.06,
            in_person_meeting: 0.05,
            imminent: 0.05,
            imminent_hours: 24.0,
            far_advance: -0.04,
            far_advance_hours: 72.0,
            missing_contact: -0.05,
            min_likelihood: 0.20,
            max_likelihood: 0.98,
            high_risk_below: 0.55,
            medium_risk_below: 0.70,
        }
    }
}

impl RiskWeights {
    pub fn risk_level(&self, likelihood: f64) -> RiskLevel {
        if likelihood < self.high_risk_below {
            RiskLevel::High
        } else if likelihood < self.medium_risk_below {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowUpAssessment {
    pub likelihood: f64,
    pub risk_level: RiskLevel,
    pub signals: Vec<String>,
}

/// Assess against the clock.
pub fn assess(
    appointment: &AppointmentLike,
    clock: &dyn Clock,
    weights: &RiskWeights,
) -> ShowUpAssessment {
    assess_at(appointment, clock.now(), weights)
}

/// Assess at a given instant.
pub fn assess_at(
    appointment: &AppointmentLike,
    now: NaiveDateTime,
    weights: &RiskWeights,
) -> ShowUpAssessment {
    let mut likelihood = weights.base_likelihood;
    let mut signals = Vec::new();

    match appointment.priority {
        // Critical cannot come from the appointment form; score it as high.
        Priority::High | Priority::Critical => {
            likelihood += weights.high_priority;
            signals.push("High priority engagement".to_string());
        }
        Priority::Low => {
            likelihood += weights.low_priority;
            signals.push("Low priority meeting".to_string());
        }
        Priority::Medium => {}
    }

    match appointment.appointment_type {
        AppointmentType::VideoCall => {
            likelihood += weights.video_call;
            signals.push("Virtual meeting".to_string());
        }
        AppointmentType::Meeting => likelihood += weights.in_person_meeting,
        AppointmentType::Call => {}
    }

    let hours_until = (appointment.start_time - now).num_seconds() as f64 / 3600.0;
    if hours_until < 0.0 {
        signals.push("Appointment already completed".to_string());
    } else if hours_until <= weights.imminent_hours {
        likelihood += weights.imminent;
        signals.push(format!("Confirmed within {} hours", weights.imminent_hours));
    } else if hours_until > weights.far_advance_hours {
        likelihood += weights.far_advance;
        signals.push("Scheduled far in advance".to_string());
    }

    if appointment.client_name.is_none() {
        likelihood += weights.missing_contact;
        signals.push("Prospect without confirmed contact".to_string());
    }

    let likelihood = likelihood.clamp(weights.min_likelihood, weights.max_likelihood);
    ShowUpAssessment {
        likelihood,
        risk_level: weights.risk_level(likelihood),
        signals,
    }
}
