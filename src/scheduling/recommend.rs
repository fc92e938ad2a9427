//! Appointment type recommendation.
//!
//! Recency-weighted vote over the most recent appointments: the newest
//! counts fully and each older rank counts `rank_decay` less, never below
//! `floor_weight`. Confidence is the winner's share of the total weight,
//! clamped to the configured bounds.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::types::AppointmentType;

use super::slots::{find_slot, SlotOrigin};
use super::AppointmentLike;

/// Weight table for the type vote.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeVoteWeights {
    /// How many recent appointments vote.
    pub history_window: usize,
    /// Weight lost per rank (0 = most recent).
    pub rank_decay: f64,
    /// Minimum weight any vote keeps.
    pub floor_weight: f64,
    pub min_confidence: f64,
    pub max_confidence: f64,
    /// Winner when there is no history.
    pub default_type: AppointmentType,
}

impl Default for TypeVoteWeights {
    fn default() -> Self {
        Self {
            history_window: 10,
            rank_decay: 0.08,
            floor_weight: 0.2,
            min_confidence: 0.5,
            max_confidence: 0.95,
            default_type: AppointmentType::Meeting,
        }
    }
}

impl TypeVoteWeights {
    pub fn weight_for_rank(&self, rank: usize) -> f64 {
        (1.0 - rank as f64 * self.rank_decay).max(self.floor_weight)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRecommendation {
    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,
    pub confidence: f64,
    /// Appointments that voted.
    pub sample_size: usize,
    /// Votes cast for the winner.
    pub winning_votes: usize,
}

/// Recommend a type from appointment history.
pub fn recommend_type(
    appointments: &[AppointmentLike],
    weights: &TypeVoteWeights,
) -> TypeRecommendation {
    let mut recent: Vec<&AppointmentLike> = appointments.iter().collect();
    recent.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    recent.truncate(weights.history_window);

    let mut tally = [0.0_f64; AppointmentType::ALL.len()];
    let mut votes = [0_usize; AppointmentType::ALL.len()];
    for (rank, apt) in recent.iter().enumerate() {
        let slot = type_index(apt.appointment_type);
        tally[slot] += weights.weight_for_rank(rank);
        votes[slot] += 1;
    }
    let total: f64 = tally.iter().sum();

    // Strictly greater: ties go to the earliest declared type.
    let mut winner = weights.default_type;
    let mut best = 0.0_f64;
    for (idx, kind) in AppointmentType::ALL.iter().enumerate() {
        if tally[idx] > best {
            best = tally[idx];
            winner = *kind;
        }
    }

    let share = if total > 0.0 { best / total } else { 0.0 };
    TypeRecommendation {
        appointment_type: winner,
        confidence: share.clamp(weights.min_confidence, weights.max_confidence),
        sample_size: recent.len(),
        winning_votes: votes[type_index(winner)],
    }
}

fn type_index(kind: AppointmentType) -> usize {
    AppointmentType::ALL
        .iter()
        .position(|t| *t == kind)
        .unwrap_or(0)
}

/// A concrete proposal: when, what type, and why.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRecommendation {
    pub date: NaiveDate,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,
    pub confidence: f64,
    pub rationale: String,
    pub origin: SlotOrigin,
}

/// Combine the slot finder and the type vote over one appointment snapshot.
/// `None` only when a strict fallback policy finds no slot.
pub fn recommend_appointment(
    appointments: &[AppointmentLike],
    preferred: Option<NaiveDateTime>,
    clock: &dyn Clock,
    config: &EngineConfig,
) -> Option<AppointmentRecommendation> {
    let slot = find_slot(appointments, preferred, clock, config)?;
    let vote = recommend_type(appointments, &config.type_vote);

    let mut rationale = format!(
        "{} at {} is the next open {}-minute slot.",
        slot.start.format("%A, %B %-d"),
        slot.start.format("%-I:%M %p"),
        config.slot_duration_minutes
    );
    if slot.origin == SlotOrigin::Fallback {
        rationale = format!(
            "No open slot in the next {} days; {} at {} is proposed as a fallback and may conflict with existing appointments.",
            config.lookahead_days,
            slot.start.format("%A, %B %-d"),
            slot.start.format("%-I:%M %p")
        );
    }
    if vote.sample_size == 0 {
        rationale.push_str(&format!(
            " No appointment history yet, so a {} is suggested.",
            vote.appointment_type.label()
        ));
    } else {
        rationale.push_str(&format!(
            " {} of the last {} appointments were {}s.",
            vote.winning_votes,
            vote.sample_size,
            vote.appointment_type.label()
        ));
    }

    Some(AppointmentRecommendation {
        date: slot.start.date(),
        start_time: slot.start,
        end_time: slot.end,
        appointment_type: vote.appointment_type,
        confidence: vote.confidence,
        rationale,
        origin: slot.origin,
    })
}
