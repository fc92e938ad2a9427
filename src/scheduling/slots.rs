//! Next open appointment slot within business hours.
//!
//! Scans day by day from the preferred date for a quarter-hour aligned
//! interval of `slot_duration_minutes` that clears every appointment on that
//! day by the configured buffer. What happens when the lookahead runs out is
//! decided by `FallbackPolicy`.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::util::{at_hour, ceil_to_quarter_hour};

use super::AppointmentLike;

/// Behavior once the lookahead is exhausted without an open slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FallbackPolicy {
    /// Opening of the day after the preferred date, conflicts ignored.
    /// Callers that need a guaranteed-free slot must re-check it.
    #[default]
    NextDayOpening,
    /// Report that nothing was found.
    NoSlot,
    /// Keep scanning up to `max_days` days in total, then report nothing.
    KeepScanning { max_days: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotOrigin {
    /// Found by the scan; clear of every appointment touching that day's
    /// business hours.
    Open,
    /// Produced by `FallbackPolicy::NextDayOpening`; may conflict.
    Fallback,
}

/// A proposed appointment interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub origin: SlotOrigin,
}

impl Slot {
    fn new(start: NaiveDateTime, duration: Duration, origin: SlotOrigin) -> Self {
        Self {
            start,
            end: start + duration,
            origin,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == SlotOrigin::Fallback
    }

    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && start < self.end
    }
}

/// Find the next open slot at or after `preferred` (default: now).
pub fn find_slot(
    appointments: &[AppointmentLike],
    preferred: Option<NaiveDateTime>,
    clock: &dyn Clock,
    config: &EngineConfig,
) -> Option<Slot> {
    let now = clock.now();
    let anchor = preferred.unwrap_or(now).date();
    let duration = Duration::minutes(config.slot_duration_minutes);

    let mut sorted: Vec<&AppointmentLike> = appointments.iter().collect();
    sorted.sort_by_key(|a| a.start_time);

    let scan_days = match config.fallback {
        FallbackPolicy::KeepScanning { max_days } => max_days.max(config.lookahead_days),
        _ => config.lookahead_days,
    };

    for offset in 0..scan_days {
        if offset == config.lookahead_days {
            log::warn!(
                "No open slot within {} days of {}; scanning further",
                config.lookahead_days,
                anchor
            );
        }
        let day = anchor + Duration::days(i64::from(offset));
        if let Some(start) = scan_day(day, &sorted, now, config) {
            log::debug!("Open slot on {} at {}", day, start.time());
            return Some(Slot::new(start, duration, SlotOrigin::Open));
        }
    }

    match config.fallback {
        FallbackPolicy::NextDayOpening => {
            let start = at_hour(
                anchor + Duration::days(1),
                config.business_hours.start_hour,
            );
            log::warn!(
                "No open slot within {} days of {}; falling back to {} without a conflict check",
                scan_days,
                anchor,
                start
            );
            Some(Slot::new(start, duration, SlotOrigin::Fallback))
        }
        FallbackPolicy::NoSlot | FallbackPolicy::KeepScanning { .. } => {
            log::warn!("No open slot within {} days of {}", scan_days, anchor);
            None
        }
    }
}

/// Earliest fitting start on `day`, or `None` if the day is abandoned.
/// `sorted` must be ordered by start time.
fn scan_day(
    day: NaiveDate,
    sorted: &[&AppointmentLike],
    now: NaiveDateTime,
    config: &EngineConfig,
) -> Option<NaiveDateTime> {
    let work_start = at_hour(day, config.business_hours.start_hour);
    let work_end = at_hour(day, config.business_hours.end_hour);
    let duration = Duration::minutes(config.slot_duration_minutes);
    let buffer = Duration::minutes(config.buffer_minutes);

    let mut candidate = if day == now.date() && now > work_start {
        ceil_to_quarter_hour(now + Duration::minutes(config.lead_time_minutes))
    } else {
        work_start
    };

    // Anything intersecting business hours counts, including appointments
    // carried over from the previous evening.
    let touching = sorted
        .iter()
        .filter(|a| a.start_time < work_end && a.end_time > work_start);
    for apt in touching {
        // Sorted ascending: nothing from here on can reach the candidate.
        if apt.start_time - candidate >= duration {
            break;
        }
        if candidate < apt.end_time {
            candidate = ceil_to_quarter_hour(apt.end_time + buffer);
            log::debug!(
                "Slot candidate on {} pushed past '{}' to {}",
                day,
                apt.title,
                candidate.time()
            );
            if candidate >= work_end {
                return None;
            }
        }
    }

    if candidate + duration > work_end {
        log::debug!("No room for a {}m slot on {}", duration.num_minutes(), day);
        return None;
    }
    Some(candidate)
}
