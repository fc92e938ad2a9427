//! View composition over one provider snapshot.
//!
//! Normalizes, filters and groups the activity stream, and exposes the
//! snapshot's appointments to the scheduling components. Records that fail
//! to parse are reported in the feed rather than failing the whole render.

use chrono_tz::Tz;
use serde::Serialize;

use crate::activity::{
    filter_items, group_items, normalize_batch, Filters, GroupedItems, RejectedRecord, TierCounts,
};
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::records::SourceSnapshot;
use crate::scheduling::{assess_at, AppointmentLike, ShowUpAssessment};

/// Everything the activity view renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFeed {
    pub groups: GroupedItems,
    pub counts: TierCounts,
    pub rejected: Vec<RejectedRecord>,
}

/// Normalize, filter, then group a snapshot.
pub fn build_feed(
    snapshot: &SourceSnapshot,
    filters: &Filters,
    clock: &dyn Clock,
    config: &EngineConfig,
) -> Result<ActivityFeed, EngineError> {
    let batch = normalize_batch(
        &snapshot.records(),
        &snapshot.display_names,
        clock,
        config,
    )?;
    let visible = filter_items(&batch.items, filters);
    let groups = group_items(&visible);

    log::debug!(
        "Built feed: {} of {} items visible, {} rejected",
        visible.len(),
        batch.items.len(),
        batch.rejected.len()
    );

    Ok(ActivityFeed {
        counts: groups.counts(),
        groups,
        rejected: batch.rejected,
    })
}

/// Parsed appointments from a snapshot. Unparsable rows are skipped; the
/// feed already reports them.
pub fn appointments_from_snapshot(
    snapshot: &SourceSnapshot,
    tz: Option<Tz>,
) -> Vec<AppointmentLike> {
    snapshot
        .appointments
        .iter()
        .filter_map(|record| match record.to_appointment_like(tz) {
            Ok(apt) => Some(apt),
            Err(e) => {
                log::debug!("Appointment {} left out of scheduling: {}", record.id, e);
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingRisk {
    pub title: String,
    pub start_time: chrono::NaiveDateTime,
    #[serde(flatten)]
    pub assessment: ShowUpAssessment,
}

/// Risk for every appointment that has not started yet, soonest first.
pub fn assess_upcoming(
    appointments: &[AppointmentLike],
    clock: &dyn Clock,
    config: &EngineConfig,
) -> Vec<UpcomingRisk> {
    let now = clock.now();
    let mut upcoming: Vec<&AppointmentLike> = appointments
        .iter()
        .filter(|apt| apt.start_time > now)
        .collect();
    upcoming.sort_by_key(|apt| apt.start_time);

    upcoming
        .into_iter()
        .map(|apt| UpcomingRisk {
            title: apt.title.clone(),
            start_time: apt.start_time,
            assessment: assess_at(apt, now, &config.risk),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::types::{ItemType, RiskLevel, UrgencyTier};
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::json;

    fn now() -> NaiveDateTime {
        // Wednesday
        NaiveDate::from_ymd_opt(2026, 3, 4)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn snapshot() -> SourceSnapshot {
        serde_json::from_value(json!({
            "tasks": [
                {"id": "t1", "title": "Send KYC pack", "dueDate": "2026-03-03",
                 "priority": "medium", "createdAt": "2026-02-20T09:00:00", "clientId": "c1"},
                {"id": "t2", "title": "Draft proposal", "dueDate": "2026-03-06",
                 "priority": "low", "createdAt": "2026-02-21T09:00:00", "prospectId": "p1"}
            ],
            "followUps": [
                {"id": "f1", "title": "Call back re: rollover", "priority": "high",
                 "createdAt": "2026-03-01T09:00:00", "clientId": "c1"}
            ],
            "alerts": [
                {"id": "a1", "title": "Drift over threshold", "severity": "warning",
                 "actionRequired": true, "createdAt": "2026-03-03T08:00:00"},
                {"id": "a2", "title": "Dividend posted", "severity": "info",
                 "createdAt": "2026-03-02T08:00:00"}
            ],
            "appointments": [
                {"id": "m1", "title": "Annual review", "startTime": "2026-03-04T11:00:00",
                 "endTime": "2026-03-04T12:00:00", "type": "meeting", "priority": "high",
                 "clientId": "c1", "clientName": "Ada Lovelace"},
                {"id": "m2", "title": "Broken", "startTime": "soon",
                 "endTime": "2026-03-04T12:00:00"},
                {"id": "m3", "title": "Intro call", "startTime": "2026-03-20T15:00:00",
                 "endTime": "2026-03-20T15:30:00", "type": "video_call", "priority": "low"}
            ],
            "displayNames": {
                "clients": {"c1": "Ada Lovelace"},
                "prospects": {"p1": "Charles Babbage"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn feed_groups_and_counts() {
        let clock = FixedClock::new(now());
        let feed =
            build_feed(&snapshot(), &Filters::default(), &clock, &EngineConfig::default()).unwrap();

        let ids = |tier: UrgencyTier| -> Vec<String> {
            feed.groups.tier(tier).iter().map(|i| i.id.clone()).collect()
        };
        assert_eq!(ids(UrgencyTier::Now), vec!["appointment-m1", "task-t1"]);
        assert_eq!(
            ids(UrgencyTier::Next),
            vec!["follow-up-f1", "alert-a1", "task-t2"]
        );
        assert_eq!(ids(UrgencyTier::Scheduled), vec!["alert-a2", "appointment-m3"]);

        assert_eq!(feed.counts.now, 2);
        assert_eq!(feed.counts.next, 3);
        assert_eq!(feed.counts.scheduled, 2);

        assert_eq!(feed.rejected.len(), 1);
        assert_eq!(feed.rejected[0].source_id, "m2");
        assert_eq!(feed.rejected[0].item_type, ItemType::Appointment);
    }

    #[test]
    fn feed_applies_filters_before_grouping() {
        let clock = FixedClock::new(now());
        let filters = Filters {
            types: Some(vec![ItemType::Task, ItemType::FollowUp]),
            query: Some("ROLLOVER".to_string()),
            ..Filters::default()
        };
        let feed = build_feed(&snapshot(), &filters, &clock, &EngineConfig::default()).unwrap();
        assert_eq!(feed.groups.len(), 1);
        assert_eq!(feed.groups.next[0].id, "follow-up-f1");
        assert_eq!(feed.counts.now, 0);
    }

    #[test]
    fn display_names_attach_to_items() {
        let clock = FixedClock::new(now());
        let feed =
            build_feed(&snapshot(), &Filters::default(), &clock, &EngineConfig::default()).unwrap();
        let draft = feed
            .groups
            .next
            .iter()
            .find(|i| i.id == "task-t2")
            .unwrap();
        assert_eq!(draft.prospect_name.as_deref(), Some("Charles Babbage"));
    }

    #[test]
    fn bad_timezone_fails_the_feed() {
        let clock = FixedClock::new(now());
        let config = EngineConfig {
            timezone: Some("Nowhere/Special".to_string()),
            ..EngineConfig::default()
        };
        assert!(build_feed(&snapshot(), &Filters::default(), &clock, &config).is_err());
    }

    #[test]
    fn scheduling_sees_only_parsable_appointments() {
        let appointments = appointments_from_snapshot(&snapshot(), None);
        let titles: Vec<&str> = appointments.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Annual review", "Intro call"]);
    }

    #[test]
    fn upcoming_risks_skip_started_appointments() {
        let clock = FixedClock::new(now());
        let mut appointments = appointments_from_snapshot(&snapshot(), None);
        let mut past = appointments[0].clone();
        past.title = "Yesterday".to_string();
        past.start_time = now() - chrono::Duration::days(1);
        past.end_time = past.start_time + chrono::Duration::hours(1);
        appointments.insert(0, past);

        let risks = assess_upcoming(&appointments, &clock, &EngineConfig::default());
        let titles: Vec<&str> = risks.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Annual review", "Intro call"]);

        assert_eq!(risks[0].assessment.risk_level, RiskLevel::Low);
        // 0.78 - 0.10 - 0.06 - 0.04 - 0.05
        assert_eq!(risks[1].assessment.risk_level, RiskLevel::High);
    }
}
