//! Urgency classification (now / next / scheduled).
//!
//! Deterministic cascade, first match wins:
//! - now: critical priority, due today or overdue, action-required critical
//!   alert, or an appointment starting within the imminent window
//! - next: high priority, due before the end of this week, action-required
//!   warning alert, or an appointment before the end of next week
//! - scheduled: everything else
//!
//! "Today" and the week boundary are derived from a single `now` per call.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::types::{AlertSeverity, Priority, UrgencyTier};

/// Classifier inputs. Fields that do not apply to an item type stay unset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UrgencySignals {
    pub priority: Priority,
    pub due_date: Option<NaiveDateTime>,
    pub start_time: Option<NaiveDateTime>,
    pub severity: Option<AlertSeverity>,
    pub action_required: bool,
    /// Carried for completeness; completion is a filter concern and does
    /// not change the tier.
    pub completed: bool,
}

impl UrgencySignals {
    pub fn new(priority: Priority) -> Self {
        Self {
            priority,
            due_date: None,
            start_time: None,
            severity: None,
            action_required: false,
            completed: false,
        }
    }
}

/// Time anchors computed once per classification.
#[derive(Debug, Clone, Copy)]
struct Window {
    now: NaiveDateTime,
    start_of_today: NaiveDateTime,
    start_of_tomorrow: NaiveDateTime,
    end_of_week: NaiveDateTime,
    end_of_next_week: NaiveDateTime,
}

impl Window {
    fn at(now: NaiveDateTime, week_starts_on: Weekday) -> Self {
        let today = now.date();
        let start_of_today = today.and_time(NaiveTime::MIN);
        let end_of_week = start_of_next_week(today, week_starts_on).and_time(NaiveTime::MIN);
        Self {
            now,
            start_of_today,
            start_of_tomorrow: start_of_today + Duration::days(1),
            end_of_week,
            end_of_next_week: end_of_week + Duration::days(7),
        }
    }
}

/// First day of the following calendar week.
fn start_of_next_week(today: NaiveDate, week_starts_on: Weekday) -> NaiveDate {
    let into_week = (7 + today.weekday().num_days_from_monday()
        - week_starts_on.num_days_from_monday())
        % 7;
    today + Duration::days(i64::from(7 - into_week))
}

/// Classify against the clock.
pub fn classify_now(
    signals: &UrgencySignals,
    clock: &dyn Clock,
    config: &EngineConfig,
) -> UrgencyTier {
    classify(signals, clock.now(), config)
}

/// Classify at a given instant.
pub fn classify(signals: &UrgencySignals, now: NaiveDateTime, config: &EngineConfig) -> UrgencyTier {
    let window = Window::at(now, config.week_starts_on);
    let imminent = Duration::hours(config.urgency.imminent_start_hours);

    if is_now(signals, &window, imminent) {
        return UrgencyTier::Now;
    }
    if is_next(signals, &window) {
        return UrgencyTier::Next;
    }
    UrgencyTier::Scheduled
}

fn is_now(signals: &UrgencySignals, window: &Window, imminent: Duration) -> bool {
    if signals.priority == Priority::Critical {
        return true;
    }
    // Overdue or due at any time today.
    if signals
        .due_date
        .is_some_and(|due| due < window.start_of_tomorrow)
    {
        return true;
    }
    if signals.severity == Some(AlertSeverity::Critical) && signals.action_required {
        return true;
    }
    // Includes appointments already under way.
    signals
        .start_time
        .is_some_and(|start| start - window.now < imminent)
}

fn is_next(signals: &UrgencySignals, window: &Window) -> bool {
    if signals.priority == Priority::High {
        return true;
    }
    if signals
        .due_date
        .is_some_and(|due| due >= window.start_of_today && due < window.end_of_week)
    {
        return true;
    }
    if signals.severity == Some(AlertSeverity::Warning) && signals.action_required {
        return true;
    }
    signals
        .start_time
        .is_some_and(|start| start >= window.start_of_today && start < window.end_of_next_week)
}
