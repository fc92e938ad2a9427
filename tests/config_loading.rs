use std::fs;

use agenda_lib::config::load_config;
use agenda_lib::error::EngineError;
use agenda_lib::scheduling::FallbackPolicy;
use chrono::Weekday;
use tempfile::TempDir;

fn write(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("agenda.json");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn partial_file_keeps_remaining_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        r#"{
            "businessHours": { "startHour": 8, "endHour": 18 },
            "fallback": { "keepScanning": { "maxDays": 10 } },
            "weekStartsOn": "Mon",
            "risk": { "baseLikelihood": 0.7 }
        }"#,
    );

    let config = load_config(&path).unwrap();
    assert_eq!(config.business_hours.start_hour, 8);
    assert_eq!(config.business_hours.end_hour, 18);
    assert_eq!(config.fallback, FallbackPolicy::KeepScanning { max_days: 10 });
    assert_eq!(config.week_starts_on, Weekday::Mon);
    assert!((config.risk.base_likelihood - 0.7).abs() < 1e-9);
    // Untouched tunables keep their stock values.
    assert!((config.risk.max_likelihood - 0.98).abs() < 1e-9);
    assert_eq!(config.slot_duration_minutes, 60);
    assert_eq!(config.type_vote.history_window, 10);
}

#[test]
fn strict_policy_parses_from_plain_string() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, r#"{ "fallback": "noSlot" }"#);
    assert_eq!(load_config(&path).unwrap().fallback, FallbackPolicy::NoSlot);
}

#[test]
fn missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let config = load_config(&dir.path().join("absent.json")).unwrap();
    assert_eq!(config.fallback, FallbackPolicy::NextDayOpening);
    assert_eq!(config.lookahead_days, 5);
}

#[test]
fn malformed_json_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "{ not json");
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));
    assert!(!err.is_caller_error());
}

#[test]
fn invalid_values_fail_validation() {
    let dir = TempDir::new().unwrap();
    for body in [
        r#"{ "slotDurationMinutes": 0 }"#,
        r#"{ "lookaheadDays": 0 }"#,
        r#"{ "lookaheadDays": 100000 }"#,
        r#"{ "bufferMinutes": 100000000000000 }"#,
        r#"{ "leadTimeMinutes": -5 }"#,
        r#"{ "leadTimeMinutes": 1441 }"#,
        r#"{ "urgency": { "imminentStartHours": 9223372036854775807 } }"#,
        r#"{ "urgency": { "imminentStartHours": -1 } }"#,
        r#"{ "fallback": { "keepScanning": { "maxDays": 4000000000 } } }"#,
        r#"{ "businessHours": { "startHour": 12, "endHour": 12 } }"#,
        r#"{ "timezone": "Atlantis/Capital" }"#,
    ] {
        let path = write(&dir, body);
        assert!(
            matches!(load_config(&path), Err(EngineError::Config(_))),
            "accepted {}",
            body
        );
    }
}

#[test]
fn validated_extremes_do_not_break_the_slot_finder() {
    use agenda_lib::clock::FixedClock;
    use agenda_lib::scheduling::{find_slot, AppointmentLike};
    use agenda_lib::types::{AppointmentType, Priority};
    use chrono::NaiveDate;

    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        r#"{ "bufferMinutes": 1440, "leadTimeMinutes": 1440, "lookaheadDays": 366 }"#,
    );
    let config = load_config(&path).unwrap();

    let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let clock = FixedClock::new(day.and_hms_opt(10, 0, 0).unwrap());
    let booked = vec![AppointmentLike {
        title: "Booked".to_string(),
        description: None,
        start_time: day.and_hms_opt(9, 0, 0).unwrap(),
        end_time: day.and_hms_opt(10, 0, 0).unwrap(),
        appointment_type: AppointmentType::Call,
        priority: Priority::Medium,
        client_name: None,
        location: None,
    }];
    let slot = find_slot(&booked, None, &clock, &config).unwrap();
    assert_eq!(slot.start, day.succ_opt().unwrap().and_hms_opt(9, 0, 0).unwrap());
}
