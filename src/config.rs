//! Engine configuration.
//!
//! Every tunable (business hours, slot geometry, fallback policy and both
//! heuristic weight tables) lives here so calibration never touches the
//! algorithms. Defaults reproduce the stock behavior exactly.

use std::fs;
use std::path::Path;

use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::scheduling::recommend::TypeVoteWeights;
use crate::scheduling::risk::RiskWeights;
use crate::scheduling::slots::FallbackPolicy;

/// Upper bound for buffer and lead time: one day.
const MAX_OFFSET_MINUTES: i64 = 24 * 60;

/// Upper bound for the imminent window: one week.
const MAX_IMMINENT_HOURS: i64 = 7 * 24;

/// Upper bound for any slot scan.
const MAX_SCAN_DAYS: u32 = 366;

/// Configuration, typically stored as `agenda.json` next to the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default)]
    pub business_hours: BusinessHours,
    #[serde(default = "default_slot_duration")]
    pub slot_duration_minutes: i64,
    /// Gap kept after an existing appointment before the next slot.
    #[serde(default = "default_buffer")]
    pub buffer_minutes: i64,
    /// Minimum notice for a slot proposed later today.
    #[serde(default = "default_lead_time")]
    pub lead_time_minutes: i64,
    /// Days scanned before the fallback policy applies.
    #[serde(default = "default_lookahead")]
    pub lookahead_days: u32,
    #[serde(default)]
    pub fallback: FallbackPolicy,
    #[serde(default = "default_week_start")]
    pub week_starts_on: Weekday,
    #[serde(default)]
    pub urgency: UrgencyConfig,
    #[serde(default)]
    pub type_vote: TypeVoteWeights,
    #[serde(default)]
    pub risk: RiskWeights,
    /// IANA zone name (e.g. "America/New_York"). Host local time when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            business_hours: BusinessHours::default(),
            slot_duration_minutes: default_slot_duration(),
            buffer_minutes: default_buffer(),
            lead_time_minutes: default_lead_time(),
            lookahead_days: default_lookahead(),
            fallback: FallbackPolicy::default(),
            week_starts_on: default_week_start(),
            urgency: UrgencyConfig::default(),
            type_vote: TypeVoteWeights::default(),
            risk: RiskWeights::default(),
            timezone: None,
        }
    }
}

fn default_slot_duration() -> i64 {
    60
}

fn default_buffer() -> i64 {
    15
}

fn default_lead_time() -> i64 {
    30
}

fn default_lookahead() -> u32 {
    5
}

fn default_week_start() -> Weekday {
    Weekday::Sun
}

/// Daily working window in local hours (24h).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessHours {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 17,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgencyConfig {
    /// Appointments starting sooner than this are `now`.
    #[serde(default = "default_imminent_hours")]
    pub imminent_start_hours: i64,
}

impl Default for UrgencyConfig {
    fn default() -> Self {
        Self {
            imminent_start_hours: default_imminent_hours(),
        }
    }
}

fn default_imminent_hours() -> i64 {
    2
}

impl EngineConfig {
    /// Resolve the configured timezone, if any.
    pub fn tz(&self) -> Result<Option<Tz>, EngineError> {
        match self.timezone.as_deref() {
            None => Ok(None),
            Some(name) => name
                .parse::<Tz>()
                .map(Some)
                .map_err(|_| EngineError::Config(format!("Unknown timezone: {}", name))),
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let hours = &self.business_hours;
        if hours.end_hour > 24 || hours.start_hour >= hours.end_hour {
            return Err(EngineError::Config(format!(
                "Business hours must satisfy start < end <= 24 (got {}-{})",
                hours.start_hour, hours.end_hour
            )));
        }
        if self.slot_duration_minutes <= 0 {
            return Err(EngineError::Config(
                "slotDurationMinutes must be positive".to_string(),
            ));
        }
        if self.slot_duration_minutes > i64::from(hours.end_hour - hours.start_hour) * 60 {
            return Err(EngineError::Config(
                "slotDurationMinutes does not fit inside business hours".to_string(),
            ));
        }
        for (name, minutes) in [
            ("bufferMinutes", self.buffer_minutes),
            ("leadTimeMinutes", self.lead_time_minutes),
        ] {
            if !(0..=MAX_OFFSET_MINUTES).contains(&minutes) {
                return Err(EngineError::Config(format!(
                    "{} must be between 0 and {} (got {})",
                    name, MAX_OFFSET_MINUTES, minutes
                )));
            }
        }
        if !(0..=MAX_IMMINENT_HOURS).contains(&self.urgency.imminent_start_hours) {
            return Err(EngineError::Config(format!(
                "urgency.imminentStartHours must be between 0 and {} (got {})",
                MAX_IMMINENT_HOURS, self.urgency.imminent_start_hours
            )));
        }
        if self.lookahead_days == 0 || self.lookahead_days > MAX_SCAN_DAYS {
            return Err(EngineError::Config(format!(
                "lookaheadDays must be between 1 and {}",
                MAX_SCAN_DAYS
            )));
        }
        if let FallbackPolicy::KeepScanning { max_days } = self.fallback {
            if max_days > MAX_SCAN_DAYS {
                return Err(EngineError::Config(format!(
                    "fallback.keepScanning.maxDays cannot exceed {}",
                    MAX_SCAN_DAYS
                )));
            }
        }
        if self.type_vote.min_confidence > self.type_vote.max_confidence {
            return Err(EngineError::Config(
                "typeVote confidence bounds are inverted".to_string(),
            ));
        }
        if self.risk.min_likelihood > self.risk.max_likelihood {
            return Err(EngineError::Config(
                "risk likelihood bounds are inverted".to_string(),
            ));
        }
        self.tz()?;
        Ok(())
    }
}

/// Load configuration from a JSON file.
///
/// A missing file is not an error: the stock configuration applies.
pub fn load_config(path: &Path) -> Result<EngineConfig, EngineError> {
    if !path.exists() {
        log::info!(
            "No config at {}; using default engine configuration",
            path.display()
        );
        return Ok(EngineConfig::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| EngineError::Config(format!("Failed to read config: {}", e)))?;

    let config: EngineConfig = serde_json::from_str(&content)
        .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.business_hours.start_hour, 9);
        assert_eq!(config.business_hours.end_hour, 17);
        assert_eq!(config.slot_duration_minutes, 60);
        assert_eq!(config.buffer_minutes, 15);
        assert_eq!(config.lookahead_days, 5);
        assert_eq!(config.week_starts_on, Weekday::Sun);
        assert_eq!(config.fallback, FallbackPolicy::NextDayOpening);
        assert!((config.risk.base_likelihood - 0.78).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn inverted_business_hours_rejected() {
        let mut config = EngineConfig::default();
        config.business_hours = BusinessHours {
            start_hour: 17,
            end_hour: 9,
        };
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));
    }

    #[test]
    fn oversized_offsets_rejected() {
        let too_long = EngineConfig {
            buffer_minutes: 100_000_000_000_000,
            ..EngineConfig::default()
        };
        assert!(matches!(too_long.validate(), Err(EngineError::Config(_))));

        let mut config = EngineConfig::default();
        config.urgency.imminent_start_hours = i64::MAX;
        assert!(config.validate().is_err());

        let config = EngineConfig {
            fallback: FallbackPolicy::KeepScanning { max_days: u32::MAX },
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let at_limit = EngineConfig {
            buffer_minutes: 24 * 60,
            lead_time_minutes: 0,
            lookahead_days: 366,
            ..EngineConfig::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn unknown_timezone_rejected() {
        let config = EngineConfig {
            timezone: Some("Mars/Olympus_Mons".to_string()),
            ..EngineConfig::default()
        };
        assert!(config.tz().is_err());
        assert!(config.validate().is_err());
    }

    #[test]
    fn known_timezone_resolves() {
        let config = EngineConfig {
            timezone: Some("America/New_York".to_string()),
            ..EngineConfig::default()
        };
        assert_eq!(config.tz().unwrap(), Some(chrono_tz::America::New_York));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load_config(Path::new("/nonexistent/agenda.json")).unwrap();
        assert_eq!(config.lookahead_days, 5);
    }
}
