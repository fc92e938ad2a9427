use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use chrono_tz::Tz;

use crate::error::EngineError;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-ish timestamp into local wall time.
///
/// Offset-bearing values (`Z`, `+02:00`) are converted into `tz` when given,
/// otherwise into host local time. Naive values are taken as already local.
/// Date-only values resolve to local midnight.
pub fn parse_local_datetime(value: &str, tz: Option<Tz>) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(match tz {
            Some(tz) => dt.with_timezone(&tz).naive_local(),
            None => dt.with_timezone(&Local).naive_local(),
        });
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Parse a required timestamp field, naming the field on failure.
pub fn parse_timestamp(
    field: &'static str,
    value: &str,
    tz: Option<Tz>,
) -> Result<NaiveDateTime, EngineError> {
    parse_local_datetime(value, tz).ok_or_else(|| EngineError::invalid_timestamp(field, value))
}

/// Parse an optional timestamp field. Missing or blank values are `None`;
/// present but unparsable values are an error.
pub fn parse_optional_timestamp(
    field: &'static str,
    value: Option<&str>,
    tz: Option<Tz>,
) -> Result<Option<NaiveDateTime>, EngineError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_timestamp(field, raw, tz).map(Some),
    }
}

/// Parse the slot finder's preferred date.
pub fn parse_preferred_date(value: &str, tz: Option<Tz>) -> Result<NaiveDateTime, EngineError> {
    parse_timestamp("preferredDate", value, tz)
}

/// Round up to the next quarter-hour boundary. Values already on a boundary
/// (with zero seconds) are returned unchanged.
pub fn ceil_to_quarter_hour(dt: NaiveDateTime) -> NaiveDateTime {
    let past_quarter = i64::from(dt.minute() % 15);
    let floored = dt
        - Duration::minutes(past_quarter)
        - Duration::seconds(i64::from(dt.second()))
        - Duration::nanoseconds(i64::from(dt.nanosecond()));
    if floored == dt {
        dt
    } else {
        floored + Duration::minutes(15)
    }
}

/// Local wall time at `hour:00` on `date`. Hour 24 is the following midnight.
pub fn at_hour(date: NaiveDate, hour: u32) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(hour))
}
