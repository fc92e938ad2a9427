//! Snapshot report: feed, next appointment proposal and no-show risks for one
//! provider snapshot.
//!
//! Usage: `agenda <snapshot.json> [config.json]`
//! Logging follows `RUST_LOG` (default `info`), on stderr.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::{Deserialize, Serialize};

use agenda_lib::activity::Filters;
use agenda_lib::clock::{Clock, SystemClock};
use agenda_lib::config::load_config;
use agenda_lib::error::{EngineError, ErrorPayload};
use agenda_lib::feed::{
    appointments_from_snapshot, assess_upcoming, build_feed, ActivityFeed, UpcomingRisk,
};
use agenda_lib::records::SourceSnapshot;
use agenda_lib::scheduling::{recommend_appointment, AppointmentRecommendation};
use agenda_lib::util::parse_preferred_date;

const DEFAULT_CONFIG_FILE: &str = "agenda.json";

/// Snapshot file contents: the provider snapshot plus view state.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportRequest {
    #[serde(flatten)]
    snapshot: SourceSnapshot,
    #[serde(default)]
    filters: Option<Filters>,
    #[serde(default)]
    preferred_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    feed: ActivityFeed,
    recommendation: Option<AppointmentRecommendation>,
    risks: Vec<UpcomingRisk>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(snapshot_path) = args.first().map(PathBuf::from) else {
        eprintln!("usage: agenda <snapshot.json> [config.json]");
        return ExitCode::FAILURE;
    };
    let config_path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    match run(&snapshot_path, &config_path) {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => fail(&EngineError::Parse(format!("Failed to serialize report: {}", e))),
        },
        Err(e) => fail(&e),
    }
}

fn run(snapshot_path: &Path, config_path: &Path) -> Result<Report, EngineError> {
    let config = load_config(config_path)?;
    let request = read_request(snapshot_path)?;
    let tz = config.tz()?;
    let clock = SystemClock::new(tz);

    let filters = request.filters.unwrap_or_default();
    let feed = build_feed(&request.snapshot, &filters, &clock, &config)?;

    let appointments = appointments_from_snapshot(&request.snapshot, tz);
    let preferred = request
        .preferred_date
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_preferred_date(raw, tz))
        .transpose()?;
    let recommendation = recommend_appointment(&appointments, preferred, &clock, &config);
    if recommendation.is_none() {
        log::info!("No open slot under the configured fallback policy");
    }
    let risks = assess_upcoming(&appointments, &clock, &config);

    log::info!(
        "Report at {}: {} items, {} rejected, {} upcoming appointments",
        clock.now().format("%Y-%m-%d %H:%M"),
        feed.groups.len(),
        feed.rejected.len(),
        risks.len()
    );

    Ok(Report {
        feed,
        recommendation,
        risks,
    })
}

fn read_request(path: &Path) -> Result<ReportRequest, EngineError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| EngineError::Parse(e.to_string()))
}

fn fail(err: &EngineError) -> ExitCode {
    log::error!("{}", err);
    let payload = ErrorPayload::from(err);
    match serde_json::to_string_pretty(&payload) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", err),
    }
    ExitCode::FAILURE
}

