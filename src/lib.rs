//! Unified activity stream and appointment intelligence for an advisor
//! workspace.
//!
//! `activity` merges tasks, follow-ups, alerts and appointments into one
//! prioritized, filterable stream. `scheduling` proposes the next open slot,
//! the appointment type the history favors, and a no-show risk estimate.
//! Both are pure over a snapshot plus an injected clock; `feed` composes them
//! for a single view render.

pub mod activity;
pub mod clock;
pub mod config;
pub mod error;
pub mod feed;
pub mod records;
pub mod scheduling;
pub mod types;
pub mod util;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{load_config, EngineConfig};
pub use error::{EngineError, ErrorPayload};
pub use feed::{build_feed, ActivityFeed};
