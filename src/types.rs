use serde::{Deserialize, Serialize};

// =============================================================================
// Priority / Urgency
// =============================================================================

/// Source-supplied or defaulted importance of a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Sort rank: critical first, low last.
    pub fn rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// Parse a raw priority string. Missing or unknown values become `Medium`.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("low") => Self::Low,
            Some("high") => Self::High,
            Some("critical") => Self::Critical,
            _ => Self::Medium,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

/// Derived freshness classification of a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyTier {
    Now,
    Next,
    Scheduled,
}

impl UrgencyTier {
    pub fn rank(self) -> u8 {
        match self {
            Self::Now => 0,
            Self::Next => 1,
            Self::Scheduled => 2,
        }
    }
}

// =============================================================================
// Item / Source Types
// =============================================================================

/// Which source produced a unified item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemType {
    Task,
    Alert,
    Appointment,
    FollowUp,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Alert => "alert",
            Self::Appointment => "appointment",
            Self::FollowUp => "follow-up",
        }
    }
}

/// Alert severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    Warning,
    Info,
}

impl AlertSeverity {
    /// Priority an alert carries into the unified stream.
    ///
    /// Critical alerts map to `High`, not `Critical`: only an action-required
    /// critical alert should land in the `now` tier.
    pub fn mapped_priority(self) -> Priority {
        match self {
            Self::Critical => Priority::High,
            Self::Warning => Priority::Medium,
            Self::Info => Priority::Low,
        }
    }
}

/// Kind of client appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    Meeting,
    Call,
    VideoCall,
}

impl AppointmentType {
    /// Declared order. Type-vote ties resolve to the earliest entry.
    pub const ALL: [AppointmentType; 3] = [Self::Meeting, Self::Call, Self::VideoCall];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meeting => "meeting",
            Self::Call => "call",
            Self::VideoCall => "video_call",
        }
    }

    /// Human label used in rationale text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Meeting => "in-person meeting",
            Self::Call => "phone call",
            Self::VideoCall => "video call",
        }
    }
}

impl Default for AppointmentType {
    fn default() -> Self {
        Self::Meeting
    }
}

/// No-show risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}
