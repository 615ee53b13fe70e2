//! Derived availability types (never stored)

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::blockout::Blockout;
use super::enums::AvailabilityStatus;
use super::schedule::parse_hour;

// ---------------------------------------------------------------------------
// SlotKey
// ---------------------------------------------------------------------------

/// Calendar hour-slot key, the typed form of `"YYYY-MM-DDTHH:00"`.
///
/// Ordering is `(date, hour)`, identical to the lexicographic ordering of the
/// serialized string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    pub date: NaiveDate,
    pub hour: u32,
}

impl SlotKey {
    pub fn new(date: NaiveDate, hour: u32) -> Self {
        Self { date, hour }
    }

    /// Parse `"YYYY-MM-DDTHH:MM"`; only the hour component of the time is kept
    pub fn parse(s: &str) -> Option<Self> {
        let (date_part, time_part) = s.split_once('T')?;
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
        let hour = parse_hour(time_part)?;
        Some(Self { date, hour })
    }

    /// Wall-clock bounds of this slot (the end wraps past midnight for 23:00)
    pub fn times(&self) -> (NaiveTime, NaiveTime) {
        let start = NaiveTime::from_hms_opt(self.hour, 0, 0).unwrap_or(NaiveTime::MIN);
        let end = NaiveTime::from_hms_opt((self.hour + 1) % 24, 0, 0).unwrap_or(NaiveTime::MIN);
        (start, end)
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}T{:02}:00", self.date.format("%Y-%m-%d"), self.hour)
    }
}

impl Serialize for SlotKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        SlotKey::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hour slot: {}", s)))
    }
}

// ---------------------------------------------------------------------------
// AvailabilityDay / HourSlot
// ---------------------------------------------------------------------------

/// Availability of one calendar date, recomputed on every load
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityDay {
    pub date: NaiveDate,
    pub status: AvailabilityStatus,
    pub slots_available: u32,
    pub total_slots: u32,
    /// Blockout records covering this date
    pub blockouts: Vec<Blockout>,
    /// Confirmed bookings on this date; informational only, never feeds status
    pub bookings_count: u32,
}

/// One expanded hour slot of a date
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HourSlot {
    #[schema(value_type = String, example = "2025-01-10T14:00")]
    pub slot: SlotKey,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_blocked: bool,
    /// True when the block comes from a full-day record rather than this hour
    pub full_day_blocked: bool,
}

// ---------------------------------------------------------------------------
// BulkOutcome
// ---------------------------------------------------------------------------

/// Severity of a bulk-operation outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeSeverity {
    Success,
    Info,
}

/// Outcome of one bulk operation, reported exactly once per confirmed action
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkOutcome {
    pub requested: u32,
    pub applied: u32,
    pub skipped: u32,
    pub severity: OutcomeSeverity,
    pub message: String,
}

impl BulkOutcome {
    /// Build an outcome; zero applied changes downgrade to informational
    pub fn new(requested: usize, applied: usize, skipped: usize, message: impl Into<String>) -> Self {
        Self {
            requested: requested as u32,
            applied: applied as u32,
            skipped: skipped as u32,
            severity: if applied == 0 {
                OutcomeSeverity::Info
            } else {
                OutcomeSeverity::Success
            },
            message: message.into(),
        }
    }
}

/// Query parameters for the availability grid
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AvailabilityQuery {
    /// Window start (YYYY-MM-DD), defaults to today
    pub start_date: Option<String>,
    /// Window end (YYYY-MM-DD), defaults to start plus the configured window
    pub end_date: Option<String>,
}
