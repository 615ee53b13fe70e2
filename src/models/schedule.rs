//! Weekly schedule model (per-weekday operating hours)

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Wall-clock times as stored in the schedule, "H:MM" or "HH:MM"
static TIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([01]?\d|2[0-3]):[0-5]\d$").unwrap());

// ---------------------------------------------------------------------------
// Weekday
// ---------------------------------------------------------------------------

/// Day of the week, keyed `monday`..`sunday` in the stored schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Weekday of a calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    /// Parse a weekday name (case-insensitive), `None` for anything else
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "monday" => Some(Weekday::Monday),
            "tuesday" => Some(Weekday::Tuesday),
            "wednesday" => Some(Weekday::Wednesday),
            "thursday" => Some(Weekday::Thursday),
            "friday" => Some(Weekday::Friday),
            "saturday" => Some(Weekday::Saturday),
            "sunday" => Some(Weekday::Sunday),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(w: chrono::Weekday) -> Self {
        match w {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------------------------------------------------------
// DayHours
// ---------------------------------------------------------------------------

/// Operating hours for one weekday
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DayHours {
    /// Whether the venue opens that day
    pub available: bool,
    /// Opening time (HH:MM)
    #[serde(default)]
    pub start: Option<String>,
    /// Closing time (HH:MM)
    #[serde(default)]
    pub end: Option<String>,
}

impl DayHours {
    /// An open day with the given hours
    pub fn open(start: &str, end: &str) -> Self {
        Self {
            available: true,
            start: Some(start.to_string()),
            end: Some(end.to_string()),
        }
    }

    /// A day the venue does not open
    pub fn closed() -> Self {
        Self {
            available: false,
            start: None,
            end: None,
        }
    }

    /// Integer-hour bounds `(start_hour, end_hour)` when this day is usable.
    ///
    /// Minutes are accepted in the stored times but only the hour component
    /// defines slot boundaries. Unavailable days, missing times, malformed
    /// times and inverted ranges all yield `None` (the date is treated as
    /// closed, never an error).
    pub fn hour_bounds(&self) -> Option<(u32, u32)> {
        if !self.available {
            return None;
        }
        let start = parse_hour(self.start.as_deref()?)?;
        let end = parse_hour(self.end.as_deref()?)?;
        if start < end {
            Some((start, end))
        } else {
            None
        }
    }
}

/// Integer hour component of an "HH:MM" time string
pub fn parse_hour(time: &str) -> Option<u32> {
    if !TIME_RE.is_match(time) {
        return None;
    }
    time.split(':').next()?.parse().ok()
}

// ---------------------------------------------------------------------------
// WeeklySchedule
// ---------------------------------------------------------------------------

/// Recurring weekly schedule, weekday -> operating hours.
///
/// Parsed from the venue row's JSONB column. Days absent from the map are
/// closed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklySchedule {
    pub days: IndexMap<Weekday, DayHours>,
}

impl WeeklySchedule {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn day(&self, weekday: Weekday) -> Option<&DayHours> {
        self.days.get(&weekday)
    }

    /// Integer-hour bounds for a weekday, `None` when closed
    pub fn hour_bounds(&self, weekday: Weekday) -> Option<(u32, u32)> {
        self.day(weekday).and_then(DayHours::hour_bounds)
    }

    /// Tolerant parse of the stored JSONB schedule.
    ///
    /// Entries with an unknown key or a malformed value are skipped rather
    /// than failing the whole schedule; a non-object value yields an empty
    /// schedule (every day closed).
    pub fn from_value(value: &serde_json::Value) -> Self {
        let mut days = IndexMap::new();
        if let Some(map) = value.as_object() {
            for (key, entry) in map {
                let weekday = match Weekday::from_name(key) {
                    Some(w) => w,
                    None => continue,
                };
                match serde_json::from_value::<DayHours>(entry.clone()) {
                    Ok(hours) => {
                        days.insert(weekday, hours);
                    }
                    Err(_) => continue,
                }
            }
        }
        WeeklySchedule { days }
    }

    /// Build a schedule from the legacy weekday-name list format.
    ///
    /// Listed days become open with the given default hours; names that are
    /// not weekdays are ignored.
    pub fn from_legacy_days(names: &[String], start: &str, end: &str) -> Self {
        let mut days = IndexMap::new();
        for name in names {
            if let Some(weekday) = Weekday::from_name(name) {
                days.insert(weekday, DayHours::open(start, end));
            }
        }
        WeeklySchedule { days }
    }
}
