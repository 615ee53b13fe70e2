//! Venue model (read-only input to availability computation)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::enums::BookingMode;
use super::schedule::WeeklySchedule;

/// Venue record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Venue {
    pub id: Uuid,
    /// Owning account
    pub owner_id: Uuid,
    pub name: String,
    /// Booking mode (0=daily, 1=hourly, 2=both)
    pub booking_mode: BookingMode,
    /// Structured weekly schedule JSON, weekday -> {available, start, end}
    pub weekly_schedule: Option<serde_json::Value>,
    /// Legacy open-day name list, superseded by weekly_schedule
    pub available_days: Option<Vec<String>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Venue {
    /// Resolve the effective weekly schedule.
    ///
    /// The structured JSONB schedule wins when it has any usable entry;
    /// otherwise the legacy weekday-name list is converted using the given
    /// default hours; otherwise every day is closed.
    pub fn resolve_schedule(&self, default_start: &str, default_end: &str) -> WeeklySchedule {
        if let Some(value) = &self.weekly_schedule {
            let schedule = WeeklySchedule::from_value(value);
            if !schedule.is_empty() {
                return schedule;
            }
        }
        if let Some(names) = &self.available_days {
            if !names.is_empty() {
                return WeeklySchedule::from_legacy_days(names, default_start, default_end);
            }
        }
        WeeklySchedule::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::Weekday;
    use serde_json::json;

    fn venue(schedule: Option<serde_json::Value>, legacy: Option<Vec<String>>) -> Venue {
        Venue {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Court A".to_string(),
            booking_mode: BookingMode::Hourly,
            weekly_schedule: schedule,
            available_days: legacy,
            created_at: None,
        }
    }

    #[test]
    fn test_structured_schedule_wins() {
        let v = venue(
            Some(json!({"monday": {"available": true, "start": "08:00", "end": "12:00"}})),
            Some(vec!["sunday".to_string()]),
        );
        let schedule = v.resolve_schedule("09:00", "18:00");
        assert_eq!(schedule.hour_bounds(Weekday::Monday), Some((8, 12)));
        assert!(schedule.day(Weekday::Sunday).is_none());
    }

    #[test]
    fn test_legacy_fallback_with_default_hours() {
        let v = venue(Some(json!({})), Some(vec!["tuesday".to_string()]));
        let schedule = v.resolve_schedule("09:00", "18:00");
        assert_eq!(schedule.hour_bounds(Weekday::Tuesday), Some((9, 18)));
    }

    #[test]
    fn test_malformed_schedule_falls_through_to_legacy() {
        let v = venue(Some(json!("not a schedule")), Some(vec!["friday".to_string()]));
        let schedule = v.resolve_schedule("09:00", "18:00");
        assert_eq!(schedule.hour_bounds(Weekday::Friday), Some((9, 18)));
    }

    #[test]
    fn test_no_schedule_at_all_is_all_closed() {
        let v = venue(None, None);
        let schedule = v.resolve_schedule("09:00", "18:00");
        assert!(schedule.is_empty());
        for weekday in Weekday::ALL {
            assert_eq!(schedule.hour_bounds(weekday), None);
        }
    }
}
