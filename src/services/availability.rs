//! Availability grid service

use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    availability::{compute_range, generate_hour_slots},
    config::AvailabilityConfig,
    error::AppResult,
    models::{AvailabilityDay, HourSlot, Venue},
    repository::{BlockoutStore, BookingStore, VenueStore},
};

#[derive(Clone)]
pub struct AvailabilityService {
    venues: Arc<dyn VenueStore>,
    blockouts: Arc<dyn BlockoutStore>,
    bookings: Arc<dyn BookingStore>,
    config: AvailabilityConfig,
}

impl AvailabilityService {
    pub fn new(
        venues: Arc<dyn VenueStore>,
        blockouts: Arc<dyn BlockoutStore>,
        bookings: Arc<dyn BookingStore>,
        config: AvailabilityConfig,
    ) -> Self {
        Self {
            venues,
            blockouts,
            bookings,
            config,
        }
    }

    /// Resolve the requested window, defaulting to today plus the configured
    /// number of days.
    pub fn window(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> (NaiveDate, NaiveDate) {
        let from = from.unwrap_or_else(|| Utc::now().date_naive());
        let to = to.unwrap_or_else(|| {
            from.checked_add_days(Days::new(u64::from(self.config.window_days)))
                .unwrap_or(from)
        });
        (from, to)
    }

    /// Compute the availability grid for a venue over `[from, to]`.
    ///
    /// Blockout and booking reads tolerate a missing table (the repository
    /// degrades them to empty), so a venue with no blockout history still
    /// gets a grid.
    pub async fn grid(
        &self,
        venue_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<AvailabilityDay>> {
        Ok(self.grid_with_venue(venue_id, from, to).await?.1)
    }

    /// Like `grid`, also returning the venue for callers that need its
    /// booking mode alongside the computed days
    pub async fn grid_with_venue(
        &self,
        venue_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<(Venue, Vec<AvailabilityDay>)> {
        let venue = self.venues.get(venue_id).await?;
        let (from, to) = self.window(from, to);
        tracing::debug!("Computing availability for venue {} from {} to {}", venue_id, from, to);

        let schedule = venue.resolve_schedule(&self.config.default_open, &self.config.default_close);
        let blockouts = self.blockouts.list(venue_id, Some(from), Some(to)).await?;
        let bookings = self.bookings.confirmed_in_range(venue_id, from, to).await?;

        let days = compute_range(
            &schedule,
            &blockouts,
            &bookings,
            from,
            to,
            venue.booking_mode,
        );
        Ok((venue, days))
    }

    /// Expand one date into hour slots with per-hour blocked flags
    pub async fn day_slots(&self, venue_id: Uuid, date: NaiveDate) -> AppResult<Vec<HourSlot>> {
        let venue = self.venues.get(venue_id).await?;
        let schedule = venue.resolve_schedule(&self.config.default_open, &self.config.default_close);
        let blockouts = self.blockouts.list(venue_id, Some(date), Some(date)).await?;
        Ok(generate_hour_slots(&schedule, &blockouts, date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AvailabilityStatus, BlockType, Blockout, BookingMode, Venue};
    use crate::repository::{MockBlockoutStore, MockBookingStore, MockVenueStore};
    use chrono::NaiveTime;
    use serde_json::json;

    fn config() -> AvailabilityConfig {
        AvailabilityConfig {
            window_days: 30,
            default_open: "09:00".to_string(),
            default_close: "18:00".to_string(),
        }
    }

    fn venue(venue_id: Uuid) -> Venue {
        Venue {
            id: venue_id,
            owner_id: Uuid::new_v4(),
            name: "Court A".to_string(),
            booking_mode: BookingMode::Hourly,
            weekly_schedule: Some(
                json!({"monday": {"available": true, "start": "09:00", "end": "18:00"}}),
            ),
            available_days: None,
            created_at: None,
        }
    }

    fn hour_blockout(venue_id: Uuid, date: NaiveDate, hour: u32) -> Blockout {
        Blockout {
            id: Uuid::new_v4(),
            venue_id,
            start_date: date,
            end_date: date,
            start_time: NaiveTime::from_hms_opt(hour, 0, 0),
            end_time: NaiveTime::from_hms_opt(hour + 1, 0, 0),
            reason: None,
            block_type: BlockType::Personal,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    fn service(
        venues: MockVenueStore,
        blockouts: MockBlockoutStore,
        bookings: MockBookingStore,
    ) -> AvailabilityService {
        AvailabilityService::new(
            Arc::new(venues),
            Arc::new(blockouts),
            Arc::new(bookings),
            config(),
        )
    }

    #[tokio::test]
    async fn test_grid_defaults_end_of_window_from_config() {
        let venue_id = Uuid::new_v4();
        let from: NaiveDate = "2025-01-06".parse().unwrap();
        let expected_to: NaiveDate = "2025-02-05".parse().unwrap();

        let mut venues = MockVenueStore::new();
        venues.expect_get().returning(move |id| Ok(venue(id)));

        let mut blockouts = MockBlockoutStore::new();
        blockouts
            .expect_list()
            .withf(move |_, f, t| *f == Some(from) && *t == Some(expected_to))
            .returning(|_, _, _| Ok(Vec::new()));

        let mut bookings = MockBookingStore::new();
        bookings
            .expect_confirmed_in_range()
            .withf(move |_, f, t| *f == from && *t == expected_to)
            .returning(|_, _, _| Ok(Vec::new()));

        let days = service(venues, blockouts, bookings)
            .grid(venue_id, Some(from), None)
            .await
            .unwrap();
        assert_eq!(days.len(), 31);
        assert_eq!(days[0].date, from);
        assert_eq!(days[30].date, expected_to);
    }

    #[tokio::test]
    async fn test_grid_legacy_days_use_default_hours() {
        let venue_id = Uuid::new_v4();
        // 2025-01-06 is a Monday
        let monday: NaiveDate = "2025-01-06".parse().unwrap();

        let mut venues = MockVenueStore::new();
        venues.expect_get().returning(move |id| {
            let mut v = venue(id);
            v.weekly_schedule = None;
            v.available_days = Some(vec!["monday".to_string()]);
            Ok(v)
        });

        let mut blockouts = MockBlockoutStore::new();
        blockouts.expect_list().returning(|_, _, _| Ok(Vec::new()));
        let mut bookings = MockBookingStore::new();
        bookings
            .expect_confirmed_in_range()
            .returning(|_, _, _| Ok(Vec::new()));

        let days = service(venues, blockouts, bookings)
            .grid(venue_id, Some(monday), Some(monday))
            .await
            .unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].status, AvailabilityStatus::Available);
        assert_eq!(days[0].total_slots, 9);
    }

    #[tokio::test]
    async fn test_grid_unknown_venue_is_not_found() {
        let mut venues = MockVenueStore::new();
        venues
            .expect_get()
            .returning(|id| Err(crate::error::AppError::NotFound(format!("Venue {} not found", id))));

        let blockouts = MockBlockoutStore::new();
        let bookings = MockBookingStore::new();

        let err = service(venues, blockouts, bookings)
            .grid(Uuid::new_v4(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_day_slots_flags_blocked_hour() {
        let venue_id = Uuid::new_v4();
        let monday: NaiveDate = "2025-01-06".parse().unwrap();

        let mut venues = MockVenueStore::new();
        venues.expect_get().returning(move |id| Ok(venue(id)));

        let mut blockouts = MockBlockoutStore::new();
        blockouts
            .expect_list()
            .withf(move |_, f, t| *f == Some(monday) && *t == Some(monday))
            .returning(move |id, _, _| Ok(vec![hour_blockout(id, monday, 14)]));

        let bookings = MockBookingStore::new();

        let slots = service(venues, blockouts, bookings)
            .day_slots(venue_id, monday)
            .await
            .unwrap();
        assert_eq!(slots.len(), 9);
        for slot in &slots {
            assert_eq!(slot.is_blocked, slot.slot.hour == 14);
            assert!(!slot.full_day_blocked);
        }
    }
}
