//! Booking model (read-only input to availability computation)

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::enums::BookingStatus;

/// Booking record. Only confirmed bookings feed `bookings_count`; bookings
/// never change a date's availability status.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    /// Booking status (0=pending, 1=confirmed, 2=cancelled, 3=completed)
    pub status: BookingStatus,
    pub created_at: Option<DateTime<Utc>>,
}
