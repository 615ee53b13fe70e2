//! Bookings repository

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{is_undefined_table, AppResult},
    models::{Booking, BookingStatus},
    repository::BookingStore,
};

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for BookingsRepository {
    /// Confirmed bookings in the window, for the grid's informational counts
    async fn confirmed_in_range(
        &self,
        venue_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, venue_id, booking_date, start_time, end_time, status, created_at
            FROM bookings
            WHERE venue_id = $1
              AND status = $2
              AND booking_date >= $3
              AND booking_date <= $4
            ORDER BY booking_date
            "#,
        )
        .bind(venue_id)
        .bind(BookingStatus::Confirmed)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await;

        match rows {
            Ok(rows) => Ok(rows),
            Err(e) if is_undefined_table(&e) => {
                tracing::warn!("Bookings table missing, venue {} grid shows no bookings", venue_id);
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}
