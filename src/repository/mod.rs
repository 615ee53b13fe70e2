//! Repository layer for database operations

pub mod blockouts;
pub mod bookings;
pub mod venues;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Blockout, Booking, NewBlockout, Venue};

/// Read access to venues.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VenueStore: Send + Sync {
    /// Fetch a venue by id, or `AppError::NotFound` when it does not exist.
    async fn get(&self, venue_id: Uuid) -> AppResult<Venue>;
}

/// Read and write access to blockout records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockoutStore: Send + Sync {
    /// List blockouts whose date range overlaps `[from, to]`.
    /// Open bounds list everything on that side.
    async fn list(
        &self,
        venue_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<Blockout>>;

    /// Full-day blockouts (no start time) covering any of `dates`.
    async fn full_day_for_dates(
        &self,
        venue_id: Uuid,
        dates: &[NaiveDate],
    ) -> AppResult<Vec<Blockout>>;

    /// Hour-level blockouts (with a start time) covering any of `dates`.
    async fn hour_level_for_dates(
        &self,
        venue_id: Uuid,
        dates: &[NaiveDate],
    ) -> AppResult<Vec<Blockout>>;

    /// Insert a batch of blockouts, returning the number of rows written.
    async fn insert_many(&self, blockouts: &[NewBlockout]) -> AppResult<u64>;

    /// Delete blockouts by id, scoped to a venue. Returns rows deleted.
    async fn delete_by_ids(&self, venue_id: Uuid, ids: &[Uuid]) -> AppResult<u64>;

    /// Delete every blockout covering `date`, full-day and hour-level alike.
    async fn delete_all_for_date(&self, venue_id: Uuid, date: NaiveDate) -> AppResult<u64>;
}

/// Read access to bookings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Confirmed bookings with a booking date in `[from, to]`.
    async fn confirmed_in_range(
        &self,
        venue_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Booking>>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub venues: venues::VenuesRepository,
    pub blockouts: blockouts::BlockoutsRepository,
    pub bookings: bookings::BookingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            venues: venues::VenuesRepository::new(pool.clone()),
            blockouts: blockouts::BlockoutsRepository::new(pool.clone()),
            bookings: bookings::BookingsRepository::new(pool.clone()),
            pool,
        }
    }
}
