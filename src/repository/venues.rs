//! Venues repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Venue,
    repository::VenueStore,
};

#[derive(Clone)]
pub struct VenuesRepository {
    pool: Pool<Postgres>,
}

impl VenuesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VenueStore for VenuesRepository {
    /// Get venue by ID
    async fn get(&self, venue_id: Uuid) -> AppResult<Venue> {
        sqlx::query_as::<_, Venue>(
            r#"
            SELECT id, owner_id, name, booking_mode, weekly_schedule, available_days, created_at
            FROM venues
            WHERE id = $1
            "#,
        )
        .bind(venue_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue {} not found", venue_id)))
    }
}
