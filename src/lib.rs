//! Arvenna Venue Availability Server
//!
//! Computes per-date availability grids for venues from their weekly
//! schedules, blockouts, and bookings, and manages blockouts through
//! idempotent bulk operations, exposed as a REST JSON API. The
//! `availability` module and the `AvailabilityBoard` are also usable as a
//! library by embedding calendar frontends.

use std::sync::Arc;

use sqlx::PgPool;

pub mod api;
pub mod availability;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub pool: PgPool,
}
