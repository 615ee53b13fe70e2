//! Availability grid endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::availability::AvailabilityQuery,
    models::{AvailabilityDay, HourSlot},
};

use super::{parse_date, parse_date_filter};

/// Availability grid for a venue.
///
/// Defaults to a window starting today when no range is given. Malformed
/// filter dates are ignored, matching the behavior for any other absent
/// filter.
#[utoipa::path(
    get,
    path = "/venues/{id}/availability",
    tag = "availability",
    params(
        ("id" = Uuid, Path, description = "Venue ID"),
        AvailabilityQuery
    ),
    responses(
        (status = 200, description = "Per-date availability", body = Vec<AvailabilityDay>),
        (status = 404, description = "Venue not found")
    )
)]
pub async fn get_availability(
    State(state): State<crate::AppState>,
    Path(venue_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Vec<AvailabilityDay>>> {
    let from = parse_date_filter(query.start_date.as_ref());
    let to = parse_date_filter(query.end_date.as_ref());

    let days = state.services.availability.grid(venue_id, from, to).await?;
    Ok(Json(days))
}

/// Hour slots for one date, with per-hour blocked flags
#[utoipa::path(
    get,
    path = "/venues/{id}/availability/{date}/slots",
    tag = "availability",
    params(
        ("id" = Uuid, Path, description = "Venue ID"),
        ("date" = String, Path, description = "Date (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Hour slots for the date", body = Vec<HourSlot>),
        (status = 400, description = "Invalid date"),
        (status = 404, description = "Venue not found")
    )
)]
pub async fn get_day_slots(
    State(state): State<crate::AppState>,
    Path((venue_id, date)): Path<(Uuid, String)>,
) -> AppResult<Json<Vec<HourSlot>>> {
    let date = parse_date(&date)?;

    let slots = state.services.availability.day_slots(venue_id, date).await?;
    Ok(Json(slots))
}
