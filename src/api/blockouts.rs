//! Blockout management endpoints
//!
//! All owner-scoped. The bulk operations are idempotent and answer with a
//! single `BulkOutcome`; repeating a request reports zero applied changes
//! instead of failing.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::blockout::{
        BlockDatesRequest, BlockSlotsRequest, BlockoutQuery, ClearDayRequest, UnblockDatesRequest,
        UnblockSlotsRequest,
    },
    models::{BlockType, Blockout, BulkOutcome, SlotKey},
};

use super::{parse_date, parse_date_filter, parse_dates, AuthenticatedOwner};

fn parse_slots(slots: &[String]) -> AppResult<Vec<SlotKey>> {
    slots
        .iter()
        .map(|s| {
            SlotKey::parse(s).ok_or_else(|| AppError::Validation(format!("Invalid hour slot: {}", s)))
        })
        .collect()
}

/// List blockouts for a venue
#[utoipa::path(
    get,
    path = "/venues/{id}/blockouts",
    tag = "blockouts",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Venue ID"),
        BlockoutQuery
    ),
    responses(
        (status = 200, description = "Blockouts overlapping the window", body = Vec<Blockout>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the venue owner"),
        (status = 404, description = "Venue not found")
    )
)]
pub async fn list_blockouts(
    State(state): State<crate::AppState>,
    AuthenticatedOwner(claims): AuthenticatedOwner,
    Path(venue_id): Path<Uuid>,
    Query(query): Query<BlockoutQuery>,
) -> AppResult<Json<Vec<Blockout>>> {
    let from = parse_date_filter(query.start_date.as_ref());
    let to = parse_date_filter(query.end_date.as_ref());

    let blockouts = state
        .services
        .blockouts
        .list(venue_id, Some(claims.owner_id), from, to)
        .await?;
    Ok(Json(blockouts))
}

/// Block whole days
#[utoipa::path(
    post,
    path = "/venues/{id}/blockouts/block",
    tag = "blockouts",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Venue ID")
    ),
    request_body = BlockDatesRequest,
    responses(
        (status = 200, description = "Outcome of the bulk block", body = BulkOutcome),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the venue owner"),
        (status = 409, description = "Concurrent duplicate write")
    )
)]
pub async fn block_dates(
    State(state): State<crate::AppState>,
    AuthenticatedOwner(claims): AuthenticatedOwner,
    Path(venue_id): Path<Uuid>,
    Json(request): Json<BlockDatesRequest>,
) -> AppResult<Json<BulkOutcome>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let dates = parse_dates(&request.dates)?;

    let outcome = state
        .services
        .blockouts
        .block_dates(
            venue_id,
            Some(claims.owner_id),
            &dates,
            request.reason,
            request.block_type.unwrap_or(BlockType::Personal),
        )
        .await?;
    Ok(Json(outcome))
}

/// Unblock whole days
#[utoipa::path(
    post,
    path = "/venues/{id}/blockouts/unblock",
    tag = "blockouts",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Venue ID")
    ),
    request_body = UnblockDatesRequest,
    responses(
        (status = 200, description = "Outcome of the bulk unblock", body = BulkOutcome),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the venue owner")
    )
)]
pub async fn unblock_dates(
    State(state): State<crate::AppState>,
    AuthenticatedOwner(claims): AuthenticatedOwner,
    Path(venue_id): Path<Uuid>,
    Json(request): Json<UnblockDatesRequest>,
) -> AppResult<Json<BulkOutcome>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let dates = parse_dates(&request.dates)?;

    let outcome = state
        .services
        .blockouts
        .unblock_dates(venue_id, Some(claims.owner_id), &dates)
        .await?;
    Ok(Json(outcome))
}

/// Toggle whole days between blocked and free
#[utoipa::path(
    post,
    path = "/venues/{id}/blockouts/toggle",
    tag = "blockouts",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Venue ID")
    ),
    request_body = BlockDatesRequest,
    responses(
        (status = 200, description = "Combined outcome of both halves", body = BulkOutcome),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the venue owner")
    )
)]
pub async fn toggle_dates(
    State(state): State<crate::AppState>,
    AuthenticatedOwner(claims): AuthenticatedOwner,
    Path(venue_id): Path<Uuid>,
    Json(request): Json<BlockDatesRequest>,
) -> AppResult<Json<BulkOutcome>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let dates = parse_dates(&request.dates)?;

    let outcome = state
        .services
        .blockouts
        .toggle_dates(
            venue_id,
            Some(claims.owner_id),
            &dates,
            request.reason,
            request.block_type.unwrap_or(BlockType::Personal),
        )
        .await?;
    Ok(Json(outcome))
}

/// Block individual hour slots
#[utoipa::path(
    post,
    path = "/venues/{id}/blockouts/block-hours",
    tag = "blockouts",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Venue ID")
    ),
    request_body = BlockSlotsRequest,
    responses(
        (status = 200, description = "Outcome of the bulk hour block", body = BulkOutcome),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the venue owner"),
        (status = 409, description = "Concurrent duplicate write")
    )
)]
pub async fn block_hours(
    State(state): State<crate::AppState>,
    AuthenticatedOwner(claims): AuthenticatedOwner,
    Path(venue_id): Path<Uuid>,
    Json(request): Json<BlockSlotsRequest>,
) -> AppResult<Json<BulkOutcome>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let slots = parse_slots(&request.slots)?;

    let outcome = state
        .services
        .blockouts
        .block_hour_slots(
            venue_id,
            Some(claims.owner_id),
            &slots,
            request.reason,
            request.block_type.unwrap_or(BlockType::Personal),
        )
        .await?;
    Ok(Json(outcome))
}

/// Unblock individual hour slots on one date.
///
/// An empty slot list is rejected rather than treated as "clear the day";
/// that destructive variant is the separate clear-day endpoint.
#[utoipa::path(
    post,
    path = "/venues/{id}/blockouts/unblock-hours",
    tag = "blockouts",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Venue ID")
    ),
    request_body = UnblockSlotsRequest,
    responses(
        (status = 200, description = "Outcome of the bulk hour unblock", body = BulkOutcome),
        (status = 400, description = "Invalid request or empty slot list"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the venue owner")
    )
)]
pub async fn unblock_hours(
    State(state): State<crate::AppState>,
    AuthenticatedOwner(claims): AuthenticatedOwner,
    Path(venue_id): Path<Uuid>,
    Json(request): Json<UnblockSlotsRequest>,
) -> AppResult<Json<BulkOutcome>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let date = parse_date(&request.date)?;
    let slots = parse_slots(&request.slots)?;

    let outcome = state
        .services
        .blockouts
        .unblock_hour_slots(venue_id, Some(claims.owner_id), date, &slots)
        .await?;
    Ok(Json(outcome))
}

/// Remove every blockout for one date, day- and hour-level alike
#[utoipa::path(
    post,
    path = "/venues/{id}/blockouts/clear-day",
    tag = "blockouts",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Venue ID")
    ),
    request_body = ClearDayRequest,
    responses(
        (status = 200, description = "Outcome with the removed count", body = BulkOutcome),
        (status = 400, description = "Invalid date"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the venue owner")
    )
)]
pub async fn clear_day(
    State(state): State<crate::AppState>,
    AuthenticatedOwner(claims): AuthenticatedOwner,
    Path(venue_id): Path<Uuid>,
    Json(request): Json<ClearDayRequest>,
) -> AppResult<Json<BulkOutcome>> {
    let date = parse_date(&request.date)?;

    let outcome = state
        .services
        .blockouts
        .clear_date(venue_id, Some(claims.owner_id), date)
        .await?;
    Ok(Json(outcome))
}
