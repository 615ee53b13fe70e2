//! API handlers for Arvenna REST endpoints

pub mod availability;
pub mod blockouts;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::OwnerClaims,
    AppState,
};

/// Extractor for the authenticated venue owner from a JWT token
pub struct AuthenticatedOwner(pub OwnerClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedOwner {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        // Check for Bearer token
        if !auth_header.starts_with("Bearer ") {
            return Err(AppError::Authentication("Invalid authorization header format".to_string()));
        }

        let token = &auth_header[7..];

        // Validate JWT token using the secret from configuration
        let claims = OwnerClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedOwner(claims))
    }
}

/// Parse a required `YYYY-MM-DD` date, rejecting anything else
pub(crate) fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date: {}", s)))
}

/// Parse every date in a request list, rejecting the whole list on the first
/// malformed entry
pub(crate) fn parse_dates(dates: &[String]) -> AppResult<Vec<NaiveDate>> {
    dates.iter().map(|s| parse_date(s)).collect()
}

/// Parse an optional query filter date; malformed values are ignored
pub(crate) fn parse_date_filter(s: Option<&String>) -> Option<NaiveDate> {
    s.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}
