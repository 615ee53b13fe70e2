//! OpenAPI documentation

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{availability, blockouts, health};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Arvenna API",
        version = "0.9.0",
        description = "Venue Availability & Blockout Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Arvenna Team", email = "dev@arvenna.app")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Availability
        availability::get_availability,
        availability::get_day_slots,
        // Blockouts
        blockouts::list_blockouts,
        blockouts::block_dates,
        blockouts::unblock_dates,
        blockouts::toggle_dates,
        blockouts::block_hours,
        blockouts::unblock_hours,
        blockouts::clear_day,
    ),
    components(
        schemas(
            // Availability
            crate::models::AvailabilityDay,
            crate::models::HourSlot,
            crate::models::BulkOutcome,
            crate::models::OutcomeSeverity,
            crate::models::AvailabilityStatus,
            crate::models::BlockType,
            crate::models::BookingMode,
            crate::models::availability::AvailabilityQuery,
            // Blockouts
            crate::models::Blockout,
            crate::models::blockout::BlockDatesRequest,
            crate::models::blockout::UnblockDatesRequest,
            crate::models::blockout::BlockSlotsRequest,
            crate::models::blockout::UnblockSlotsRequest,
            crate::models::blockout::ClearDayRequest,
            crate::models::blockout::BlockoutQuery,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "availability", description = "Availability grids and hour slots"),
        (name = "blockouts", description = "Blockout management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
