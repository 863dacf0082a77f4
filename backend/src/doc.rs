//! OpenAPI document served by Swagger UI in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::{health, interactions, listings, notifications, schemas, users};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerToken",
                SecurityScheme::Http(
                    HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build(),
                ),
            );
        }
    }
}

/// Public OpenAPI surface used by Swagger UI and tooling.
#[derive(OpenApi)]
#[openapi(
    paths(
        listings::create_listing,
        listings::list_listings,
        listings::get_listing,
        listings::update_listing,
        listings::close_listing,
        interactions::propose_exchange,
        interactions::list_exchanges,
        interactions::get_exchange,
        interactions::accept_exchange,
        interactions::reject_exchange,
        interactions::start_exchange,
        interactions::cancel_exchange,
        interactions::complete_exchange,
        interactions::rate_exchange,
        notifications::list_notifications,
        notifications::mark_notification_read,
        users::current_user,
        users::list_user_ratings,
        health::ready,
        health::live,
    ),
    components(schemas(
        schemas::ErrorSchema,
        listings::CreateListingRequestBody,
        listings::UpdateListingRequestBody,
        listings::ListingResponseBody,
        interactions::ProposeExchangeRequestBody,
        interactions::AcceptExchangeRequestBody,
        interactions::RejectExchangeRequestBody,
        interactions::CompleteExchangeRequestBody,
        interactions::RateExchangeRequestBody,
        interactions::MeetingResponseBody,
        interactions::ExchangeResponseBody,
        interactions::ValidationResolutionResponseBody,
        interactions::RatingResponseBody,
        notifications::NotificationResponseBody,
        users::UserResponseBody,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "listings", description = "Published goods"),
        (name = "interactions", description = "Exchange lifecycle and validations"),
        (name = "notifications", description = "Counterparty notifications"),
        (name = "users", description = "Profiles and received ratings"),
        (name = "health", description = "Probes"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use utoipa::OpenApi;

    use super::*;

    #[test]
    fn document_contains_the_interaction_surface() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/interactions",
            "/api/interactions/{id}/accept",
            "/api/interactions/{id}/complete",
            "/api/interactions/{id}/rate",
            "/api/listings",
            "/api/notifications",
            "/health/ready",
        ] {
            assert!(paths.contains_key(path), "missing path: {path}");
        }
    }
}
