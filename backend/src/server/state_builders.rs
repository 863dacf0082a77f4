//! Wiring of services and adapters into the HTTP state.

use std::sync::Arc;

use ecoswap_backend::domain::ports::{
    FixtureAuthTokenQuery, FixtureExchangeCommand, FixtureExchangeQuery, FixtureListingCommand,
    FixtureListingQuery, FixtureNotificationCommand, FixtureNotificationQuery, FixtureRatingCommand,
    FixtureRatingQuery, FixtureUserRepository, FixtureValidationCommand,
};
use ecoswap_backend::domain::{
    ExchangeService, ListingService, NotificationService, RatingService, ValidationService,
};
use ecoswap_backend::inbound::http::state::{HttpState, HttpStatePorts};
use ecoswap_backend::outbound::persistence::{
    DbPool, DieselAuthTokenQuery, DieselExchangeRepository, DieselListingRepository,
    DieselNotificationRepository, DieselRatingRepository, DieselUserRepository,
    DieselValidationRepository,
};

use super::ServerConfig;

fn database_backed_ports(pool: &DbPool) -> HttpStatePorts {
    let listings_repo = Arc::new(DieselListingRepository::new(pool.clone()));
    let exchanges_repo = Arc::new(DieselExchangeRepository::new(pool.clone()));
    let validations_repo = Arc::new(DieselValidationRepository::new(pool.clone()));
    let ratings_repo = Arc::new(DieselRatingRepository::new(pool.clone()));
    let notifications_repo = Arc::new(DieselNotificationRepository::new(pool.clone()));

    let listing_service = Arc::new(ListingService::new(listings_repo.clone()));
    let exchange_service = Arc::new(ExchangeService::new(
        exchanges_repo.clone(),
        listings_repo,
        notifications_repo.clone(),
    ));
    let validation_service = Arc::new(ValidationService::new(
        exchanges_repo.clone(),
        validations_repo,
        notifications_repo.clone(),
    ));
    let rating_service = Arc::new(RatingService::new(exchanges_repo, ratings_repo));
    let notification_service = Arc::new(NotificationService::new(notifications_repo));

    HttpStatePorts {
        auth: Arc::new(DieselAuthTokenQuery::new(pool.clone())),
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        listings: listing_service.clone(),
        listings_query: listing_service,
        exchanges: exchange_service.clone(),
        exchanges_query: exchange_service,
        validations: validation_service,
        ratings: rating_service.clone(),
        ratings_query: rating_service,
        notifications: notification_service.clone(),
        notifications_query: notification_service,
    }
}

fn fixture_ports() -> HttpStatePorts {
    HttpStatePorts {
        auth: Arc::new(FixtureAuthTokenQuery),
        users: Arc::new(FixtureUserRepository),
        listings: Arc::new(FixtureListingCommand),
        listings_query: Arc::new(FixtureListingQuery),
        exchanges: Arc::new(FixtureExchangeCommand),
        exchanges_query: Arc::new(FixtureExchangeQuery),
        validations: Arc::new(FixtureValidationCommand),
        ratings: Arc::new(FixtureRatingCommand),
        ratings_query: Arc::new(FixtureRatingQuery),
        notifications: Arc::new(FixtureNotificationCommand),
        notifications_query: Arc::new(FixtureNotificationQuery),
    }
}

/// Build the HTTP state: database-backed when a pool is configured,
/// fixture-backed otherwise.
pub(crate) fn build_http_state(config: &ServerConfig) -> HttpState {
    let ports = match &config.db_pool {
        Some(pool) => database_backed_ports(pool),
        None => {
            tracing::warn!("no database pool configured; serving fixture data");
            fixture_ports()
        }
    };
    HttpState::new(ports)
}
