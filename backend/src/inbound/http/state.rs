//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AuthTokenQuery, ExchangeCommand, ExchangeQuery, ListingCommand, ListingQuery,
    NotificationCommand, NotificationQuery, RatingCommand, RatingQuery, UserRepository,
    ValidationCommand,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub auth: Arc<dyn AuthTokenQuery>,
    pub users: Arc<dyn UserRepository>,
    pub listings: Arc<dyn ListingCommand>,
    pub listings_query: Arc<dyn ListingQuery>,
    pub exchanges: Arc<dyn ExchangeCommand>,
    pub exchanges_query: Arc<dyn ExchangeQuery>,
    pub validations: Arc<dyn ValidationCommand>,
    pub ratings: Arc<dyn RatingCommand>,
    pub ratings_query: Arc<dyn RatingQuery>,
    pub notifications: Arc<dyn NotificationCommand>,
    pub notifications_query: Arc<dyn NotificationQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthTokenQuery>,
    pub users: Arc<dyn UserRepository>,
    pub listings: Arc<dyn ListingCommand>,
    pub listings_query: Arc<dyn ListingQuery>,
    pub exchanges: Arc<dyn ExchangeCommand>,
    pub exchanges_query: Arc<dyn ExchangeQuery>,
    pub validations: Arc<dyn ValidationCommand>,
    pub ratings: Arc<dyn RatingCommand>,
    pub ratings_query: Arc<dyn RatingQuery>,
    pub notifications: Arc<dyn NotificationCommand>,
    pub notifications_query: Arc<dyn NotificationQuery>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            auth,
            users,
            listings,
            listings_query,
            exchanges,
            exchanges_query,
            validations,
            ratings,
            ratings_query,
            notifications,
            notifications_query,
        } = ports;
        Self {
            auth,
            users,
            listings,
            listings_query,
            exchanges,
            exchanges_query,
            validations,
            ratings,
            ratings_query,
            notifications,
            notifications_query,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Fixture state for handler tests.

    use super::*;
    use crate::domain::ports::{
        FixtureAuthTokenQuery, FixtureExchangeCommand, FixtureExchangeQuery, FixtureListingCommand,
        FixtureListingQuery, FixtureNotificationCommand, FixtureNotificationQuery,
        FixtureRatingCommand, FixtureRatingQuery, FixtureUserRepository, FixtureValidationCommand,
    };

    /// Ports bundle wired entirely with fixtures.
    pub(crate) fn fixture_ports() -> HttpStatePorts {
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
}
