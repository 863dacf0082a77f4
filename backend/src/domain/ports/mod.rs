//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, token lookup) carry their own error enums;
//! driving ports (commands/queries consumed by HTTP handlers) speak the
//! domain [`Error`](crate::domain::Error) directly. Every port ships a
//! `Fixture*` implementation for tests and a `Mock*` under `cfg(test)`.

mod auth_token_query;
mod exchange_command;
mod exchange_query;
mod exchange_repository;
mod listing_command;
mod listing_query;
mod listing_repository;
mod notification_command;
mod notification_query;
mod notification_repository;
mod rating_command;
mod rating_query;
mod rating_repository;
mod user_repository;
mod validation_command;
mod validation_repository;

#[cfg(test)]
pub use auth_token_query::MockAuthTokenQuery;
pub use auth_token_query::{
    AuthTokenQuery, AuthTokenQueryError, FIXTURE_BEARER_TOKEN, FixtureAuthTokenQuery,
    fixture_user_id,
};
#[cfg(test)]
pub use exchange_command::MockExchangeCommand;
pub use exchange_command::{
    AcceptExchangeRequest, CancelExchangeRequest, ExchangeCommand, FixtureExchangeCommand,
    ProposeExchangeRequest, RejectExchangeRequest, StartExchangeRequest,
};
#[cfg(test)]
pub use exchange_query::MockExchangeQuery;
pub use exchange_query::{
    ExchangePayload, ExchangeQuery, FixtureExchangeQuery, GetExchangeRequest, ListExchangesRequest,
    MeetingPayload,
};
#[cfg(test)]
pub use exchange_repository::MockExchangeRepository;
pub use exchange_repository::{
    ExchangeRepository, ExchangeRepositoryError, ExchangeStatusTransition,
    FixtureExchangeRepository,
};
#[cfg(test)]
pub use listing_command::MockListingCommand;
pub use listing_command::{
    CloseListingRequest, CreateListingRequest, FixtureListingCommand, ListingCommand,
    UpdateListingRequest,
};
#[cfg(test)]
pub use listing_query::MockListingQuery;
pub use listing_query::{
    FixtureListingQuery, GetListingRequest, ListListingsRequest, ListingPayload, ListingQuery,
};
#[cfg(test)]
pub use listing_repository::MockListingRepository;
pub use listing_repository::{
    DEFAULT_LISTING_PAGE_SIZE, FixtureListingRepository, ListingFilter, ListingRepository,
    ListingRepositoryError, ListingStatusTransition, ListingUpdate,
};
#[cfg(test)]
pub use notification_command::MockNotificationCommand;
pub use notification_command::{
    FixtureNotificationCommand, MarkNotificationReadRequest, NotificationCommand,
};
#[cfg(test)]
pub use notification_query::MockNotificationQuery;
pub use notification_query::{
    FixtureNotificationQuery, ListNotificationsRequest, NotificationPayload, NotificationQuery,
};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{
    FixtureNotificationRepository, NotificationRepository, NotificationRepositoryError,
};
#[cfg(test)]
pub use rating_command::MockRatingCommand;
pub use rating_command::{FixtureRatingCommand, RateExchangeRequest, RatingCommand};
#[cfg(test)]
pub use rating_query::MockRatingQuery;
pub use rating_query::{
    FixtureRatingQuery, ListRatingsForUserRequest, RatingPayload, RatingQuery,
};
#[cfg(test)]
pub use rating_repository::MockRatingRepository;
pub use rating_repository::{FixtureRatingRepository, RatingRepository, RatingRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};
#[cfg(test)]
pub use validation_command::MockValidationCommand;
pub use validation_command::{
    FixtureValidationCommand, SubmitValidationRequest, SubmitValidationResponse, ValidationCommand,
};
#[cfg(test)]
pub use validation_repository::MockValidationRepository;
pub use validation_repository::{
    FixtureValidationRepository, ValidationRepository, ValidationRepositoryError,
    ValidationResolution,
};
