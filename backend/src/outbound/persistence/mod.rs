//! PostgreSQL persistence adapters built on Diesel and `diesel-async`.

mod diesel_auth_token_query;
mod diesel_error_mapping;
mod diesel_exchange_repository;
mod diesel_listing_repository;
mod diesel_notification_repository;
mod diesel_rating_repository;
mod diesel_user_repository;
mod diesel_validation_repository;
pub(crate) mod models;
pub mod pool;
pub mod schema;

pub use diesel_auth_token_query::DieselAuthTokenQuery;
pub use diesel_exchange_repository::DieselExchangeRepository;
pub use diesel_listing_repository::DieselListingRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_rating_repository::DieselRatingRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_validation_repository::DieselValidationRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
