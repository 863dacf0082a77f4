//! Domain entities, services, and ports.
//!
//! Purpose: define strongly typed marketplace aggregates (listings,
//! exchanges, validations, ratings, notifications) and the services driving
//! them, free of transport and persistence concerns. Invariants live in
//! validated constructors; adapters talk to the domain exclusively through
//! the traits in [`ports`].

pub mod error;
pub mod exchange;
mod exchange_service;
pub mod listing;
mod listing_service;
pub mod notification;
mod notification_service;
pub mod ports;
pub mod rating;
mod rating_service;
pub mod user;
pub mod validation;
mod validation_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::exchange::{
    Exchange, ExchangeDraft, ExchangeStatus, ExchangeValidationError, MeetingDetails,
    ParseExchangeStatusError,
};
pub use self::exchange_service::ExchangeService;
pub use self::listing::{
    Listing, ListingDraft, ListingKind, ListingStatus, ListingValidationError,
    ParseListingKindError, ParseListingStatusError,
};
pub use self::listing_service::ListingService;
pub use self::notification::{Notification, NotificationKind, ParseNotificationKindError};
pub use self::notification_service::NotificationService;
pub use self::rating::{Rating, RatingDraft, RatingValidationError, Score};
pub use self::rating_service::RatingService;
pub use self::user::{User, UserId, UserValidationError};
pub use self::validation::{
    Validation, ValidationDraft, ValidationOutcome, ValidationSetError, ValidationValidationError,
    resolve_validations,
};
pub use self::validation_service::ValidationService;

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
