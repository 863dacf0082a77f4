//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{exchanges, listings, notifications, ratings, users, validations};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub display_name: String,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Listing models
// ---------------------------------------------------------------------------

/// Row struct for reading from the listings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ListingRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub kind: String,
    pub price_cents: Option<i64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating listing records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = listings)]
pub(crate) struct NewListingRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub kind: &'a str,
    pub price_cents: Option<i64>,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for editing listing fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = listings)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ListingUpdateChangeset<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub price_cents: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Exchange models
// ---------------------------------------------------------------------------

/// Row struct for reading from the exchanges table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = exchanges)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExchangeRow {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub proposer_id: Uuid,
    pub receiver_id: Uuid,
    pub status: String,
    pub message: Option<String>,
    pub meeting_location: Option<String>,
    pub meeting_at: Option<DateTime<Utc>>,
    pub meeting_notes: Option<String>,
    pub reject_reason: Option<String>,
    pub fecha_completado: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating exchange records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = exchanges)]
pub(crate) struct NewExchangeRow<'a> {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub proposer_id: Uuid,
    pub receiver_id: Uuid,
    pub status: &'a str,
    pub message: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Validation models
// ---------------------------------------------------------------------------

/// Row struct for reading from the validations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = validations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ValidationRow {
    pub id: Uuid,
    pub exchange_id: Uuid,
    pub user_id: Uuid,
    pub exito: bool,
    pub puntuacion: Option<i16>,
    pub comentario: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating validation records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = validations)]
pub(crate) struct NewValidationRow<'a> {
    pub id: Uuid,
    pub exchange_id: Uuid,
    pub user_id: Uuid,
    pub exito: bool,
    pub puntuacion: Option<i16>,
    pub comentario: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Rating models
// ---------------------------------------------------------------------------

/// Row struct for reading from the ratings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ratings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RatingRow {
    pub id: Uuid,
    pub exchange_id: Uuid,
    pub rater_id: Uuid,
    pub rated_id: Uuid,
    pub puntuacion: i16,
    pub comentario: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating rating records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ratings)]
pub(crate) struct NewRatingRow<'a> {
    pub id: Uuid,
    pub exchange_id: Uuid,
    pub rater_id: Uuid,
    pub rated_id: Uuid,
    pub puntuacion: i16,
    pub comentario: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Notification models
// ---------------------------------------------------------------------------

/// Row struct for reading from the notifications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub kind: String,
    pub exchange_id: Uuid,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating notification records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub kind: &'a str,
    pub exchange_id: Uuid,
    pub body: &'a str,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
