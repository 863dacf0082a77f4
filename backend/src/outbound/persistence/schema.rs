//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them for
//! compile-time query validation and type-safe SQL generation. Regenerate
//! with `diesel print-schema` after changing migrations.

diesel::table! {
    /// Registered marketplace users.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Human-readable display name (max 32 characters).
        display_name -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Bearer tokens stored as SHA-256 digests.
    access_tokens (token_digest) {
        /// Primary key: SHA-256 digest of the bearer token.
        token_digest -> Bytea,
        user_id -> Uuid,
        /// NULL means the token never expires.
        expires_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Published listings.
    listings (id) {
        id -> Uuid,
        owner_id -> Uuid,
        title -> Varchar,
        description -> Text,
        category -> Varchar,
        /// Token: intercambio | venta | donacion.
        kind -> Varchar,
        /// Present only for venta listings.
        price_cents -> Nullable<Int8>,
        /// Token: disponible | reservado | cerrado.
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Exchange lifecycle rows; never deleted.
    exchanges (id) {
        id -> Uuid,
        listing_id -> Uuid,
        proposer_id -> Uuid,
        receiver_id -> Uuid,
        /// Token: pendiente | aceptado | rechazado | en_progreso |
        /// pendiente_validacion | completado | fallido | cancelado.
        status -> Varchar,
        message -> Nullable<Text>,
        meeting_location -> Nullable<Varchar>,
        meeting_at -> Nullable<Timestamptz>,
        meeting_notes -> Nullable<Text>,
        reject_reason -> Nullable<Text>,
        /// Set once both participants report success.
        fecha_completado -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Participant verdicts; unique per (exchange_id, user_id).
    validations (id) {
        id -> Uuid,
        exchange_id -> Uuid,
        user_id -> Uuid,
        /// Success flag.
        exito -> Bool,
        /// Optional 1-5 score.
        puntuacion -> Nullable<Int2>,
        comentario -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Counterparty ratings; unique per (exchange_id, rater_id).
    ratings (id) {
        id -> Uuid,
        exchange_id -> Uuid,
        rater_id -> Uuid,
        rated_id -> Uuid,
        puntuacion -> Int2,
        comentario -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Best-effort notification rows.
    notifications (id) {
        id -> Uuid,
        recipient_id -> Uuid,
        /// Event token, e.g. oferta_recibida.
        kind -> Varchar,
        exchange_id -> Uuid,
        body -> Text,
        read -> Bool,
        created_at -> Timestamptz,
    }
}
