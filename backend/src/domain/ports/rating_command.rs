//! Driving port for rating a counterparty.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, UserId};

use super::rating_query::{RatingPayload, fixture_rating_payload};

/// Request to rate the counterparty of an exchange.
#[derive(Debug, Clone)]
pub struct RateExchangeRequest {
    pub caller: UserId,
    pub exchange_id: Uuid,
    /// The counterparty being rated (`calificado_id`).
    pub rated_id: UserId,
    /// The score (`puntuacion`), validated to 1..=5 by the service.
    pub score: i16,
    /// Optional comment (`comentario`).
    pub comment: Option<String>,
}

/// Driving port for rating submissions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingCommand: Send + Sync {
    /// Record the caller's rating of the counterparty.
    async fn rate(&self, request: RateExchangeRequest) -> Result<RatingPayload, Error>;
}

/// Fixture implementation echoing the request into a canned payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRatingCommand;

#[async_trait]
impl RatingCommand for FixtureRatingCommand {
    async fn rate(&self, request: RateExchangeRequest) -> Result<RatingPayload, Error> {
        let mut payload = fixture_rating_payload(Uuid::from_u128(0x0401), request.rated_id);
        payload.exchange_id = request.exchange_id;
        payload.rater_id = request.caller;
        payload.score = request.score;
        payload.comment = request.comment;
        Ok(payload)
    }
}
