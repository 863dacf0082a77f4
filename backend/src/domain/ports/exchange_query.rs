//! Driving ports for exchange reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Error, Exchange, ExchangeStatus, MeetingDetails, UserId};

/// Transport-neutral projection of [`MeetingDetails`].
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingPayload {
    pub location: String,
    pub meeting_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl From<&MeetingDetails> for MeetingPayload {
    fn from(meeting: &MeetingDetails) -> Self {
        Self {
            location: meeting.location().to_owned(),
            meeting_at: meeting.meeting_at(),
            notes: meeting.notes().map(str::to_owned),
        }
    }
}

/// Transport-neutral projection of an [`Exchange`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangePayload {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub proposer_id: UserId,
    pub receiver_id: UserId,
    pub status: ExchangeStatus,
    pub message: Option<String>,
    pub meeting: Option<MeetingPayload>,
    pub reject_reason: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Exchange> for ExchangePayload {
    fn from(exchange: Exchange) -> Self {
        Self {
            id: exchange.id(),
            listing_id: exchange.listing_id(),
            proposer_id: *exchange.proposer_id(),
            receiver_id: *exchange.receiver_id(),
            status: exchange.status(),
            message: exchange.message().map(str::to_owned),
            meeting: exchange.meeting().map(MeetingPayload::from),
            reject_reason: exchange.reject_reason().map(str::to_owned),
            completed_at: exchange.completed_at(),
            created_at: exchange.created_at(),
            updated_at: exchange.updated_at(),
        }
    }
}

/// Request to read a single exchange.
#[derive(Debug, Clone)]
pub struct GetExchangeRequest {
    pub caller: UserId,
    pub exchange_id: Uuid,
}

/// Request to list the caller's exchanges.
#[derive(Debug, Clone)]
pub struct ListExchangesRequest {
    pub caller: UserId,
}

/// Driving port for exchange reads; participant-only.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeQuery: Send + Sync {
    /// Fetch one exchange the caller participates in.
    async fn get(&self, request: GetExchangeRequest) -> Result<ExchangePayload, Error>;

    /// All exchanges the caller participates in, newest first.
    async fn list(&self, request: ListExchangesRequest) -> Result<Vec<ExchangePayload>, Error>;
}

pub(crate) fn fixture_exchange_payload(
    exchange_id: Uuid,
    proposer_id: UserId,
    status: ExchangeStatus,
) -> ExchangePayload {
    ExchangePayload {
        id: exchange_id,
        listing_id: Uuid::from_u128(0x0101),
        proposer_id,
        receiver_id: UserId::from_uuid(Uuid::from_u128(0x0002)),
        status,
        message: None,
        meeting: None,
        reject_reason: None,
        completed_at: None,
        created_at: DateTime::<Utc>::UNIX_EPOCH,
        updated_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

/// Fixture implementation returning canned exchanges for the caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureExchangeQuery;

#[async_trait]
impl ExchangeQuery for FixtureExchangeQuery {
    async fn get(&self, request: GetExchangeRequest) -> Result<ExchangePayload, Error> {
        Ok(fixture_exchange_payload(
            request.exchange_id,
            request.caller,
            ExchangeStatus::Pending,
        ))
    }

    async fn list(&self, request: ListExchangesRequest) -> Result<Vec<ExchangePayload>, Error> {
        Ok(vec![fixture_exchange_payload(
            Uuid::from_u128(0x0201),
            request.caller,
            ExchangeStatus::Pending,
        )])
    }
}
