//! Driving ports for exchange lifecycle mutations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Error, ExchangeStatus, UserId};

use super::exchange_query::{ExchangePayload, MeetingPayload, fixture_exchange_payload};

/// Request to propose an exchange against a listing.
#[derive(Debug, Clone)]
pub struct ProposeExchangeRequest {
    pub caller: UserId,
    pub listing_id: Uuid,
    pub message: Option<String>,
}

/// Request to accept a pending exchange with meeting arrangements.
#[derive(Debug, Clone)]
pub struct AcceptExchangeRequest {
    pub caller: UserId,
    pub exchange_id: Uuid,
    pub location: String,
    pub meeting_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Request to reject a pending exchange.
#[derive(Debug, Clone)]
pub struct RejectExchangeRequest {
    pub caller: UserId,
    pub exchange_id: Uuid,
    pub reason: String,
}

/// Request to start an accepted exchange.
#[derive(Debug, Clone)]
pub struct StartExchangeRequest {
    pub caller: UserId,
    pub exchange_id: Uuid,
}

/// Request to cancel an exchange.
#[derive(Debug, Clone)]
pub struct CancelExchangeRequest {
    pub caller: UserId,
    pub exchange_id: Uuid,
}

/// Driving port for the exchange lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeCommand: Send + Sync {
    /// Propose an exchange against another user's available listing.
    async fn propose(&self, request: ProposeExchangeRequest) -> Result<ExchangePayload, Error>;

    /// Accept a pending proposal; receiver-only.
    async fn accept(&self, request: AcceptExchangeRequest) -> Result<ExchangePayload, Error>;

    /// Reject a pending proposal; receiver-only.
    async fn reject(&self, request: RejectExchangeRequest) -> Result<ExchangePayload, Error>;

    /// Move an accepted exchange into progress; participant-only.
    async fn start(&self, request: StartExchangeRequest) -> Result<ExchangePayload, Error>;

    /// Cancel a not-yet-finished exchange; participant-only.
    async fn cancel(&self, request: CancelExchangeRequest) -> Result<ExchangePayload, Error>;
}

/// Fixture implementation walking the happy-path state machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureExchangeCommand;

#[async_trait]
impl ExchangeCommand for FixtureExchangeCommand {
    async fn propose(&self, request: ProposeExchangeRequest) -> Result<ExchangePayload, Error> {
        let mut payload = fixture_exchange_payload(
            Uuid::from_u128(0x0201),
            request.caller,
            ExchangeStatus::Pending,
        );
        payload.listing_id = request.listing_id;
        payload.message = request.message;
        Ok(payload)
    }

    async fn accept(&self, request: AcceptExchangeRequest) -> Result<ExchangePayload, Error> {
        let mut payload = fixture_exchange_payload(
            request.exchange_id,
            UserId::from_uuid(Uuid::from_u128(0x0003)),
            ExchangeStatus::Accepted,
        );
        payload.receiver_id = request.caller;
        payload.meeting = Some(MeetingPayload {
            location: request.location,
            meeting_at: request.meeting_at,
            notes: request.notes,
        });
        Ok(payload)
    }

    async fn reject(&self, request: RejectExchangeRequest) -> Result<ExchangePayload, Error> {
        let mut payload = fixture_exchange_payload(
            request.exchange_id,
            UserId::from_uuid(Uuid::from_u128(0x0003)),
            ExchangeStatus::Rejected,
        );
        payload.receiver_id = request.caller;
        payload.reject_reason = Some(request.reason);
        Ok(payload)
    }

    async fn start(&self, request: StartExchangeRequest) -> Result<ExchangePayload, Error> {
        Ok(fixture_exchange_payload(
            request.exchange_id,
            request.caller,
            ExchangeStatus::InProgress,
        ))
    }

    async fn cancel(&self, request: CancelExchangeRequest) -> Result<ExchangePayload, Error> {
        Ok(fixture_exchange_payload(
            request.exchange_id,
            request.caller,
            ExchangeStatus::Cancelled,
        ))
    }
}
