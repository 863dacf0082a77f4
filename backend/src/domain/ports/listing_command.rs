//! Driving ports for listing mutations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, ListingKind, ListingStatus, UserId};

use super::listing_query::{ListingPayload, fixture_listing_payload};

/// Request to publish a listing.
#[derive(Debug, Clone)]
pub struct CreateListingRequest {
    pub caller: UserId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub kind: ListingKind,
    pub price_cents: Option<i64>,
}

/// Request to edit a listing's fields; kind and owner stay immutable.
#[derive(Debug, Clone)]
pub struct UpdateListingRequest {
    pub caller: UserId,
    pub listing_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price_cents: Option<i64>,
}

/// Request to close a listing.
#[derive(Debug, Clone)]
pub struct CloseListingRequest {
    pub caller: UserId,
    pub listing_id: Uuid,
}

/// Driving port for listing mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingCommand: Send + Sync {
    /// Publish a new listing owned by the caller.
    async fn create(&self, request: CreateListingRequest) -> Result<ListingPayload, Error>;

    /// Edit a listing; owner-only and `disponible`-only.
    async fn update(&self, request: UpdateListingRequest) -> Result<ListingPayload, Error>;

    /// Close a listing; owner-only.
    async fn close(&self, request: CloseListingRequest) -> Result<ListingPayload, Error>;
}

/// Fixture implementation echoing the request into a canned payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureListingCommand;

#[async_trait]
impl ListingCommand for FixtureListingCommand {
    async fn create(&self, request: CreateListingRequest) -> Result<ListingPayload, Error> {
        let mut payload = fixture_listing_payload(Uuid::from_u128(0x0101));
        payload.owner_id = request.caller;
        payload.title = request.title;
        payload.description = request.description;
        payload.category = request.category;
        payload.kind = request.kind;
        payload.price_cents = request.price_cents;
        Ok(payload)
    }

    async fn update(&self, request: UpdateListingRequest) -> Result<ListingPayload, Error> {
        let mut payload = fixture_listing_payload(request.listing_id);
        payload.owner_id = request.caller;
        payload.title = request.title;
        payload.description = request.description;
        payload.category = request.category;
        payload.price_cents = request.price_cents;
        Ok(payload)
    }

    async fn close(&self, request: CloseListingRequest) -> Result<ListingPayload, Error> {
        let mut payload = fixture_listing_payload(request.listing_id);
        payload.owner_id = request.caller;
        payload.status = ListingStatus::Closed;
        Ok(payload)
    }
}
