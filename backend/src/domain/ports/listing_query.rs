//! Driving ports for listing reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Error, Listing, ListingKind, ListingStatus, UserId};

use super::ListingFilter;

/// Transport-neutral projection of a [`Listing`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPayload {
    pub id: Uuid,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub kind: ListingKind,
    pub price_cents: Option<i64>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Listing> for ListingPayload {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id(),
            owner_id: *listing.owner_id(),
            title: listing.title().to_owned(),
            description: listing.description().to_owned(),
            category: listing.category().to_owned(),
            kind: listing.kind(),
            price_cents: listing.price_cents(),
            status: listing.status(),
            created_at: listing.created_at(),
            updated_at: listing.updated_at(),
        }
    }
}

/// Request to read a single listing.
#[derive(Debug, Clone)]
pub struct GetListingRequest {
    pub listing_id: Uuid,
}

/// Request to browse available listings.
#[derive(Debug, Clone, Default)]
pub struct ListListingsRequest {
    pub filter: ListingFilter,
}

/// Driving port for listing reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingQuery: Send + Sync {
    /// Fetch one listing.
    async fn get(&self, request: GetListingRequest) -> Result<ListingPayload, Error>;

    /// Browse available listings.
    async fn list(&self, request: ListListingsRequest) -> Result<Vec<ListingPayload>, Error>;
}

/// Fixture implementation returning a canned listing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureListingQuery;

pub(crate) fn fixture_listing_payload(listing_id: Uuid) -> ListingPayload {
    ListingPayload {
        id: listing_id,
        owner_id: UserId::from_uuid(Uuid::from_u128(0x0002)),
        title: "Bicicleta de montana".to_owned(),
        description: "Usada, buen estado".to_owned(),
        category: "deportes".to_owned(),
        kind: ListingKind::Exchange,
        price_cents: None,
        status: ListingStatus::Available,
        created_at: DateTime::<Utc>::UNIX_EPOCH,
        updated_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

#[async_trait]
impl ListingQuery for FixtureListingQuery {
    async fn get(&self, request: GetListingRequest) -> Result<ListingPayload, Error> {
        Ok(fixture_listing_payload(request.listing_id))
    }

    async fn list(&self, _request: ListListingsRequest) -> Result<Vec<ListingPayload>, Error> {
        Ok(vec![fixture_listing_payload(Uuid::from_u128(0x0101))])
    }
}
