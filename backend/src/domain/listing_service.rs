//! Listing domain service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::ports::{
    CloseListingRequest, CreateListingRequest, GetListingRequest, ListListingsRequest,
    ListingCommand, ListingPayload, ListingQuery, ListingRepository, ListingRepositoryError,
    ListingStatusTransition, ListingUpdate, UpdateListingRequest,
};
use crate::domain::{Error, Listing, ListingDraft, ListingStatus};

fn map_repository_error(error: ListingRepositoryError) -> Error {
    match error {
        ListingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("listing repository unavailable: {message}"))
        }
        ListingRepositoryError::Query { message } => {
            Error::internal(format!("listing repository error: {message}"))
        }
    }
}

/// Listing service implementing the listing driving ports.
#[derive(Clone)]
pub struct ListingService<L> {
    listings: Arc<L>,
}

impl<L> ListingService<L> {
    /// Create a new service with the listing repository.
    pub fn new(listings: Arc<L>) -> Self {
        Self { listings }
    }
}

impl<L> ListingService<L>
where
    L: ListingRepository,
{
    async fn load_listing(&self, listing_id: &Uuid) -> Result<Listing, Error> {
        self.listings
            .find_by_id(listing_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("listing {listing_id} not found")))
    }
}

#[async_trait]
impl<L> ListingCommand for ListingService<L>
where
    L: ListingRepository,
{
    async fn create(&self, request: CreateListingRequest) -> Result<ListingPayload, Error> {
        let now = Utc::now();
        let listing = Listing::new(ListingDraft {
            id: Uuid::new_v4(),
            owner_id: request.caller,
            title: request.title,
            description: request.description,
            category: request.category,
            kind: request.kind,
            price_cents: request.price_cents,
            status: ListingStatus::Available,
            created_at: now,
            updated_at: now,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.listings
            .insert(&listing)
            .await
            .map_err(map_repository_error)?;

        Ok(ListingPayload::from(listing))
    }

    async fn update(&self, request: UpdateListingRequest) -> Result<ListingPayload, Error> {
        let listing = self.load_listing(&request.listing_id).await?;
        if listing.owner_id() != &request.caller {
            return Err(Error::forbidden("only the owner may edit a listing"));
        }
        if listing.status() != ListingStatus::Available {
            return Err(Error::invalid_state(format!(
                "listing in status {} cannot be edited",
                listing.status()
            )));
        }

        let now = Utc::now();
        let updated = Listing::new(ListingDraft {
            id: listing.id(),
            owner_id: *listing.owner_id(),
            title: request.title,
            description: request.description,
            category: request.category,
            kind: listing.kind(),
            price_cents: request.price_cents,
            status: listing.status(),
            created_at: listing.created_at(),
            updated_at: now,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        let matched = self
            .listings
            .update(&ListingUpdate {
                listing_id: updated.id(),
                title: updated.title().to_owned(),
                description: updated.description().to_owned(),
                category: updated.category().to_owned(),
                price_cents: updated.price_cents(),
                updated_at: now,
            })
            .await
            .map_err(map_repository_error)?;
        if !matched {
            return Err(Error::not_found(format!(
                "listing {} not found",
                updated.id()
            )));
        }

        Ok(ListingPayload::from(updated))
    }

    async fn close(&self, request: CloseListingRequest) -> Result<ListingPayload, Error> {
        let listing = self.load_listing(&request.listing_id).await?;
        if listing.owner_id() != &request.caller {
            return Err(Error::forbidden("only the owner may close a listing"));
        }

        let transition = ListingStatusTransition {
            listing_id: listing.id(),
            expected: vec![ListingStatus::Available, ListingStatus::Reserved],
            next: ListingStatus::Closed,
            updated_at: Utc::now(),
        };
        let swapped = self
            .listings
            .transition_status(&transition)
            .await
            .map_err(map_repository_error)?;
        if !swapped {
            return Err(Error::invalid_state("listing is already closed"));
        }

        self.load_listing(&request.listing_id)
            .await
            .map(ListingPayload::from)
    }
}

#[async_trait]
impl<L> ListingQuery for ListingService<L>
where
    L: ListingRepository,
{
    async fn get(&self, request: GetListingRequest) -> Result<ListingPayload, Error> {
        self.load_listing(&request.listing_id)
            .await
            .map(ListingPayload::from)
    }

    async fn list(&self, request: ListListingsRequest) -> Result<Vec<ListingPayload>, Error> {
        let listings = self
            .listings
            .list_available(&request.filter)
            .await
            .map_err(map_repository_error)?;
        Ok(listings.into_iter().map(ListingPayload::from).collect())
    }
}

#[cfg(test)]
#[path = "listing_service_tests.rs"]
mod tests;
