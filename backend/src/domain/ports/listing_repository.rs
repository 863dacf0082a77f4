//! Port for listing persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Listing, ListingKind, ListingStatus};

/// Default page size for listing queries.
pub const DEFAULT_LISTING_PAGE_SIZE: i64 = 50;

/// Errors raised by listing repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingRepositoryError {
    /// Repository connection could not be established.
    #[error("listing repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("listing repository query failed: {message}")]
    Query { message: String },
}

impl ListingRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Filter and paging for available-listing queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFilter {
    pub kind: Option<ListingKind>,
    pub category: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for ListingFilter {
    fn default() -> Self {
        Self {
            kind: None,
            category: None,
            limit: DEFAULT_LISTING_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// Editable listing fields; kind and owner are immutable after publication.
#[derive(Debug, Clone)]
pub struct ListingUpdate {
    pub listing_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price_cents: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

/// A guarded listing status change (compare-and-swap).
#[derive(Debug, Clone)]
pub struct ListingStatusTransition {
    pub listing_id: Uuid,
    pub expected: Vec<ListingStatus>,
    pub next: ListingStatus,
    pub updated_at: DateTime<Utc>,
}

/// Port for writing and reading listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Persist a freshly published listing.
    async fn insert(&self, listing: &Listing) -> Result<(), ListingRepositoryError>;

    /// Find a listing by id.
    async fn find_by_id(
        &self,
        listing_id: &Uuid,
    ) -> Result<Option<Listing>, ListingRepositoryError>;

    /// Available listings matching the filter, newest first.
    async fn list_available(
        &self,
        filter: &ListingFilter,
    ) -> Result<Vec<Listing>, ListingRepositoryError>;

    /// Update editable fields. Returns `false` when no row matched.
    async fn update(&self, update: &ListingUpdate) -> Result<bool, ListingRepositoryError>;

    /// Apply a compare-and-swap status transition. Returns `false` when the
    /// guard missed.
    async fn transition_status(
        &self,
        transition: &ListingStatusTransition,
    ) -> Result<bool, ListingRepositoryError>;
}

/// Fixture implementation for tests that do not exercise listing persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureListingRepository;

#[async_trait]
impl ListingRepository for FixtureListingRepository {
    async fn insert(&self, _listing: &Listing) -> Result<(), ListingRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _listing_id: &Uuid,
    ) -> Result<Option<Listing>, ListingRepositoryError> {
        Ok(None)
    }

    async fn list_available(
        &self,
        _filter: &ListingFilter,
    ) -> Result<Vec<Listing>, ListingRepositoryError> {
        Ok(Vec::new())
    }

    async fn update(&self, _update: &ListingUpdate) -> Result<bool, ListingRepositoryError> {
        Ok(true)
    }

    async fn transition_status(
        &self,
        _transition: &ListingStatusTransition,
    ) -> Result<bool, ListingRepositoryError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn default_filter_uses_default_page_size() {
        let filter = ListingFilter::default();
        assert_eq!(filter.limit, DEFAULT_LISTING_PAGE_SIZE);
        assert_eq!(filter.offset, 0);
        assert!(filter.kind.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_list_returns_empty() {
        let listed = FixtureListingRepository
            .list_available(&ListingFilter::default())
            .await
            .expect("fixture list succeeds");
        assert!(listed.is_empty());
    }
}
