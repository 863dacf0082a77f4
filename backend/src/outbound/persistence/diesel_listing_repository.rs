//! PostgreSQL-backed `ListingRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{
    ListingFilter, ListingRepository, ListingRepositoryError, ListingStatusTransition,
    ListingUpdate,
};
use crate::domain::{Listing, ListingDraft, ListingStatus, UserId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ListingRow, ListingUpdateChangeset, NewListingRow};
use super::pool::{DbPool, PoolError};
use super::schema::listings;

/// Diesel-backed implementation of the listing repository port.
#[derive(Clone)]
pub struct DieselListingRepository {
    pool: DbPool,
}

impl DieselListingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ListingRepositoryError {
    map_basic_pool_error(error, ListingRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ListingRepositoryError {
    map_basic_diesel_error(
        error,
        ListingRepositoryError::query,
        ListingRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain listing.
fn row_to_listing(row: ListingRow) -> Result<Listing, ListingRepositoryError> {
    let ListingRow {
        id,
        owner_id,
        title,
        description,
        category,
        kind,
        price_cents,
        status,
        created_at,
        updated_at,
    } = row;

    let kind = kind
        .parse()
        .map_err(|err: crate::domain::ParseListingKindError| {
            ListingRepositoryError::query(err.to_string())
        })?;
    let status = status
        .parse()
        .map_err(|err: crate::domain::ParseListingStatusError| {
            ListingRepositoryError::query(err.to_string())
        })?;

    Listing::new(ListingDraft {
        id,
        owner_id: UserId::from_uuid(owner_id),
        title,
        description,
        category,
        kind,
        price_cents,
        status,
        created_at,
        updated_at,
    })
    .map_err(|err| ListingRepositoryError::query(err.to_string()))
}

#[async_trait]
impl ListingRepository for DieselListingRepository {
    async fn insert(&self, listing: &Listing) -> Result<(), ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewListingRow {
            id: listing.id(),
            owner_id: *listing.owner_id().as_uuid(),
            title: listing.title(),
            description: listing.description(),
            category: listing.category(),
            kind: listing.kind().as_str(),
            price_cents: listing.price_cents(),
            status: listing.status().as_str(),
            created_at: listing.created_at(),
            updated_at: listing.updated_at(),
        };

        diesel::insert_into(listings::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        listing_id: &Uuid,
    ) -> Result<Option<Listing>, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = listings::table
            .filter(listings::id.eq(listing_id))
            .select(ListingRow::as_select())
            .first::<ListingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_listing).transpose()
    }

    async fn list_available(
        &self,
        filter: &ListingFilter,
    ) -> Result<Vec<Listing>, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = listings::table
            .select(ListingRow::as_select())
            .filter(listings::status.eq(ListingStatus::Available.as_str()))
            .into_boxed();
        if let Some(kind) = filter.kind {
            query = query.filter(listings::kind.eq(kind.as_str()));
        }
        if let Some(category) = &filter.category {
            query = query.filter(listings::category.eq(category.clone()));
        }

        let rows: Vec<ListingRow> = query
            .order((listings::created_at.desc(), listings::id.desc()))
            .limit(filter.limit)
            .offset(filter.offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_listing).collect()
    }

    async fn update(&self, update: &ListingUpdate) -> Result<bool, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = ListingUpdateChangeset {
            title: &update.title,
            description: &update.description,
            category: &update.category,
            price_cents: update.price_cents,
            updated_at: update.updated_at,
        };

        let rows = diesel::update(listings::table.filter(listings::id.eq(update.listing_id)))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows > 0)
    }

    async fn transition_status(
        &self,
        transition: &ListingStatusTransition,
    ) -> Result<bool, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let expected: Vec<&'static str> = transition
            .expected
            .iter()
            .map(|status| status.as_str())
            .collect();

        let rows = diesel::update(
            listings::table.filter(
                listings::id
                    .eq(transition.listing_id)
                    .and(listings::status.eq_any(expected)),
            ),
        )
        .set((
            listings::status.eq(transition.next.as_str()),
            listings::updated_at.eq(transition.updated_at),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion edge cases.

    use chrono::Utc;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn valid_row() -> ListingRow {
        let now = Utc::now();
        ListingRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Bicicleta de montana".to_owned(),
            description: "Usada, buen estado".to_owned(),
            category: "deportes".to_owned(),
            kind: "intercambio".to_owned(),
            price_cents: None,
            status: "disponible".to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(repo_err, ListingRepositoryError::Connection { .. }));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn row_conversion_accepts_canonical_tokens(valid_row: ListingRow) {
        let listing = row_to_listing(valid_row).expect("valid row");
        assert_eq!(listing.status(), ListingStatus::Available);
    }

    #[rstest]
    fn row_conversion_rejects_unknown_status_tokens(mut valid_row: ListingRow) {
        valid_row.status = "pausado".to_owned();
        let error = row_to_listing(valid_row).expect_err("unknown status");
        assert!(matches!(error, ListingRepositoryError::Query { .. }));
    }

    #[rstest]
    fn row_conversion_rejects_violated_price_invariants(mut valid_row: ListingRow) {
        valid_row.kind = "donacion".to_owned();
        valid_row.price_cents = Some(100);
        let error = row_to_listing(valid_row).expect_err("priced donation");
        assert!(matches!(error, ListingRepositoryError::Query { .. }));
    }
}
