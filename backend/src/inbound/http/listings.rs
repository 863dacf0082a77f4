//! Listing HTTP handlers.
//!
//! ```text
//! POST /api/listings
//! GET  /api/listings
//! GET  /api/listings/{id}
//! PUT  /api/listings/{id}
//! POST /api/listings/{id}/close
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    CloseListingRequest, CreateListingRequest, DEFAULT_LISTING_PAGE_SIZE, GetListingRequest,
    ListListingsRequest, ListingFilter, ListingPayload, UpdateListingRequest,
};
use crate::domain::{Error, ListingKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{BearerToken, authenticate};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

/// Request payload for publishing a listing.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequestBody {
    pub title: String,
    pub description: String,
    pub category: String,
    #[schema(example = "intercambio")]
    pub kind: String,
    pub price_cents: Option<i64>,
}

/// Request payload for editing a listing.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingRequestBody {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price_cents: Option<i64>,
}

/// Query parameters for browsing listings.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListListingsQuery {
    pub kind: Option<String>,
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Listing representation returned by every listing endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[schema(example = "intercambio")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_cents: Option<i64>,
    #[schema(example = "disponible")]
    pub status: String,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<ListingPayload> for ListingResponseBody {
    fn from(payload: ListingPayload) -> Self {
        Self {
            id: payload.id.to_string(),
            owner_id: payload.owner_id.to_string(),
            title: payload.title,
            description: payload.description,
            category: payload.category,
            kind: payload.kind.to_string(),
            price_cents: payload.price_cents,
            status: payload.status.to_string(),
            created_at: payload.created_at.to_rfc3339(),
            updated_at: payload.updated_at.to_rfc3339(),
        }
    }
}

fn parse_kind(raw: &str) -> Result<ListingKind, Error> {
    raw.parse::<ListingKind>().map_err(|_| {
        Error::invalid_request("kind must be intercambio, venta or donacion").with_details(json!({
            "field": "kind",
            "value": raw,
            "code": "invalid_kind",
        }))
    })
}

fn filter_from_query(query: ListListingsQuery) -> Result<ListingFilter, Error> {
    let kind = query.kind.as_deref().map(parse_kind).transpose()?;
    Ok(ListingFilter {
        kind,
        category: query.category.filter(|value| !value.trim().is_empty()),
        limit: query
            .limit
            .unwrap_or(DEFAULT_LISTING_PAGE_SIZE)
            .clamp(1, 100),
        offset: query.offset.unwrap_or(0).max(0),
    })
}

/// Publish a new listing owned by the caller.
#[utoipa::path(
    post,
    path = "/api/listings",
    request_body = CreateListingRequestBody,
    responses(
        (status = 201, description = "Listing published", body = ListingResponseBody),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorized", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "createListing",
    security(("BearerToken" = []))
)]
#[post("/listings")]
pub async fn create_listing(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<CreateListingRequestBody>,
) -> ApiResult<HttpResponse> {
    let caller = authenticate(&state, &token).await?;
    let body = payload.into_inner();
    let kind = parse_kind(&body.kind)?;

    let created = state
        .listings
        .create(CreateListingRequest {
            caller,
            title: body.title,
            description: body.description,
            category: body.category,
            kind,
            price_cents: body.price_cents,
        })
        .await?;

    Ok(HttpResponse::Created().json(ListingResponseBody::from(created)))
}

/// Browse available listings.
#[utoipa::path(
    get,
    path = "/api/listings",
    params(ListListingsQuery),
    responses(
        (status = 200, description = "Available listings", body = [ListingResponseBody]),
        (status = 401, description = "Unauthorized", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "listListings",
    security(("BearerToken" = []))
)]
#[get("/listings")]
pub async fn list_listings(
    state: web::Data<HttpState>,
    token: BearerToken,
    query: web::Query<ListListingsQuery>,
) -> ApiResult<web::Json<Vec<ListingResponseBody>>> {
    authenticate(&state, &token).await?;
    let filter = filter_from_query(query.into_inner())?;

    let listings = state
        .listings_query
        .list(ListListingsRequest { filter })
        .await?;

    Ok(web::Json(
        listings.into_iter().map(ListingResponseBody::from).collect(),
    ))
}

/// Fetch one listing.
#[utoipa::path(
    get,
    path = "/api/listings/{id}",
    params(("id" = String, Path, description = "Resource identifier (UUID)")),
    responses(
        (status = 200, description = "Listing found", body = ListingResponseBody),
        (status = 404, description = "Unknown listing", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "getListing",
    security(("BearerToken" = []))
)]
#[get("/listings/{id}")]
pub async fn get_listing(
    state: web::Data<HttpState>,
    token: BearerToken,
    path: web::Path<String>,
) -> ApiResult<web::Json<ListingResponseBody>> {
    authenticate(&state, &token).await?;
    let listing_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;

    let listing = state
        .listings_query
        .get(GetListingRequest { listing_id })
        .await?;

    Ok(web::Json(ListingResponseBody::from(listing)))
}

/// Edit a listing; owner-only, and only while `disponible`.
#[utoipa::path(
    put,
    path = "/api/listings/{id}",
    params(("id" = String, Path, description = "Resource identifier (UUID)")),
    request_body = UpdateListingRequestBody,
    responses(
        (status = 200, description = "Listing updated", body = ListingResponseBody),
        (status = 400, description = "Invalid request or status", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Caller is not the owner", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Unknown listing", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "updateListing",
    security(("BearerToken" = []))
)]
#[put("/listings/{id}")]
pub async fn update_listing(
    state: web::Data<HttpState>,
    token: BearerToken,
    path: web::Path<String>,
    payload: web::Json<UpdateListingRequestBody>,
) -> ApiResult<web::Json<ListingResponseBody>> {
    let caller = authenticate(&state, &token).await?;
    let listing_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let body = payload.into_inner();

    let updated = state
        .listings
        .update(UpdateListingRequest {
            caller,
            listing_id,
            title: body.title,
            description: body.description,
            category: body.category,
            price_cents: body.price_cents,
        })
        .await?;

    Ok(web::Json(ListingResponseBody::from(updated)))
}

/// Close a listing; owner-only.
#[utoipa::path(
    post,
    path = "/api/listings/{id}/close",
    params(("id" = String, Path, description = "Resource identifier (UUID)")),
    responses(
        (status = 200, description = "Listing closed", body = ListingResponseBody),
        (status = 400, description = "Already closed", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Caller is not the owner", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "closeListing",
    security(("BearerToken" = []))
)]
#[post("/listings/{id}/close")]
pub async fn close_listing(
    state: web::Data<HttpState>,
    token: BearerToken,
    path: web::Path<String>,
) -> ApiResult<web::Json<ListingResponseBody>> {
    let caller = authenticate(&state, &token).await?;
    let listing_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;

    let closed = state
        .listings
        .close(CloseListingRequest { caller, listing_id })
        .await?;

    Ok(web::Json(ListingResponseBody::from(closed)))
}

#[cfg(test)]
#[path = "listings_tests.rs"]
mod tests;
