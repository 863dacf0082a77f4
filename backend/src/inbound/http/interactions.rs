//! Exchange interaction HTTP handlers.
//!
//! ```text
//! POST /api/interactions
//! GET  /api/interactions
//! GET  /api/interactions/{id}
//! POST /api/interactions/{id}/accept
//! POST /api/interactions/{id}/reject
//! POST /api/interactions/{id}/start
//! POST /api/interactions/{id}/cancel
//! POST /api/interactions/{id}/complete
//! POST /api/interactions/{id}/rate
//! ```
//!
//! Status values and the `exito`/`puntuacion`/`comentario`/`calificado_id`/
//! `fecha_completado` fields use the marketplace's Spanish wire vocabulary.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ValidationOutcome;
use crate::domain::ports::{
    AcceptExchangeRequest, CancelExchangeRequest, ExchangePayload, GetExchangeRequest,
    ListExchangesRequest, MeetingPayload, ProposeExchangeRequest, RateExchangeRequest,
    RatingPayload, RejectExchangeRequest, StartExchangeRequest, SubmitValidationRequest,
    SubmitValidationResponse,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{BearerToken, authenticate};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_meeting_timestamp, parse_user_id, parse_uuid,
};

/// Request payload for proposing an exchange.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposeExchangeRequestBody {
    #[schema(format = "uuid")]
    pub listing_id: String,
    pub message: Option<String>,
}

/// Request payload for accepting an exchange with meeting arrangements.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcceptExchangeRequestBody {
    pub location: String,
    #[schema(example = "2026-03-14")]
    pub date: String,
    #[schema(example = "16:30")]
    pub time: String,
    pub notes: Option<String>,
}

/// Request payload for rejecting an exchange.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RejectExchangeRequestBody {
    pub reason: String,
}

/// Request payload for submitting a validation verdict.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CompleteExchangeRequestBody {
    /// Success verdict.
    pub exito: bool,
    /// Optional 1–5 score.
    pub puntuacion: Option<i16>,
    /// Optional comment.
    pub comentario: Option<String>,
}

/// Request payload for rating the counterparty.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RateExchangeRequestBody {
    /// The counterparty being rated.
    #[schema(format = "uuid")]
    pub calificado_id: String,
    /// Score between 1 and 5.
    pub puntuacion: i16,
    /// Optional comment.
    pub comentario: Option<String>,
}

/// Meeting arrangements echoed back after accept.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingResponseBody {
    pub location: String,
    #[schema(format = "date-time")]
    pub meeting_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<MeetingPayload> for MeetingResponseBody {
    fn from(payload: MeetingPayload) -> Self {
        Self {
            location: payload.location,
            meeting_at: payload.meeting_at.to_rfc3339(),
            notes: payload.notes,
        }
    }
}

/// Exchange representation returned by every interaction endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub listing_id: String,
    #[schema(format = "uuid")]
    pub proposer_id: String,
    #[schema(format = "uuid")]
    pub receiver_id: String,
    #[schema(example = "pendiente")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting: Option<MeetingResponseBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,
    #[serde(rename = "fecha_completado", skip_serializing_if = "Option::is_none")]
    #[schema(format = "date-time")]
    pub completed_at: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<ExchangePayload> for ExchangeResponseBody {
    fn from(payload: ExchangePayload) -> Self {
        Self {
            id: payload.id.to_string(),
            listing_id: payload.listing_id.to_string(),
            proposer_id: payload.proposer_id.to_string(),
            receiver_id: payload.receiver_id.to_string(),
            status: payload.status.to_string(),
            message: payload.message,
            meeting: payload.meeting.map(MeetingResponseBody::from),
            reject_reason: payload.reject_reason,
            completed_at: payload.completed_at.map(|at| at.to_rfc3339()),
            created_at: payload.created_at.to_rfc3339(),
            updated_at: payload.updated_at.to_rfc3339(),
        }
    }
}

/// Resolution reported after a validation submission.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResolutionResponseBody {
    #[schema(example = "esperando_validacion")]
    pub outcome: String,
    #[schema(example = "pendiente_validacion")]
    pub status: String,
    #[serde(rename = "fecha_completado", skip_serializing_if = "Option::is_none")]
    #[schema(format = "date-time")]
    pub completed_at: Option<String>,
    pub validations_recorded: usize,
}

fn outcome_token(outcome: ValidationOutcome) -> &'static str {
    match outcome {
        ValidationOutcome::AwaitingSecond => "esperando_validacion",
        ValidationOutcome::Completed => "completado",
        ValidationOutcome::Failed => "fallido",
        ValidationOutcome::Disputed => "en_disputa",
    }
}

impl From<SubmitValidationResponse> for ValidationResolutionResponseBody {
    fn from(response: SubmitValidationResponse) -> Self {
        Self {
            outcome: outcome_token(response.outcome).to_owned(),
            status: response.status.to_string(),
            completed_at: response.completed_at.map(|at| at.to_rfc3339()),
            validations_recorded: response.validations_recorded,
        }
    }
}

/// Rating representation returned after rating the counterparty.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub exchange_id: String,
    #[schema(format = "uuid")]
    pub rater_id: String,
    #[serde(rename = "calificado_id")]
    #[schema(format = "uuid")]
    pub rated_id: String,
    pub puntuacion: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comentario: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<RatingPayload> for RatingResponseBody {
    fn from(payload: RatingPayload) -> Self {
        Self {
            id: payload.id.to_string(),
            exchange_id: payload.exchange_id.to_string(),
            rater_id: payload.rater_id.to_string(),
            rated_id: payload.rated_id.to_string(),
            puntuacion: payload.score,
            comentario: payload.comment,
            created_at: payload.created_at.to_rfc3339(),
        }
    }
}

/// Propose an exchange against another user's listing.
#[utoipa::path(
    post,
    path = "/api/interactions",
    request_body = ProposeExchangeRequestBody,
    responses(
        (status = 201, description = "Exchange proposed", body = ExchangeResponseBody),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Unknown listing", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["interactions"],
    operation_id = "proposeExchange",
    security(("BearerToken" = []))
)]
#[post("/interactions")]
pub async fn propose_exchange(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<ProposeExchangeRequestBody>,
) -> ApiResult<HttpResponse> {
    let caller = authenticate(&state, &token).await?;
    let body = payload.into_inner();
    let listing_id = parse_uuid(body.listing_id, FieldName::new("listingId"))?;

    let exchange = state
        .exchanges
        .propose(ProposeExchangeRequest {
            caller,
            listing_id,
            message: body.message,
        })
        .await?;

    Ok(HttpResponse::Created().json(ExchangeResponseBody::from(exchange)))
}

/// List the caller's exchanges.
#[utoipa::path(
    get,
    path = "/api/interactions",
    responses(
        (status = 200, description = "Caller's exchanges", body = [ExchangeResponseBody]),
        (status = 401, description = "Unauthorized", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["interactions"],
    operation_id = "listExchanges",
    security(("BearerToken" = []))
)]
#[get("/interactions")]
pub async fn list_exchanges(
    state: web::Data<HttpState>,
    token: BearerToken,
) -> ApiResult<web::Json<Vec<ExchangeResponseBody>>> {
    let caller = authenticate(&state, &token).await?;

    let exchanges = state
        .exchanges_query
        .list(ListExchangesRequest { caller })
        .await?;

    Ok(web::Json(
        exchanges
            .into_iter()
            .map(ExchangeResponseBody::from)
            .collect(),
    ))
}

/// Fetch one exchange; participant-only.
#[utoipa::path(
    get,
    path = "/api/interactions/{id}",
    params(("id" = String, Path, description = "Resource identifier (UUID)")),
    responses(
        (status = 200, description = "Exchange found", body = ExchangeResponseBody),
        (status = 403, description = "Caller is not a participant", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Unknown exchange", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["interactions"],
    operation_id = "getExchange",
    security(("BearerToken" = []))
)]
#[get("/interactions/{id}")]
pub async fn get_exchange(
    state: web::Data<HttpState>,
    token: BearerToken,
    path: web::Path<String>,
) -> ApiResult<web::Json<ExchangeResponseBody>> {
    let caller = authenticate(&state, &token).await?;
    let exchange_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;

    let exchange = state
        .exchanges_query
        .get(GetExchangeRequest {
            caller,
            exchange_id,
        })
        .await?;

    Ok(web::Json(ExchangeResponseBody::from(exchange)))
}

/// Accept a pending exchange with meeting arrangements; receiver-only.
#[utoipa::path(
    post,
    path = "/api/interactions/{id}/accept",
    params(("id" = String, Path, description = "Resource identifier (UUID)")),
    request_body = AcceptExchangeRequestBody,
    responses(
        (status = 201, description = "Exchange accepted", body = ExchangeResponseBody),
        (status = 400, description = "Invalid request or status", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Caller is not the receiver", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["interactions"],
    operation_id = "acceptExchange",
    security(("BearerToken" = []))
)]
#[post("/interactions/{id}/accept")]
pub async fn accept_exchange(
    state: web::Data<HttpState>,
    token: BearerToken,
    path: web::Path<String>,
    payload: web::Json<AcceptExchangeRequestBody>,
) -> ApiResult<HttpResponse> {
    let caller = authenticate(&state, &token).await?;
    let exchange_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let body = payload.into_inner();
    let meeting_at = parse_meeting_timestamp(body.date, body.time)?;

    let exchange = state
        .exchanges
        .accept(AcceptExchangeRequest {
            caller,
            exchange_id,
            location: body.location,
            meeting_at,
            notes: body.notes,
        })
        .await?;

    Ok(HttpResponse::Created().json(ExchangeResponseBody::from(exchange)))
}

/// Reject a pending exchange; receiver-only.
#[utoipa::path(
    post,
    path = "/api/interactions/{id}/reject",
    params(("id" = String, Path, description = "Resource identifier (UUID)")),
    request_body = RejectExchangeRequestBody,
    responses(
        (status = 200, description = "Exchange rejected", body = ExchangeResponseBody),
        (status = 400, description = "Invalid request or status", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Caller is not the receiver", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["interactions"],
    operation_id = "rejectExchange",
    security(("BearerToken" = []))
)]
#[post("/interactions/{id}/reject")]
pub async fn reject_exchange(
    state: web::Data<HttpState>,
    token: BearerToken,
    path: web::Path<String>,
    payload: web::Json<RejectExchangeRequestBody>,
) -> ApiResult<web::Json<ExchangeResponseBody>> {
    let caller = authenticate(&state, &token).await?;
    let exchange_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;

    let exchange = state
        .exchanges
        .reject(RejectExchangeRequest {
            caller,
            exchange_id,
            reason: payload.into_inner().reason,
        })
        .await?;

    Ok(web::Json(ExchangeResponseBody::from(exchange)))
}

/// Move an accepted exchange into progress; participant-only.
#[utoipa::path(
    post,
    path = "/api/interactions/{id}/start",
    params(("id" = String, Path, description = "Resource identifier (UUID)")),
    responses(
        (status = 200, description = "Exchange started", body = ExchangeResponseBody),
        (status = 400, description = "Invalid status", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Caller is not a participant", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["interactions"],
    operation_id = "startExchange",
    security(("BearerToken" = []))
)]
#[post("/interactions/{id}/start")]
pub async fn start_exchange(
    state: web::Data<HttpState>,
    token: BearerToken,
    path: web::Path<String>,
) -> ApiResult<web::Json<ExchangeResponseBody>> {
    let caller = authenticate(&state, &token).await?;
    let exchange_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;

    let exchange = state
        .exchanges
        .start(StartExchangeRequest {
            caller,
            exchange_id,
        })
        .await?;

    Ok(web::Json(ExchangeResponseBody::from(exchange)))
}

/// Cancel an exchange; participant-only.
#[utoipa::path(
    post,
    path = "/api/interactions/{id}/cancel",
    params(("id" = String, Path, description = "Resource identifier (UUID)")),
    responses(
        (status = 200, description = "Exchange cancelled", body = ExchangeResponseBody),
        (status = 400, description = "Invalid status", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Caller is not a participant", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["interactions"],
    operation_id = "cancelExchange",
    security(("BearerToken" = []))
)]
#[post("/interactions/{id}/cancel")]
pub async fn cancel_exchange(
    state: web::Data<HttpState>,
    token: BearerToken,
    path: web::Path<String>,
) -> ApiResult<web::Json<ExchangeResponseBody>> {
    let caller = authenticate(&state, &token).await?;
    let exchange_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;

    let exchange = state
        .exchanges
        .cancel(CancelExchangeRequest {
            caller,
            exchange_id,
        })
        .await?;

    Ok(web::Json(ExchangeResponseBody::from(exchange)))
}

/// Submit the caller's validation verdict for an exchange.
#[utoipa::path(
    post,
    path = "/api/interactions/{id}/complete",
    params(("id" = String, Path, description = "Resource identifier (UUID)")),
    request_body = CompleteExchangeRequestBody,
    responses(
        (status = 200, description = "Validation recorded", body = ValidationResolutionResponseBody),
        (status = 400, description = "Duplicate verdict or invalid status", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Caller is not a participant", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Unknown exchange", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["interactions"],
    operation_id = "completeExchange",
    security(("BearerToken" = []))
)]
#[post("/interactions/{id}/complete")]
pub async fn complete_exchange(
    state: web::Data<HttpState>,
    token: BearerToken,
    path: web::Path<String>,
    payload: web::Json<CompleteExchangeRequestBody>,
) -> ApiResult<web::Json<ValidationResolutionResponseBody>> {
    let caller = authenticate(&state, &token).await?;
    let exchange_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let body = payload.into_inner();

    let resolution = state
        .validations
        .submit(SubmitValidationRequest {
            caller,
            exchange_id,
            verdict: body.exito,
            rating: body.puntuacion,
            comment: body.comentario,
        })
        .await?;

    Ok(web::Json(ValidationResolutionResponseBody::from(resolution)))
}

/// Rate the counterparty of an exchange.
#[utoipa::path(
    post,
    path = "/api/interactions/{id}/rate",
    params(("id" = String, Path, description = "Resource identifier (UUID)")),
    request_body = RateExchangeRequestBody,
    responses(
        (status = 201, description = "Rating recorded", body = RatingResponseBody),
        (status = 400, description = "Invalid score or duplicate rating", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Caller is not a participant", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["interactions"],
    operation_id = "rateExchange",
    security(("BearerToken" = []))
)]
#[post("/interactions/{id}/rate")]
pub async fn rate_exchange(
    state: web::Data<HttpState>,
    token: BearerToken,
    path: web::Path<String>,
    payload: web::Json<RateExchangeRequestBody>,
) -> ApiResult<HttpResponse> {
    let caller = authenticate(&state, &token).await?;
    let exchange_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let body = payload.into_inner();
    let rated_id = parse_user_id(body.calificado_id, FieldName::new("calificado_id"))?;

    let rating = state
        .ratings
        .rate(RateExchangeRequest {
            caller,
            exchange_id,
            rated_id,
            score: body.puntuacion,
            comment: body.comentario,
        })
        .await?;

    Ok(HttpResponse::Created().json(RatingResponseBody::from(rating)))
}

#[cfg(test)]
#[path = "interactions_tests.rs"]
mod tests;
