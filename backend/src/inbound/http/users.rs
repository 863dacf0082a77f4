//! User profile HTTP handlers.
//!
//! ```text
//! GET /api/users/me
//! GET /api/users/{id}/ratings
//! ```

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{ListRatingsForUserRequest, UserRepositoryError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{BearerToken, authenticate};
use crate::inbound::http::interactions::RatingResponseBody;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_user_id};

/// Authenticated user profile.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub display_name: String,
}

fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// Return the authenticated caller's profile.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Authenticated profile", body = UserResponseBody),
        (status = 401, description = "Unauthorized", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("BearerToken" = []))
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    token: BearerToken,
) -> ApiResult<web::Json<UserResponseBody>> {
    let caller = authenticate(&state, &token).await?;

    let user = state
        .users
        .find_by_id(&caller)
        .await
        .map_err(map_user_repository_error)?
        .ok_or_else(|| Error::not_found("user profile not found"))?;

    Ok(web::Json(UserResponseBody {
        id: user.id().to_string(),
        display_name: user.display_name().to_owned(),
    }))
}

/// Ratings received by a user.
#[utoipa::path(
    get,
    path = "/api/users/{id}/ratings",
    params(("id" = String, Path, description = "Resource identifier (UUID)")),
    responses(
        (status = 200, description = "Ratings received", body = [RatingResponseBody]),
        (status = 401, description = "Unauthorized", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUserRatings",
    security(("BearerToken" = []))
)]
#[get("/users/{id}/ratings")]
pub async fn list_user_ratings(
    state: web::Data<HttpState>,
    token: BearerToken,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<RatingResponseBody>>> {
    authenticate(&state, &token).await?;
    let rated_id = parse_user_id(path.into_inner(), FieldName::new("id"))?;

    let ratings = state
        .ratings_query
        .list_for_user(ListRatingsForUserRequest { rated_id })
        .await?;

    Ok(web::Json(
        ratings.into_iter().map(RatingResponseBody::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::FIXTURE_BEARER_TOKEN;
    use crate::inbound::http::state::{HttpState, test_support::fixture_ports};

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(HttpState::new(fixture_ports())))
            .service(web::scope("/api").service(current_user).service(list_user_ratings))
    }

    #[actix_web::test]
    async fn me_returns_the_fixture_profile() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/users/me")
                .insert_header(("Authorization", format!("Bearer {FIXTURE_BEARER_TOKEN}")))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("displayName").and_then(Value::as_str),
            Some("Vecino Demo")
        );
    }

    #[actix_web::test]
    async fn me_requires_a_bearer_token() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/users/me").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn ratings_surface_uses_the_spanish_field_names() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!(
                    "/api/users/{}/ratings",
                    uuid::Uuid::from_u128(0x0002)
                ))
                .insert_header(("Authorization", format!("Bearer {FIXTURE_BEARER_TOKEN}")))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        let first = body.as_array().and_then(|list| list.first()).expect("one rating");
        assert!(first.get("calificado_id").is_some());
        assert!(first.get("puntuacion").is_some());
    }
}
