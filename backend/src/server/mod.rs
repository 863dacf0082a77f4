//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use ecoswap_backend::Trace;
#[cfg(debug_assertions)]
use ecoswap_backend::doc::ApiDoc;
use ecoswap_backend::inbound::http::health::{HealthState, live, ready};
use ecoswap_backend::inbound::http::interactions::{
    accept_exchange, cancel_exchange, complete_exchange, get_exchange, list_exchanges,
    propose_exchange, rate_exchange, reject_exchange, start_exchange,
};
use ecoswap_backend::inbound::http::listings::{
    close_listing, create_listing, get_listing, list_listings, update_listing,
};
use ecoswap_backend::inbound::http::notifications::{list_notifications, mark_notification_read};
use ecoswap_backend::inbound::http::state::HttpState;
use ecoswap_backend::inbound::http::users::{current_user, list_user_ratings};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api")
        .service(create_listing)
        .service(list_listings)
        .service(get_listing)
        .service(update_listing)
        .service(close_listing)
        .service(propose_exchange)
        .service(list_exchanges)
        .service(get_exchange)
        .service(accept_exchange)
        .service(reject_exchange)
        .service(start_exchange)
        .service(cancel_exchange)
        .service(complete_exchange)
        .service(rate_exchange)
        .service(list_notifications)
        .service(mark_notification_read)
        .service(current_user)
        .service(list_user_ratings);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server from the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
