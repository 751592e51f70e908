//! HTTP surface of the celebrations service.
//!
//! `/health` and the signed `/slack/events` webhook sit at the root; the
//! dashboard endpoints live under `/api`. The binary and the HTTP tests
//! both go through [`build_app_router`].

use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Mount every route on `state` and wrap them in the middleware stack.
///
/// Outermost first: CORS for the dashboard origin, a fresh `x-request-id`,
/// request tracing, the id echoed back on the response, the
/// `REQUEST_TIMEOUT_SECS` deadline (408), then panic recovery (500).
pub fn build_app_router(state: AppState) -> Router {
    let config = state.config.clone();
    let cors = build_cors_layer(&config);
    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .merge(routes::slack::router())
        .nest("/api", routes::api_routes())
        // Layers below wrap everything added above them.
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// CORS for the dashboard: the `CORS_ORIGINS` list, the verbs the API
/// uses, and JSON bodies.
///
/// An unparseable origin panics; this only runs at startup.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
