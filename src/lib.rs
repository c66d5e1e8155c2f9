pub mod api;
pub mod background;
pub mod config;
pub mod db;
pub mod error;
pub mod images;
pub mod middleware;
pub mod models;
pub mod raw_sql;
pub mod schema;
pub mod uploads;

use std::sync::Arc;

use axum::extract::MatchedPath;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::api::ErrorResponse;
use crate::config::Config;
use crate::db::DbPool;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<Config>,
}

/// Builds the complete application router with all middleware attached.
/// Kept out of main so integration tests can drive the exact same app.
pub fn app(state: AppState) -> Router {
    // Rating routes live under /api/recipes/{id}/ratings, so they share the
    // recipes mount point.
    let recipe_routes = api::recipes::router(state.clone()).merge(api::ratings::router());

    Router::new()
        .route("/api/health", get(api::health::health))
        .nest("/api/recipes", recipe_routes)
        .nest("/api/users", api::users::router())
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(axum::middleware::from_fn(middleware::cors))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %matched_path,
                    )
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &Span| {
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        )
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(api::openapi())
}

async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            message: "Route not found. Check the API documentation at /api/health".to_string(),
        }),
    )
}
