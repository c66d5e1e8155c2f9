use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::api::ApiResponse;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = ApiResponse<HealthStatus>)
    )
)]
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::new(
        "🚀 Recipe API is running!",
        HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    ))
}

#[derive(OpenApi)]
#[openapi(paths(health), components(schemas(HealthStatus, ApiResponse<HealthStatus>)))]
pub struct ApiDoc;
