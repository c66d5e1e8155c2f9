pub mod health;
pub mod ratings;
pub mod recipes;
pub mod users;

use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::models::{Rating, Recipe, RecipePatch, RecipeWithRatings, User, UserWithRecipes};

/// Success envelope shared by all endpoints. `data` is omitted entirely when
/// a response carries no payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Success envelope for list endpoints, with pagination counters at the top
/// level next to the data.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total_count: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(
        message: impl Into<String>,
        data: Vec<T>,
        page: i64,
        per_page: i64,
        total_count: i64,
    ) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            page,
            per_page,
            total_count,
        }
    }
}

/// Success envelope with no payload
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with the shared envelope and model schemas
    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "skillet",
            description = "Recipe sharing REST API with ratings and image uploads"
        ),
        components(schemas(
            ErrorResponse,
            StatusResponse,
            Recipe,
            Rating,
            User,
            RecipePatch,
            RecipeWithRatings,
            UserWithRecipes,
        ))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    // Merge in each module's spec
    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        health::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        ratings::ApiDoc::openapi(),
        users::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        // Merge paths
        spec.paths.paths.extend(module_spec.paths.paths);

        // Merge components (schemas)
        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}
