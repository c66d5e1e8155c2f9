pub mod create;
pub mod list;

use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

use crate::api::ApiResponse;
use crate::AppState;

/// Returns the router for rating endpoints. Merged into the recipes router,
/// so the routes here are relative to /api/recipes.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}/ratings",
        get(list::list_ratings).post(create::add_rating),
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(create::add_rating, list::list_ratings),
    components(schemas(
        create::NewRatingRequest,
        create::RatingWithRecipe,
        list::RecipeRatings,
        ApiResponse<create::RatingWithRecipe>,
        ApiResponse<list::RecipeRatings>,
    ))
)]
pub struct ApiDoc;
