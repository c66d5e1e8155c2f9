pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod search;
pub mod update;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

use crate::api::{ApiResponse, PaginatedResponse};
use crate::models::{Recipe, RecipeWithRatings};
use crate::{uploads, AppState};

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes).
/// The upload gate wraps only the create route; it enforces its own size cap,
/// so axum's default body limit is lifted there.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/search", get(search::search_recipes))
        .route(
            "/",
            get(list::list_recipes).merge(
                post(create::create_recipe)
                    .layer::<_, std::convert::Infallible>(from_fn_with_state(
                        state,
                        uploads::stage_image,
                    ))
                    .layer(DefaultBodyLimit::disable()),
            ),
        )
        .route(
            "/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        search::search_recipes,
        update::update_recipe,
        delete::delete_recipe,
    ),
    components(schemas(
        create::CreateRecipeForm,
        search::SearchResults,
        ApiResponse<Recipe>,
        ApiResponse<RecipeWithRatings>,
        ApiResponse<search::SearchResults>,
        PaginatedResponse<Recipe>,
    ))
)]
pub struct ApiDoc;
