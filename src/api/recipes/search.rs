use axum::extract::{Query, State};
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::{ApiResponse, ErrorResponse};
use crate::error::ApiError;
use crate::ingredients_like;
use crate::models::Recipe;
use crate::schema::recipes;
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Comma-separated ingredient terms, e.g. `tomato,onion`
    ingredients: Option<String>,
}

/// Search payload: the query as given, plus every recipe whose ingredients
/// matched any term.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchResults {
    pub query: String,
    pub count: usize,
    pub recipes: Vec<Recipe>,
}

#[utoipa::path(
    get,
    path = "/api/recipes/search",
    tag = "recipes",
    params(SearchParams),
    responses(
        (status = 200, description = "Recipes matching any search term", body = ApiResponse<SearchResults>),
        (status = 400, description = "Missing ingredients parameter", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn search_recipes(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<SearchResults>>, ApiError> {
    let raw = params.ingredients.unwrap_or_default();
    if raw.is_empty() {
        return Err(ApiError::Validation(
            "Please provide ingredients to search. Example: ?ingredients=tomato,onion".to_string(),
        ));
    }

    let terms = search_terms(&raw);

    let mut conn = state.pool.get()?;

    // A recipe matches when any term appears in its ingredients. With no
    // usable terms (e.g. ",,") the query stays unfiltered.
    let mut query = recipes::table.select(Recipe::as_select()).into_boxed();
    for (i, term) in terms.iter().enumerate() {
        let pattern = format!("%{term}%");
        if i == 0 {
            query = query.filter(ingredients_like!(pattern));
        } else {
            query = query.or_filter(ingredients_like!(pattern));
        }
    }
    let matches = query.load(&mut conn)?;

    Ok(Json(ApiResponse::new(
        "Search results fetched successfully",
        SearchResults {
            query: raw,
            count: matches.len(),
            recipes: matches,
        },
    )))
}

/// Splits on commas, trims, lowercases, and drops empty segments.
fn search_terms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_normalizes() {
        assert_eq!(search_terms("Tomato, ONION"), vec!["tomato", "onion"]);
    }

    #[test]
    fn drops_empty_segments() {
        assert_eq!(search_terms("tomato,,onion,"), vec!["tomato", "onion"]);
        assert!(search_terms(",,,").is_empty());
    }

    #[test]
    fn keeps_inner_whitespace() {
        assert_eq!(search_terms(" olive oil "), vec!["olive oil"]);
    }
}
