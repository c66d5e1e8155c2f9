use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::{ApiResponse, ErrorResponse};
use crate::error::ApiError;
use crate::models::{new_id, NewUser, User};
use crate::schema::users;
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewUserRequest {
    /// User id; generated when empty or omitted
    #[serde(default)]
    pub id: String,
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = NewUserRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<User>),
        (status = 400, description = "Invalid user data", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    body: Result<Json<NewUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    let Json(request) = body.map_err(|rejection| invalid_user(rejection.body_text()))?;
    request.validate().map_err(invalid_user)?;

    let mut conn = state.pool.get()?;

    // A concurrent register can still slip past this check; the insert
    // below maps the unique violation to the same 409.
    let existing: Option<User> = users::table
        .filter(users::username.eq(request.username.as_str()))
        .or_filter(users::email.eq(request.email.as_str()))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;
    if existing.is_some() {
        return Err(ApiError::Conflict(
            "Username or email already exists".to_string(),
        ));
    }

    let user_id = if request.id.is_empty() {
        new_id()
    } else {
        request.id.clone()
    };
    let now = Utc::now().naive_utc();
    let new_user = NewUser {
        id: &user_id,
        username: &request.username,
        email: &request.email,
        created_at: now,
        updated_at: now,
    };

    let user: User = diesel::insert_into(users::table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(&mut conn)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ApiError::Conflict("Username or email already exists".to_string())
            }
            other => ApiError::Database(other),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("User registered successfully! 👤", user)),
    ))
}

fn invalid_user(err: impl std::fmt::Display) -> ApiError {
    ApiError::Validation(format!(
        "Invalid user data. Username and email are required: {err}"
    ))
}
