//! Route handlers for reading, updating and deleting the caller's own account.

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State, rejection::JsonRejection, rejection::PathRejection},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, Error,
    auth::ensure_self,
    db::DbPool,
    user::core::{UserID, UserProfile, delete_user, get_user_by_id, update_user},
};

/// The state needed to manage a user's account.
#[derive(Debug, Clone)]
pub struct UserState {
    /// The database pool for managing users.
    pub db_pool: DbPool,
}

impl FromRef<AppState> for UserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
        }
    }
}

/// The body of a request to update a user's name and email address.
#[derive(Debug, Deserialize)]
pub struct UpdateUserForm {
    name: Option<String>,
    email: Option<String>,
}

/// A route handler for getting the caller's own account.
///
/// Responds with 403 Forbidden if `user_id` is not the caller.
pub async fn get_user_endpoint(
    State(state): State<UserState>,
    Extension(caller): Extension<UserID>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, Error> {
    let Path(user_id) = path?;
    let user_id = UserID::new(user_id);
    ensure_self(caller, user_id)?;

    let user = state
        .db_pool
        .run(move |connection| get_user_by_id(user_id, connection))
        .await?;

    Ok(Json(user))
}

/// A route handler for replacing the caller's name and email address.
///
/// Responds with 403 Forbidden if `user_id` is not the caller and 400 Bad
/// Request if the name or email is missing or invalid.
pub async fn update_user_endpoint(
    State(state): State<UserState>,
    Extension(caller): Extension<UserID>,
    path: Result<Path<i64>, PathRejection>,
    form: Result<Json<UpdateUserForm>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Path(user_id) = path?;
    let user_id = UserID::new(user_id);
    ensure_self(caller, user_id)?;

    let Json(form) = form?;
    let profile = UserProfile::new(form.name.as_deref(), form.email.as_deref())?;

    state
        .db_pool
        .run(move |connection| update_user(user_id, &profile, connection))
        .await?;

    tracing::info!("Updated profile of user {user_id}");

    Ok(Json(json!({ "message": "user updated successfully" })))
}

/// A route handler for deleting the caller's account and all of their transactions.
///
/// Responds with 403 Forbidden if `user_id` is not the caller.
pub async fn delete_user_endpoint(
    State(state): State<UserState>,
    Extension(caller): Extension<UserID>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, Error> {
    let Path(user_id) = path?;
    let user_id = UserID::new(user_id);
    ensure_self(caller, user_id)?;

    state
        .db_pool
        .run(move |connection| delete_user(user_id, connection))
        .await?;

    tracing::info!("Deleted user {user_id}");

    Ok(Json(json!({ "message": "user deleted successfully" })))
}
