//! The route handlers for logging in and for renewing a token.

use axum::{
    Extension, Json,
    extract::{FromRef, State, rejection::JsonRejection},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, Error, PasswordHash,
    auth::{TokenKeys, spawn_hashing},
    db::DbPool,
    user::{User, UserID, get_user_by_email, get_user_by_id},
};

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The database pool for looking up users.
    pub db_pool: DbPool,
    /// The keys used to sign new tokens.
    pub token_keys: TokenKeys,
    /// Verified against when the email is not registered.
    pub decoy_password_hash: PasswordHash,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
            token_keys: state.token_keys.clone(),
            decoy_password_hash: state.decoy_password_hash.clone(),
        }
    }
}

/// The body of a log-in request.
#[derive(Debug, Deserialize)]
pub struct LogInData {
    email: Option<String>,
    password: Option<String>,
}

/// Handler for log-in requests.
///
/// On success, responds with a new token and the user's public details.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email or password is missing (400).
/// - The email does not belong to a registered user (401).
/// - The password is not correct (401).
/// - An internal error occurred when verifying the password.
pub async fn post_log_in(
    State(state): State<LoginState>,
    form: Result<Json<LogInData>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(form) = form?;
    let (Some(email), Some(password)) = (form.email, form.password) else {
        return Err(Error::Validation("email and password are required".to_owned()));
    };

    if email.trim().is_empty() || password.is_empty() {
        return Err(Error::Validation("email and password are required".to_owned()));
    }

    let user = state
        .db_pool
        .run(move |connection| match get_user_by_email(&email, connection) {
            Ok(user) => Ok(Some(user)),
            Err(Error::NotFound) => Ok(None),
            Err(error) => Err(error),
        })
        .await?;

    let decoy = state.decoy_password_hash.clone();
    let user = spawn_hashing(move || check_credentials(user, &password, &decoy))
        .await
        .inspect_err(|error| {
            if *error == Error::InvalidCredentials {
                tracing::info!("Rejected log-in attempt with invalid credentials");
            }
        })?;

    let token = state.token_keys.issue(user.id, &user.name)?;

    tracing::info!("User {} logged in", user.id);

    Ok(Json(json!({
        "message": "login successful",
        "token": token,
        "user": user,
    })))
}

/// Check `raw_password` against the hash of `user`.
///
/// An unknown user is checked against `decoy` instead, so that both kinds
/// of failed log-in cost one bcrypt verification.
fn check_credentials(
    user: Option<User>,
    raw_password: &str,
    decoy: &PasswordHash,
) -> Result<User, Error> {
    let password_hash = user.as_ref().map_or(decoy, |user| &user.password_hash);

    let is_password_valid = password_hash
        .verify(raw_password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    match user {
        Some(user) if is_password_valid => Ok(user),
        _ => Err(Error::InvalidCredentials),
    }
}

/// Handler for issuing a fresh token to an already authenticated caller.
///
/// # Errors
///
/// Responds with 404 Not Found if the caller's account has been deleted since
/// the token was issued.
pub async fn refresh_token(
    State(state): State<LoginState>,
    Extension(user_id): Extension<UserID>,
) -> Result<impl IntoResponse, Error> {
    let user = state
        .db_pool
        .run(move |connection| get_user_by_id(user_id, connection))
        .await?;

    let token = state.token_keys.issue(user.id, &user.name)?;

    Ok(Json(json!({ "token": token })))
}
