//! The route handler for creating a new account.

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, Error, PasswordHash, ValidatedPassword,
    auth::{TokenKeys, spawn_hashing},
    db::DbPool,
    user::{UserProfile, create_user},
};

/// The state needed to register a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The database pool for storing the new user.
    pub db_pool: DbPool,
    /// The keys used to sign the new user's first token.
    pub token_keys: TokenKeys,
    /// The bcrypt cost used to hash the password.
    pub password_cost: u32,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
            token_keys: state.token_keys.clone(),
            password_cost: state.password_cost,
        }
    }
}

/// The body of a registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

/// A route handler for creating a new user.
///
/// Responds with 201 Created, a token and the new user on success.
///
/// # Errors
///
/// Responds with 400 Bad Request if a field is missing, the email address is
/// invalid or already registered, or the password is too weak.
pub async fn register_user(
    State(state): State<RegistrationState>,
    form: Result<Json<RegisterForm>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(form) = form?;
    let profile = UserProfile::new(form.name.as_deref(), form.email.as_deref())?;
    let password = ValidatedPassword::new(form.password.as_deref().unwrap_or_default())?;
    let password_cost = state.password_cost;

    let password_hash = spawn_hashing(move || PasswordHash::new(password, password_cost)).await?;

    let user = state
        .db_pool
        .run(move |connection| {
            create_user(&profile.name, &profile.email, password_hash, connection)
        })
        .await?;

    let token = state.token_keys.issue(user.id, &user.name)?;

    tracing::info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "user registered successfully",
            "token": token,
            "user": user,
        })),
    ))
}

#[cfg(test)]
mod register_user_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{endpoints, test_utils::get_test_server};

    #[tokio::test]
    async fn register_returns_token_and_user() {
        let server = get_test_server();

        let response = server
            .post(endpoints::REGISTER)
            .json(&json!({
                "name": "Ana",
                "email": "ana@example.com",
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<serde_json::Value>();
        assert!(body["token"].as_str().is_some_and(|token| !token.is_empty()));
        assert_eq!(body["user"]["name"], "Ana");
        assert_eq!(body["user"]["email"], "ana@example.com");
        assert!(body["user"]["id"].as_i64().is_some());
        assert!(body["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn register_fails_with_existing_email() {
        let server = get_test_server();
        let form = json!({
            "name": "Ana",
            "email": "ana@example.com",
            "password": "averysafeandsecurepassword",
        });
        server
            .post(endpoints::REGISTER)
            .json(&form)
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.post(endpoints::REGISTER).json(&form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<serde_json::Value>()["code"], "validation_error");
    }

    #[tokio::test]
    async fn register_fails_when_fields_are_missing() {
        let server = get_test_server();

        server
            .post(endpoints::REGISTER)
            .json(&json!({ "email": "ana@example.com", "password": "averysafeandsecurepassword" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .post(endpoints::REGISTER)
            .json(&json!({ "name": "Ana", "email": "ana@example.com" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_fails_when_password_is_weak() {
        let server = get_test_server();

        server
            .post(endpoints::REGISTER)
            .json(&json!({ "name": "Ana", "email": "ana@example.com", "password": "password" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_fails_with_invalid_email() {
        let server = get_test_server();

        server
            .post(endpoints::REGISTER)
            .json(&json!({
                "name": "Ana",
                "email": "not-an-email",
                "password": "averysafeandsecurepassword",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_fails_with_malformed_json() {
        let server = get_test_server();

        server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .text("{ not json")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
