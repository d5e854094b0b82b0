//! Helpers for driving the full router in HTTP tests.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use crate::{
    AppState, DbPool, UserID, auth::DEFAULT_TOKEN_DURATION, build_router,
    database_id::TransactionId, endpoints,
};

/// A password that passes the strength check.
pub(crate) const TEST_PASSWORD: &str = "averysafeandsecurepassword";

/// The lowest bcrypt cost, so that tests do not spend their time hashing.
const TEST_PASSWORD_COST: u32 = 4;

/// Build the full application backed by a fresh in-memory database.
#[track_caller]
pub(crate) fn get_test_server() -> TestServer {
    let db_pool = DbPool::open_in_memory().expect("Could not open in-memory database pool");
    let state = AppState::new(db_pool, "42", DEFAULT_TOKEN_DURATION, TEST_PASSWORD_COST)
        .expect("Could not create app state");

    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

/// Register a user with [TEST_PASSWORD] and return their token and ID.
pub(crate) async fn register_test_user(
    server: &TestServer,
    name: &str,
    email: &str,
) -> (String, UserID) {
    let response = server
        .post(endpoints::REGISTER)
        .json(&json!({ "name": name, "email": email, "password": TEST_PASSWORD }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body = response.json::<serde_json::Value>();
    let token = body["token"]
        .as_str()
        .expect("registration response is missing the token")
        .to_owned();
    let user_id = body["user"]["id"]
        .as_i64()
        .expect("registration response is missing the user ID");

    (token, UserID::new(user_id))
}

/// Create a transaction from a JSON `body` and return its ID.
pub(crate) async fn create_test_transaction(
    server: &TestServer,
    token: &str,
    body: serde_json::Value,
) -> TransactionId {
    let response = server
        .post(endpoints::TRANSACTIONS)
        .authorization_bearer(token)
        .json(&body)
        .await;
    response.assert_status(StatusCode::CREATED);

    response.json::<serde_json::Value>()["id"]
        .as_i64()
        .expect("create response is missing the transaction ID")
}
