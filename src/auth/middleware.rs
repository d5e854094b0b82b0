//! Authentication middleware that verifies bearer tokens.

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};

use crate::{AppState, CredentialError, Error, auth::TokenKeys};

/// The state needed for the auth middleware
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The keys used to verify bearer tokens.
    pub token_keys: TokenKeys,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_keys: state.token_keys.clone(),
        }
    }
}

/// Middleware function that checks for a valid bearer token.
///
/// The user ID from the token is placed into the request extensions and the
/// request executed normally if the token is valid. Otherwise an
/// [Error::Unauthenticated] response is returned and the handler never runs.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(
    State(state): State<AuthState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, Error> {
    let TypedHeader(Authorization(bearer)) =
        bearer.map_err(|_| Error::Unauthenticated(CredentialError::Missing))?;

    let claims = state.token_keys.verify(bearer.token()).map_err(|error| {
        tracing::debug!("Rejected bearer token for {}: {error}", request.uri());
        Error::Unauthenticated(error)
    })?;

    request.extensions_mut().insert(claims.id);

    Ok(next.run(request).await)
}
