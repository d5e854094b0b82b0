//! Signing and verifying the bearer tokens that identify a caller.

use std::fmt::Debug;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{CredentialError, Error, UserID};

/// How long a token is valid for if no other duration is configured.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::hours(24);

/// The contents of a JSON Web Token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub id: UserID,
    /// The user's display name at the time the token was issued.
    pub name: String,
    /// The time the token was issued, in seconds since the Unix epoch.
    pub iat: i64,
    /// The expiry time of the token, in seconds since the Unix epoch.
    pub exp: i64,
}

/// The HS256 keys used to sign and verify tokens, and how long new tokens last.
#[derive(Clone)]
pub struct TokenKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    duration: Duration,
}

impl TokenKeys {
    /// Derive the signing and verification keys from a shared `secret`.
    ///
    /// New tokens expire `duration` after they are issued.
    pub fn from_secret(secret: &str, duration: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            duration,
        }
    }

    /// Sign a new token for the user `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::TokenCreation] if the claims could not be signed.
    pub fn issue(&self, user_id: UserID, name: &str) -> Result<String, Error> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            id: user_id,
            name: name.to_owned(),
            iat: now.unix_timestamp(),
            exp: (now + self.duration).unix_timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|error| Error::TokenCreation(error.to_string()))
    }

    /// Check the signature and expiry of `token` and return its claims.
    ///
    /// # Errors
    ///
    /// Returns [CredentialError::Expired] if the token has expired and
    /// [CredentialError::Invalid] for any other problem.
    pub fn verify(&self, token: &str) -> Result<Claims, CredentialError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|error| match error.kind() {
                ErrorKind::ExpiredSignature => CredentialError::Expired,
                _ => CredentialError::Invalid,
            })
    }
}

impl Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use time::Duration;

    use crate::{CredentialError, UserID, auth::TokenKeys};

    #[test]
    fn verify_returns_issued_claims() {
        let keys = TokenKeys::from_secret("foobar", Duration::hours(1));

        let token = keys.issue(UserID::new(3), "Ana").unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.id, UserID::new(3));
        assert_eq!(claims.name, "Ana");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn verify_rejects_token_signed_with_other_secret() {
        let keys = TokenKeys::from_secret("foobar", Duration::hours(1));
        let other_keys = TokenKeys::from_secret("bazqux", Duration::hours(1));

        let token = other_keys.issue(UserID::new(3), "Ana").unwrap();

        assert_eq!(keys.verify(&token), Err(CredentialError::Invalid));
    }

    #[test]
    fn verify_reports_expired_token() {
        let keys = TokenKeys::from_secret("foobar", Duration::hours(-1));

        let token = keys.issue(UserID::new(3), "Ana").unwrap();

        assert_eq!(keys.verify(&token), Err(CredentialError::Expired));
    }

    #[test]
    fn verify_rejects_garbage() {
        let keys = TokenKeys::from_secret("foobar", Duration::hours(1));

        assert_eq!(keys.verify("not.a.token"), Err(CredentialError::Invalid));
        assert_eq!(keys.verify(""), Err(CredentialError::Invalid));
    }
}
