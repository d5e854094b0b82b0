//! Implements a struct that holds the state of the REST server.

use time::Duration;

use crate::{
    Error, PasswordHash,
    auth::TokenKeys,
    db::{DbPool, initialize},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The pool of connections to the application database.
    pub db_pool: DbPool,

    /// The keys used to sign and verify bearer tokens.
    pub token_keys: TokenKeys,

    /// The bcrypt cost used when hashing new passwords.
    pub password_cost: u32,

    /// Checked in place of a real hash when a log-in names an unknown email.
    pub decoy_password_hash: PasswordHash,
}

impl AppState {
    /// Create a new [AppState] backed by `db_pool`.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// Tokens are signed with `token_secret` and expire `token_duration` after they are issued.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or the decoy
    /// password cannot be hashed.
    pub fn new(
        db_pool: DbPool,
        token_secret: &str,
        token_duration: Duration,
        password_cost: u32,
    ) -> Result<Self, Error> {
        initialize(&*db_pool.get()?)?;

        Ok(Self {
            db_pool,
            token_keys: TokenKeys::from_secret(token_secret, token_duration),
            password_cost,
            decoy_password_hash: PasswordHash::decoy(password_cost)?,
        })
    }
}
