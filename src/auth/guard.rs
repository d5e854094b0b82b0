use crate::{Error, UserID};

/// Check that the authenticated `caller` is the user `target`.
///
/// Used by the self-service user routes. Transactions are scoped to their
/// owner in SQL instead, so that another user's transaction looks missing.
///
/// # Errors
///
/// Returns [Error::Forbidden] if `caller` and `target` differ.
pub fn ensure_self(caller: UserID, target: UserID) -> Result<(), Error> {
    if caller == target {
        Ok(())
    } else {
        tracing::warn!("User {caller} tried to access the account of user {target}");
        Err(Error::Forbidden)
    }
}
