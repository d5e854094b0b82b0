//! Authentication and authorization: password hashing, bearer tokens, the
//! auth middleware and the log-in routes.

mod guard;
mod log_in;
mod middleware;
mod password;
mod token;

pub use guard::ensure_self;
pub use log_in::{post_log_in, refresh_token};
pub use middleware::auth_guard;
pub use password::{PasswordHash, ValidatedPassword, spawn_hashing};
pub use token::{Claims, DEFAULT_TOKEN_DURATION, TokenKeys};
