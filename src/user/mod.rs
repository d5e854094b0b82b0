//! User accounts: the user model, its database queries and the self-service
//! route handlers.

mod core;
mod profile;

pub use core::{
    User, UserID, UserProfile, create_user, create_user_table, get_user_by_email,
    get_user_by_id, update_password,
};
pub use profile::{delete_user_endpoint, get_user_endpoint, update_user_endpoint};
