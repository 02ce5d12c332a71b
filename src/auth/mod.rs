//! Users and the session tokens that identify them. The identity
//! provider handshake happens elsewhere, this only tracks its result.
pub mod db;
mod models;

pub use db::{
    create_auth_session, delete_expired_auth_sessions, find_user_by_token, get_or_create_user,
};
pub use models::{AuthSession, User};
