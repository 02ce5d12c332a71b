//! Request authentication
//!
//! Handlers take an [`AuthUser`] argument to require a signed in
//! user. The session token is read from an `Authorization: Bearer`
//! header, falling back to the `session_token` cookie set by the web
//! client after the identity provider login.

use axum::extract::FromRequestParts;
use axum_extra::extract::CookieJar;
use http::header;
use http::request::Parts;

use crate::api::public::ApiError;
use crate::api::state::SharedState;
use crate::auth::{User, find_user_by_token};

pub const SESSION_COOKIE: &str = "session_token";

/// The user that owns the session token of the current request
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn id(&self) -> &str {
        &self.0.id
    }
}

fn session_token(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim().to_string())
        .filter(|v| !v.is_empty());

    bearer.or_else(|| {
        CookieJar::from_headers(&parts.headers)
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    })
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts).ok_or(ApiError::Unauthorized)?;
        let user = find_user_by_token(&state.db, &token, chrono::Utc::now())
            .await?
            .ok_or(ApiError::Unauthorized)?;
        Ok(AuthUser(user))
    }
}
