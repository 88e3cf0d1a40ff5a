//! services/api/src/web/middleware.rs
//!
//! Authentication extractors for protecting routes.
//!
//! A token may arrive as `Authorization: Bearer <token>` or, for the admin
//! panel, in the `access_token` cookie. Both feed the same resolver.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};
use course_platform_core::{authorize, Action, Principal, User};
use tracing::warn;

use crate::auth::{self, AuthError};
use crate::error::ApiError;
use crate::web::state::AppState;

/// Name of the cookie carrying the access token for browser sessions.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Pulls the raw token out of the request, header first, then cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let from_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(strip_bearer);
    if let Some(token) = from_header {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .find_map(|c| {
            let c = c.trim();
            c.strip_prefix(ACCESS_TOKEN_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .map(|value| strip_bearer(value).unwrap_or(value).to_string())
        .filter(|token| !token.is_empty())
}

fn strip_bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
        .filter(|t| !t.is_empty())
}

//=========================================================================================
// Extractors
//=========================================================================================

/// The authenticated, active user behind the request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn principal(&self) -> Principal {
        Principal::from(&self.0)
    }
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers).ok_or(AuthError::MissingToken)?;
        let user = auth::resolve_token(state.store.as_ref(), &state.config.jwt, &token).await?;
        Ok(CurrentUser(user))
    }
}

/// Requires an administrator. Rejects with 403 otherwise.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub User);

impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if let Err(err) = authorize(&Principal::from(&user), &Action::Administer) {
            warn!(user_id = user.id, path = %parts.uri.path(), "Admin access denied");
            return Err(err.into());
        }
        Ok(RequireAdmin(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("access_token=xyz"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn cookie_is_used_when_header_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; access_token=xyz"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn malformed_header_yields_nothing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert_eq!(extract_token(&headers), None);
        assert_eq!(extract_token(&HeaderMap::new()), None);
    }
}
