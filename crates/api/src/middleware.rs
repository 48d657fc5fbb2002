//! Session accessor + auth middleware.
//!
//! The accessor is a pair of pure functions over the request `HeaderMap`:
//! try the `token` cookie first, then `Authorization: Bearer`. Decoding goes
//! through the session codec; any failure yields no principal. The axum
//! layer fails closed with 401 for everything behind it.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use campuserp_auth::{Principal, SessionCodec};

use crate::app::errors;
use crate::context::PrincipalContext;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

#[derive(Clone)]
pub struct AuthState {
    pub codec: Arc<SessionCodec>,
}

/// Resolve the request's principal, if any.
pub fn principal_from_headers(codec: &SessionCodec, headers: &HeaderMap) -> Option<Principal> {
    if let Some(token) = extract_cookie_token(headers) {
        if let Some(principal) = codec.verify(token) {
            return Some(principal);
        }
    }
    extract_bearer(headers).and_then(|token| codec.verify(token))
}

/// Pull the session token out of the `Cookie` header.
pub fn extract_cookie_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in raw.split(';') {
        // A pair without '=' is skipped, not fatal: the token may follow it.
        let Some((name, value)) = pair.trim().split_once('=') else {
            continue;
        };
        if name.trim() == SESSION_COOKIE {
            let value = value.trim();
            if value.is_empty() {
                return None;
            }
            return Some(value);
        }
    }
    None
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    match principal_from_headers(&state.codec, req.headers()) {
        Some(principal) => {
            req.extensions_mut()
                .insert(PrincipalContext::new(principal));
            next.run(req).await
        }
        None => errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "not logged in"),
    }
}
