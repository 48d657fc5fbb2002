use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use campuserp_auth::{verify_password, Principal};

use crate::app::{dto, errors};
use crate::app::extract::JsonBody;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;
use crate::middleware::SESSION_COOKIE;

/// Cookie lifetime (7 days). Deliberately longer than the token TTL: the
/// token's own expiry is authoritative, the cookie merely carries it.
const COOKIE_MAX_AGE_SECONDS: u64 = 604_800;

fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={COOKIE_MAX_AGE_SECONDS}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn cleared_cookie(secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Uniform rejection: never reveals whether the email or password was wrong.
fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Invalid credentials" })),
    )
        .into_response()
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    JsonBody(body): JsonBody<dto::LoginRequest>,
) -> axum::response::Response {
    let user = match services.identity.find_user_by_email(&body.email).await {
        Ok(Some(user)) => user,
        Ok(None) => return invalid_credentials(),
        Err(e) => return errors::domain_error_to_response(e),
    };

    // bcrypt is deliberately slow; keep it off the async worker threads.
    let hash = user.password_hash.clone();
    let password = body.password;
    let verified =
        match tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await {
            Ok(verified) => verified,
            Err(e) => {
                tracing::error!(error = %e, "password verification task failed");
                return errors::json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal error",
                );
            }
        };
    if !verified {
        return invalid_credentials();
    }

    let principal = Principal {
        user_id: user.id,
        email: user.email.clone(),
        role: user.role,
    };
    let token = match services.codec.issue(&principal) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "failed to issue session token");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            );
        }
    };

    (
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            session_cookie(&token, services.secure_cookies),
        )],
        Json(json!({
            "message": "login successful",
            "token": token,
            "user": {
                "id": user.id,
                "email": user.email,
                "role": user.role,
            },
        })),
    )
        .into_response()
}

/// Public on purpose: logging out with an expired session must still work.
pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    (
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            cleared_cookie(services.secure_cookies),
        )],
        Json(json!({ "message": "logged out" })),
    )
        .into_response()
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    let profile = match services
        .people
        .find_student_by_user(principal.user_id())
        .await
    {
        Ok(Some(_)) => "student",
        Ok(None) => match services.people.find_staff_by_user(principal.user_id()).await {
            Ok(Some(_)) => "staff",
            Ok(None) => "none",
            Err(e) => return errors::domain_error_to_response(e),
        },
        Err(e) => return errors::domain_error_to_response(e),
    };

    let p = principal.principal();
    (
        StatusCode::OK,
        Json(json!({
            "user": { "id": p.user_id, "email": p.email, "role": p.role },
            "profile": profile,
        })),
    )
        .into_response()
}
