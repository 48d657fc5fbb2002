use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use campuserp_auth::{NewUserAccount, Role, UserAccountUpdate};
use campuserp_core::UserId;

use crate::app::extract::JsonBody;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;
use crate::guard;

const ALLOWED: &[Role] = &[Role::Admin];

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, ALLOWED) {
        return resp;
    }
    match services.identity.list_users().await {
        Ok(users) => {
            let items: Vec<_> = users.iter().map(dto::user_to_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    JsonBody(body): JsonBody<dto::CreateUserRequest>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, ALLOWED) {
        return resp;
    }

    let password = body.password;
    let hash = match tokio::task::spawn_blocking(move || {
        campuserp_auth::hash_password(&password)
    })
    .await
    {
        Ok(Ok(hash)) => hash,
        Ok(Err(e)) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "password hashing task failed");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            );
        }
    };

    let new = NewUserAccount {
        email: body.email,
        password_hash: hash,
        role: body.role,
        display_name: body.display_name,
    };
    match services.identity.create_user(new).await {
        Ok(user) => (StatusCode::CREATED, Json(dto::user_to_json(&user))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<UserId>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, ALLOWED) {
        return resp;
    }
    match services.identity.get_user(id).await {
        Ok(user) => (StatusCode::OK, Json(dto::user_to_json(&user))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<UserId>,
    JsonBody(body): JsonBody<dto::UpdateUserRequest>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, ALLOWED) {
        return resp;
    }

    let password_hash = match body.password {
        Some(password) => {
            match tokio::task::spawn_blocking(move || campuserp_auth::hash_password(&password))
                .await
            {
                Ok(Ok(hash)) => Some(hash),
                Ok(Err(e)) => {
                    return errors::json_error(
                        StatusCode::BAD_REQUEST,
                        "validation_error",
                        e.to_string(),
                    )
                }
                Err(e) => {
                    tracing::error!(error = %e, "password hashing task failed");
                    return errors::json_error(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal_error",
                        "internal error",
                    );
                }
            }
        }
        None => None,
    };

    let update = UserAccountUpdate {
        email: body.email,
        role: body.role,
        display_name: body.display_name,
        password_hash,
    };
    match services.identity.update_user(id, update).await {
        Ok(user) => (StatusCode::OK, Json(dto::user_to_json(&user))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<UserId>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, ALLOWED) {
        return resp;
    }
    match services.identity.delete_user(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
