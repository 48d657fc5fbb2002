use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use campuserp_auth::Role;
use campuserp_core::StaffId;
use campuserp_people::{NewStaff, StaffUpdate};

use crate::app::errors;
use crate::app::extract::JsonBody;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;
use crate::guard;

const WRITE: &[Role] = &[Role::Admin];
const READ: &[Role] = &[Role::Admin, Role::Registrar, Role::Hod];

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_staff).post(create_staff))
        .route("/:id", get(get_staff).patch(update_staff).delete(delete_staff))
}

pub async fn list_staff(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, READ) {
        return resp;
    }
    match services.people.list_staff().await {
        Ok(staff) => (StatusCode::OK, Json(serde_json::json!({ "items": staff }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_staff(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    JsonBody(body): JsonBody<NewStaff>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, WRITE) {
        return resp;
    }
    if let Err(e) = services.identity.get_user(body.user_id).await {
        return errors::domain_error_to_response(e);
    }
    match services.people.create_staff(body).await {
        Ok(staff) => (StatusCode::CREATED, Json(staff)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_staff(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<StaffId>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, READ) {
        return resp;
    }
    match services.people.get_staff(id).await {
        Ok(staff) => (StatusCode::OK, Json(staff)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_staff(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<StaffId>,
    JsonBody(body): JsonBody<StaffUpdate>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, WRITE) {
        return resp;
    }
    match services.people.update_staff(id, body).await {
        Ok(staff) => (StatusCode::OK, Json(staff)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_staff(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<StaffId>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, WRITE) {
        return resp;
    }
    match services.people.delete_staff(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
