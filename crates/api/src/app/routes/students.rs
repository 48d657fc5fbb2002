use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use campuserp_auth::Role;
use campuserp_core::StudentId;
use campuserp_people::{NewStudent, StudentContactUpdate, StudentUpdate};

use crate::app::errors;
use crate::app::extract::JsonBody;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;
use crate::guard;

const ADMIN_SIDE: &[Role] = &[Role::Admin, Role::Registrar];

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route("/me", get(my_profile).patch(update_my_profile))
        .route(
            "/:id",
            get(get_student).patch(update_student).delete(delete_student),
        )
}

pub async fn list_students(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, ADMIN_SIDE) {
        return resp;
    }
    match services.people.list_students().await {
        Ok(students) => {
            (StatusCode::OK, Json(serde_json::json!({ "items": students }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_student(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    JsonBody(body): JsonBody<NewStudent>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, ADMIN_SIDE) {
        return resp;
    }
    // The linked account must exist before a profile can reference it.
    if let Err(e) = services.identity.get_user(body.user_id).await {
        return errors::domain_error_to_response(e);
    }
    match services.people.create_student(body).await {
        Ok(student) => (StatusCode::CREATED, Json(student)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_student(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<StudentId>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, ADMIN_SIDE) {
        return resp;
    }
    match services.people.get_student(id).await {
        Ok(student) => (StatusCode::OK, Json(student)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_student(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<StudentId>,
    JsonBody(body): JsonBody<StudentUpdate>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, ADMIN_SIDE) {
        return resp;
    }
    match services.people.update_student(id, body).await {
        Ok(student) => (StatusCode::OK, Json(student)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_student(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<StudentId>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, ADMIN_SIDE) {
        return resp;
    }
    match services.people.delete_student(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn my_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, &[Role::Student]) {
        return resp;
    }
    match guard::require_student_profile(&services, &principal).await {
        Ok(student) => (StatusCode::OK, Json(student)).into_response(),
        Err(resp) => resp,
    }
}

/// Self-service update. The target row comes from the resolved profile, so
/// a student can never mutate anyone else's record, and the narrow
/// contact-update shape keeps status/level/reg_no out of reach.
pub async fn update_my_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    JsonBody(body): JsonBody<StudentContactUpdate>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, &[Role::Student]) {
        return resp;
    }
    let student = match guard::require_student_profile(&services, &principal).await {
        Ok(student) => student,
        Err(resp) => return resp,
    };
    match services.people.update_student_contact(student.id, body).await {
        Ok(student) => (StatusCode::OK, Json(student)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
