use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use campuserp_academics::{NewProgram, ProgramUpdate};
use campuserp_auth::Role;
use campuserp_core::ProgramId;

use crate::app::errors;
use crate::app::extract::JsonBody;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;
use crate::guard;

const WRITE: &[Role] = &[Role::Admin, Role::Registrar];

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_programs).post(create_program))
        .route(
            "/:id",
            get(get_program).patch(update_program).delete(delete_program),
        )
}

/// Any authenticated caller may browse programs.
pub async fn list_programs(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.academics.list_programs().await {
        Ok(programs) => {
            (StatusCode::OK, Json(serde_json::json!({ "items": programs }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_program(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<ProgramId>,
) -> axum::response::Response {
    match services.academics.get_program(id).await {
        Ok(program) => (StatusCode::OK, Json(program)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_program(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    JsonBody(body): JsonBody<NewProgram>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, WRITE) {
        return resp;
    }
    match services.academics.create_program(body).await {
        Ok(program) => (StatusCode::CREATED, Json(program)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_program(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<ProgramId>,
    JsonBody(body): JsonBody<ProgramUpdate>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, WRITE) {
        return resp;
    }
    match services.academics.update_program(id, body).await {
        Ok(program) => (StatusCode::OK, Json(program)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_program(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<ProgramId>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, WRITE) {
        return resp;
    }
    match services.academics.delete_program(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
