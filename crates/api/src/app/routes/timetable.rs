use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use campuserp_academics::{NewTimetableSlot, TimetableSlotId};
use campuserp_auth::Role;

use crate::app::errors;
use crate::app::extract::JsonBody;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;
use crate::guard;

const WRITE: &[Role] = &[Role::Admin, Role::Registrar];

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_slots).post(create_slot))
        .route("/:id", axum::routing::delete(delete_slot))
}

/// Any authenticated caller may read the timetable.
pub async fn list_slots(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.academics.list_timetable_slots().await {
        Ok(slots) => (StatusCode::OK, Json(serde_json::json!({ "items": slots }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_slot(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    JsonBody(body): JsonBody<NewTimetableSlot>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, WRITE) {
        return resp;
    }
    match services.academics.add_timetable_slot(body).await {
        Ok(slot) => (StatusCode::CREATED, Json(slot)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_slot(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<TimetableSlotId>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, WRITE) {
        return resp;
    }
    match services.academics.delete_timetable_slot(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
