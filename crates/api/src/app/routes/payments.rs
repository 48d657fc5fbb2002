use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use campuserp_auth::Role;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;
use crate::guard;

pub fn router() -> Router {
    Router::new().route("/mine", get(my_payments))
}

pub async fn my_payments(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, &[Role::Student]) {
        return resp;
    }
    let student = match guard::require_student_profile(&services, &principal).await {
        Ok(student) => student,
        Err(resp) => return resp,
    };
    match services.billing.list_payments_for_student(student.id).await {
        Ok(payments) => {
            (StatusCode::OK, Json(serde_json::json!({ "items": payments }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
