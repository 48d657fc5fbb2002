use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use campuserp_auth::Role;
use campuserp_billing::{InvoiceId, NewInvoice};

use crate::app::extract::JsonBody;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;
use crate::guard;

const BURSARY: &[Role] = &[Role::Admin, Role::Accountant];

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route("/mine", get(my_invoices))
        .route("/:id", get(get_invoice))
        .route("/:id/payments", post(record_payment))
        .route("/:id/void", post(void_invoice))
}

pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, BURSARY) {
        return resp;
    }
    match services.billing.list_invoices().await {
        Ok(invoices) => {
            (StatusCode::OK, Json(serde_json::json!({ "items": invoices }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    JsonBody(body): JsonBody<NewInvoice>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, BURSARY) {
        return resp;
    }
    if let Err(e) = services.people.get_student(body.student_id).await {
        return errors::domain_error_to_response(e);
    }
    match services.billing.create_invoice(body).await {
        Ok(invoice) => (StatusCode::CREATED, Json(invoice)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<InvoiceId>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, BURSARY) {
        return resp;
    }
    match services.billing.get_invoice(id).await {
        Ok(invoice) => (StatusCode::OK, Json(invoice)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn void_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<InvoiceId>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, BURSARY) {
        return resp;
    }
    match services.billing.void_invoice(id).await {
        Ok(invoice) => (StatusCode::OK, Json(invoice)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn record_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<InvoiceId>,
    JsonBody(body): JsonBody<dto::RecordPaymentRequest>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, BURSARY) {
        return resp;
    }
    match services
        .billing
        .record_payment(id, body.amount, body.method, Utc::now())
        .await
    {
        Ok((invoice, payment)) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "invoice": invoice, "payment": payment })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn my_invoices(
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
    match services.billing.list_invoices_for_student(student.id).await {
        Ok(invoices) => {
            (StatusCode::OK, Json(serde_json::json!({ "items": invoices }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
