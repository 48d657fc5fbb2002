//! Guard combinators used by every protected handler.
//!
//! The sequence is fixed: authenticate (middleware) -> authorize role set ->
//! optionally resolve the caller's own domain record -> run exactly one
//! domain operation -> map the result. Each step short-circuits with a
//! ready-made response, so handlers stay linear.

use axum::http::StatusCode;
use axum::response::Response;

use campuserp_auth::{authorize, AuthzError, Role};
use campuserp_people::{Staff, Student};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// Authorize the caller against an allow-list of roles.
pub fn require_role(principal: &PrincipalContext, allowed: &[Role]) -> Result<(), Response> {
    match authorize(Some(principal.principal()), allowed) {
        Ok(_) => Ok(()),
        Err(AuthzError::Unauthorized) => Err(errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "not logged in",
        )),
        Err(AuthzError::Forbidden) => Err(errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "insufficient role",
        )),
    }
}

/// Resolve the caller's own student record.
///
/// Self-scoped actions derive the target id only from this record, never
/// from request input. A missing record is 404, distinct from 401/403.
pub async fn require_student_profile(
    services: &AppServices,
    principal: &PrincipalContext,
) -> Result<Student, Response> {
    match services.people.find_student_by_user(principal.user_id()).await {
        Ok(Some(student)) => Ok(student),
        Ok(None) => Err(errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "profile not found",
        )),
        Err(e) => Err(errors::domain_error_to_response(e)),
    }
}

/// Resolve the caller's own staff record.
pub async fn require_staff_profile(
    services: &AppServices,
    principal: &PrincipalContext,
) -> Result<Staff, Response> {
    match services.people.find_staff_by_user(principal.user_id()).await {
        Ok(Some(staff)) => Ok(staff),
        Ok(None) => Err(errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "profile not found",
        )),
        Err(e) => Err(errors::domain_error_to_response(e)),
    }
}
