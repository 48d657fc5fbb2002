use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use campuserp_academics::{CourseUpdate, Grade, NewCourse};
use campuserp_auth::Role;
use campuserp_core::CourseId;

use crate::app::extract::JsonBody;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;
use crate::guard;

const WRITE: &[Role] = &[Role::Admin, Role::Registrar, Role::Hod];
const ENROLL: &[Role] = &[Role::Admin, Role::Registrar];

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/mine", get(my_courses))
        .route(
            "/:id",
            get(get_course).patch(update_course).delete(delete_course),
        )
        .route(
            "/:id/enrollments",
            post(enroll_batch).get(list_course_enrollments),
        )
        .route("/:id/grades", post(record_grade))
}

/// Any authenticated caller may browse the course catalogue.
pub async fn list_courses(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.academics.list_courses().await {
        Ok(courses) => {
            (StatusCode::OK, Json(serde_json::json!({ "items": courses }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<CourseId>,
) -> axum::response::Response {
    match services.academics.get_course(id).await {
        Ok(course) => (StatusCode::OK, Json(course)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_course(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    JsonBody(body): JsonBody<NewCourse>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, WRITE) {
        return resp;
    }
    if let Some(lecturer_id) = body.lecturer_id {
        if let Err(e) = services.people.get_staff(lecturer_id).await {
            return errors::domain_error_to_response(e);
        }
    }
    match services.academics.create_course(body).await {
        Ok(course) => (StatusCode::CREATED, Json(course)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_course(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<CourseId>,
    JsonBody(body): JsonBody<CourseUpdate>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, WRITE) {
        return resp;
    }
    if let Some(lecturer_id) = body.lecturer_id {
        if let Err(e) = services.people.get_staff(lecturer_id).await {
            return errors::domain_error_to_response(e);
        }
    }
    match services.academics.update_course(id, body).await {
        Ok(course) => (StatusCode::OK, Json(course)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_course(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<CourseId>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, WRITE) {
        return resp;
    }
    match services.academics.delete_course(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Courses taught by the calling lecturer, resolved from their own staff
/// record.
pub async fn my_courses(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, &[Role::Lecturer]) {
        return resp;
    }
    let staff = match guard::require_staff_profile(&services, &principal).await {
        Ok(staff) => staff,
        Err(resp) => return resp,
    };
    match services.academics.list_courses_by_lecturer(staff.id).await {
        Ok(courses) => {
            (StatusCode::OK, Json(serde_json::json!({ "items": courses }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Batch enrollment: validate every student up front, then write the whole
/// batch in one store transaction. No partial batches.
pub async fn enroll_batch(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(course_id): Path<CourseId>,
    JsonBody(body): JsonBody<dto::EnrollBatchRequest>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, ENROLL) {
        return resp;
    }
    if body.student_ids.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "student_ids cannot be empty",
        );
    }
    for student_id in &body.student_ids {
        if let Err(e) = services.people.get_student(*student_id).await {
            return errors::domain_error_to_response(e);
        }
    }
    match services
        .academics
        .enroll_batch(course_id, &body.student_ids, &body.session, Utc::now())
        .await
    {
        Ok(enrollments) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "items": enrollments })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_course_enrollments(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(course_id): Path<CourseId>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, ENROLL) {
        return resp;
    }
    match services
        .academics
        .list_enrollments_for_course(course_id)
        .await
    {
        Ok(enrollments) => (
            StatusCode::OK,
            Json(serde_json::json!({ "items": enrollments })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Record a grade. The course must belong to the calling lecturer; the
/// enrollment must belong to the course.
pub async fn record_grade(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(course_id): Path<CourseId>,
    JsonBody(body): JsonBody<dto::RecordGradeRequest>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, &[Role::Lecturer]) {
        return resp;
    }
    let staff = match guard::require_staff_profile(&services, &principal).await {
        Ok(staff) => staff,
        Err(resp) => return resp,
    };
    let course = match services.academics.get_course(course_id).await {
        Ok(course) => course,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if !course.is_taught_by(staff.id) {
        return errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "course is not assigned to you",
        );
    }

    let enrollments = match services
        .academics
        .list_enrollments_for_course(course_id)
        .await
    {
        Ok(enrollments) => enrollments,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if !enrollments.iter().any(|e| e.id == body.enrollment_id) {
        return errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "enrollment not found for this course",
        );
    }

    let grade = match Grade::record(body.enrollment_id, body.score, staff.id, Utc::now()) {
        Ok(grade) => grade,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.academics.record_grade(grade, body.replace).await {
        Ok(grade) => (StatusCode::CREATED, Json(grade)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
