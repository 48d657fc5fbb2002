use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use campuserp_academics::{Transcript, TranscriptEntry};
use campuserp_auth::Role;
use campuserp_core::StudentId;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;
use crate::guard;

pub fn router() -> Router {
    Router::new()
        .route("/me", get(my_transcript))
        .route("/:student_id", get(student_transcript))
}

async fn build_transcript(
    services: &AppServices,
    student_id: StudentId,
) -> Result<Transcript, axum::response::Response> {
    let rows = services
        .academics
        .list_graded_courses(student_id)
        .await
        .map_err(errors::domain_error_to_response)?;
    let entries = rows
        .into_iter()
        .map(|(course, grade)| TranscriptEntry {
            course_id: course.id,
            course_code: course.code,
            course_title: course.title,
            credit_units: course.credit_units,
            score: grade.score,
            letter: grade.letter,
            points: grade.letter.points(),
        })
        .collect();
    Ok(Transcript::compute(student_id, entries))
}

pub async fn student_transcript(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(student_id): Path<StudentId>,
) -> axum::response::Response {
    if let Err(resp) = guard::require_role(&principal, &[Role::Admin, Role::Registrar]) {
        return resp;
    }
    // 404 for an unknown student, before computing anything.
    if let Err(e) = services.people.get_student(student_id).await {
        return errors::domain_error_to_response(e);
    }
    match build_transcript(&services, student_id).await {
        Ok(transcript) => (StatusCode::OK, Json(transcript)).into_response(),
        Err(resp) => resp,
    }
}

pub async fn my_transcript(
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
    match build_transcript(&services, student.id).await {
        Ok(transcript) => (StatusCode::OK, Json(transcript)).into_response(),
        Err(resp) => resp,
    }
}
