use axum::{routing::get, Router};

pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod grades;
pub mod invoices;
pub mod payments;
pub mod programs;
pub mod staff;
pub mod students;
pub mod system;
pub mod timetable;
pub mod transcripts;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/auth/me", get(auth::me))
        .nest("/users", users::router())
        .nest("/students", students::router())
        .nest("/staff", staff::router())
        .nest("/programs", programs::router())
        .nest("/courses", courses::router())
        .nest("/enrollments", enrollments::router())
        .nest("/grades", grades::router())
        .nest("/transcripts", transcripts::router())
        .nest("/invoices", invoices::router())
        .nest("/payments", payments::router())
        .nest("/timetable", timetable::router())
}
