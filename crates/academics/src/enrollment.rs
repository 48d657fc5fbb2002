use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campuserp_core::{CourseId, DomainError, DomainResult, StudentId};

/// Identifier of an enrollment row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrollmentId(Uuid);

campuserp_core::impl_uuid_newtype!(EnrollmentId, "EnrollmentId");

/// A student's registration in a course for an academic session.
///
/// Unique per `(course_id, student_id, session)`; the store enforces this as
/// a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub course_id: CourseId,
    pub student_id: StudentId,
    /// Academic session, e.g. `"2025/2026"`.
    pub session: String,
    pub enrolled_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn create(
        course_id: CourseId,
        student_id: StudentId,
        session: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let session = session.trim();
        if session.is_empty() {
            return Err(DomainError::validation("session cannot be empty"));
        }
        Ok(Self {
            id: EnrollmentId::new(),
            course_id,
            student_id,
            session: session.to_string(),
            enrolled_at: now,
        })
    }

    /// Duplicate-detection key.
    pub fn key(&self) -> (CourseId, StudentId, &str) {
        (self.course_id, self.student_id, self.session.as_str())
    }
}
