use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campuserp_core::{CourseId, DomainError, DomainResult, ProgramId, StaffId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Semester {
    First,
    Second,
}

/// A taught course within a program.
///
/// `lecturer_id` is the ownership link for lecturer-scoped actions: a
/// lecturer may only list and grade courses whose `lecturer_id` resolves to
/// their own staff record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub code: String,
    pub title: String,
    pub program_id: ProgramId,
    pub lecturer_id: Option<StaffId>,
    pub semester: Semester,
    pub credit_units: u8,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCourse {
    pub code: String,
    pub title: String,
    pub program_id: ProgramId,
    pub lecturer_id: Option<StaffId>,
    pub semester: Semester,
    pub credit_units: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub lecturer_id: Option<StaffId>,
    pub semester: Option<Semester>,
    pub credit_units: Option<u8>,
}

fn validate_units(units: u8) -> DomainResult<u8> {
    if !(1..=10).contains(&units) {
        return Err(DomainError::validation("credit_units must be 1..=10"));
    }
    Ok(units)
}

impl Course {
    pub fn create(new: NewCourse, now: DateTime<Utc>) -> DomainResult<Self> {
        let code = new.code.trim().to_uppercase();
        if code.is_empty() {
            return Err(DomainError::validation("course code cannot be empty"));
        }
        let title = new.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("course title cannot be empty"));
        }
        Ok(Self {
            id: CourseId::new(),
            code,
            title,
            program_id: new.program_id,
            lecturer_id: new.lecturer_id,
            semester: new.semester,
            credit_units: validate_units(new.credit_units)?,
            created_at: now,
        })
    }

    pub fn apply_update(&mut self, update: CourseUpdate) -> DomainResult<()> {
        if let Some(title) = update.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(DomainError::validation("course title cannot be empty"));
            }
            self.title = title;
        }
        if let Some(lecturer_id) = update.lecturer_id {
            self.lecturer_id = Some(lecturer_id);
        }
        if let Some(semester) = update.semester {
            self.semester = semester;
        }
        if let Some(units) = update.credit_units {
            self.credit_units = validate_units(units)?;
        }
        Ok(())
    }

    /// Whether the given staff record owns (teaches) this course.
    pub fn is_taught_by(&self, staff_id: StaffId) -> bool {
        self.lecturer_id == Some(staff_id)
    }
}
