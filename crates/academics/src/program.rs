use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campuserp_core::{DomainError, DomainResult, ProgramId};

/// An academic program (degree course of study).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub code: String,
    pub title: String,
    pub department: String,
    pub duration_years: u8,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProgram {
    pub code: String,
    pub title: String,
    pub department: String,
    pub duration_years: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgramUpdate {
    pub title: Option<String>,
    pub department: Option<String>,
    pub duration_years: Option<u8>,
}

impl Program {
    pub fn create(new: NewProgram, now: DateTime<Utc>) -> DomainResult<Self> {
        let code = new.code.trim().to_uppercase();
        if code.is_empty() {
            return Err(DomainError::validation("program code cannot be empty"));
        }
        let title = new.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("program title cannot be empty"));
        }
        if !(1..=7).contains(&new.duration_years) {
            return Err(DomainError::validation("duration_years must be 1..=7"));
        }
        Ok(Self {
            id: ProgramId::new(),
            code,
            title,
            department: new.department.trim().to_string(),
            duration_years: new.duration_years,
            created_at: now,
        })
    }

    pub fn apply_update(&mut self, update: ProgramUpdate) -> DomainResult<()> {
        if let Some(title) = update.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(DomainError::validation("program title cannot be empty"));
            }
            self.title = title;
        }
        if let Some(department) = update.department {
            self.department = department.trim().to_string();
        }
        if let Some(years) = update.duration_years {
            if !(1..=7).contains(&years) {
                return Err(DomainError::validation("duration_years must be 1..=7"));
            }
            self.duration_years = years;
        }
        Ok(())
    }
}
