use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campuserp_core::{DomainError, DomainResult, ProgramId, StudentId, UserId};

/// Student record lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    #[default]
    Active,
    Suspended,
    Graduated,
    Withdrawn,
}

/// A student record.
///
/// `user_id` links the record to the login account; ownership-scoped actions
/// ("my profile", "my grades") resolve through this link and never through a
/// client-supplied id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub user_id: UserId,
    pub reg_no: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub program_id: Option<ProgramId>,
    /// Level of study (100, 200, ... up to 900 for extended programs).
    pub level: u16,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: StudentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a student.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStudent {
    pub user_id: UserId,
    pub reg_no: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub program_id: Option<ProgramId>,
    pub level: u16,
}

/// Registrar-side update (any administrative field).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub program_id: Option<ProgramId>,
    pub level: Option<u16>,
    pub status: Option<StudentStatus>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Self-service update: contact fields only.
///
/// Deliberately narrower than [`StudentUpdate`] so a student can never touch
/// their own status, level or registration number.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentContactUpdate {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
}

fn validate_email(email: &str) -> DomainResult<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::validation("invalid email format"));
    }
    Ok(email)
}

fn validate_name(name: &str, field: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(name.to_string())
}

fn validate_level(level: u16) -> DomainResult<u16> {
    if !(100..=900).contains(&level) || level % 100 != 0 {
        return Err(DomainError::validation("level must be 100..=900 in steps of 100"));
    }
    Ok(level)
}

impl Student {
    pub fn create(new: NewStudent, now: DateTime<Utc>) -> DomainResult<Self> {
        let reg_no = new.reg_no.trim().to_uppercase();
        if reg_no.is_empty() {
            return Err(DomainError::validation("reg_no cannot be empty"));
        }
        Ok(Self {
            id: StudentId::new(),
            user_id: new.user_id,
            reg_no,
            first_name: validate_name(&new.first_name, "first_name")?,
            last_name: validate_name(&new.last_name, "last_name")?,
            email: validate_email(&new.email)?,
            program_id: new.program_id,
            level: validate_level(new.level)?,
            phone: None,
            address: None,
            status: StudentStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a registrar-side update in place.
    pub fn apply_update(&mut self, update: StudentUpdate, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(first) = update.first_name {
            self.first_name = validate_name(&first, "first_name")?;
        }
        if let Some(last) = update.last_name {
            self.last_name = validate_name(&last, "last_name")?;
        }
        if let Some(email) = update.email {
            self.email = validate_email(&email)?;
        }
        if let Some(program_id) = update.program_id {
            self.program_id = Some(program_id);
        }
        if let Some(level) = update.level {
            self.level = validate_level(level)?;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone.trim().to_string());
        }
        if let Some(address) = update.address {
            self.address = Some(address.trim().to_string());
        }
        self.updated_at = now;
        Ok(())
    }

    /// Apply a self-service contact update in place.
    pub fn apply_contact_update(
        &mut self,
        update: StudentContactUpdate,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if let Some(email) = update.email {
            self.email = validate_email(&email)?;
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone.trim().to_string());
        }
        if let Some(address) = update.address {
            self.address = Some(address.trim().to_string());
        }
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_student() -> NewStudent {
        NewStudent {
            user_id: UserId::new(),
            reg_no: "cmp/2025/0412".to_string(),
            first_name: "Amaka".to_string(),
            last_name: "Obi".to_string(),
            email: "Amaka.Obi@Campus.EDU".to_string(),
            program_id: None,
            level: 200,
        }
    }

    #[test]
    fn create_normalizes_reg_no_and_email() {
        let s = Student::create(new_student(), Utc::now()).unwrap();
        assert_eq!(s.reg_no, "CMP/2025/0412");
        assert_eq!(s.email, "amaka.obi@campus.edu");
        assert_eq!(s.status, StudentStatus::Active);
    }

    #[test]
    fn create_rejects_bad_input() {
        let mut bad = new_student();
        bad.email = "no-at-sign".to_string();
        assert!(Student::create(bad, Utc::now()).is_err());

        let mut bad = new_student();
        bad.level = 250;
        assert!(Student::create(bad, Utc::now()).is_err());

        let mut bad = new_student();
        bad.first_name = "  ".to_string();
        assert!(Student::create(bad, Utc::now()).is_err());
    }

    #[test]
    fn contact_update_cannot_reach_administrative_fields() {
        let mut s = Student::create(new_student(), Utc::now()).unwrap();
        let before_level = s.level;
        let before_status = s.status;
        s.apply_contact_update(
            StudentContactUpdate {
                phone: Some("+2348012345678".to_string()),
                address: Some("12 Hall Road".to_string()),
                email: None,
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(s.level, before_level);
        assert_eq!(s.status, before_status);
        assert_eq!(s.phone.as_deref(), Some("+2348012345678"));
    }

    #[test]
    fn update_validates_changed_fields_only() {
        let mut s = Student::create(new_student(), Utc::now()).unwrap();
        let err = s.apply_update(
            StudentUpdate {
                email: Some("broken".to_string()),
                ..Default::default()
            },
            Utc::now(),
        );
        assert!(err.is_err());

        s.apply_update(
            StudentUpdate {
                level: Some(300),
                status: Some(StudentStatus::Suspended),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(s.level, 300);
        assert_eq!(s.status, StudentStatus::Suspended);
    }
}
