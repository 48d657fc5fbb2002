use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campuserp_core::{DomainError, DomainResult, StaffId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StaffStatus {
    #[default]
    Active,
    OnLeave,
    Retired,
}

/// A staff record (lecturers, registrars, bursary staff, department heads).
///
/// Like [`crate::Student`], `user_id` links to the login account and is the
/// only path to self-scoped data ("my courses").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub user_id: UserId,
    pub staff_no: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub designation: String,
    pub status: StaffStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStaff {
    pub user_id: UserId,
    pub staff_no: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub designation: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub status: Option<StaffStatus>,
}

fn required(value: &str, field: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(value.to_string())
}

impl Staff {
    pub fn create(new: NewStaff, now: DateTime<Utc>) -> DomainResult<Self> {
        let email = new.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }
        Ok(Self {
            id: StaffId::new(),
            user_id: new.user_id,
            staff_no: required(&new.staff_no, "staff_no")?.to_uppercase(),
            first_name: required(&new.first_name, "first_name")?,
            last_name: required(&new.last_name, "last_name")?,
            email,
            department: required(&new.department, "department")?,
            designation: required(&new.designation, "designation")?,
            status: StaffStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_update(&mut self, update: StaffUpdate, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(first) = update.first_name {
            self.first_name = required(&first, "first_name")?;
        }
        if let Some(last) = update.last_name {
            self.last_name = required(&last, "last_name")?;
        }
        if let Some(email) = update.email {
            let email = email.trim().to_lowercase();
            if email.is_empty() || !email.contains('@') {
                return Err(DomainError::validation("invalid email format"));
            }
            self.email = email;
        }
        if let Some(department) = update.department {
            self.department = required(&department, "department")?;
        }
        if let Some(designation) = update.designation {
            self.designation = required(&designation, "designation")?;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_staff() -> NewStaff {
        NewStaff {
            user_id: UserId::new(),
            staff_no: "stf-0098".to_string(),
            first_name: "Ngozi".to_string(),
            last_name: "Eze".to_string(),
            email: "Ngozi.Eze@campus.edu".to_string(),
            department: "Computer Science".to_string(),
            designation: "Senior Lecturer".to_string(),
        }
    }

    #[test]
    fn create_normalizes_identifiers() {
        let s = Staff::create(new_staff(), Utc::now()).unwrap();
        assert_eq!(s.staff_no, "STF-0098");
        assert_eq!(s.email, "ngozi.eze@campus.edu");
        assert_eq!(s.status, StaffStatus::Active);
    }

    #[test]
    fn create_rejects_missing_fields() {
        let mut bad = new_staff();
        bad.department = String::new();
        assert!(Staff::create(bad, Utc::now()).is_err());

        let mut bad = new_staff();
        bad.email = "nope".to_string();
        assert!(Staff::create(bad, Utc::now()).is_err());
    }

    #[test]
    fn update_changes_only_requested_fields() {
        let mut s = Staff::create(new_staff(), Utc::now()).unwrap();
        s.apply_update(
            StaffUpdate {
                designation: Some("Professor".to_string()),
                status: Some(StaffStatus::OnLeave),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(s.designation, "Professor");
        assert_eq!(s.status, StaffStatus::OnLeave);
        assert_eq!(s.first_name, "Ngozi");
    }
}
