use chrono::{DateTime, Utc};
use serde::Serialize;

use campuserp_core::{DomainError, DomainResult, UserId};

use crate::roles::Role;

/// A login-capable account.
///
/// `password_hash` is a bcrypt hash; plaintext never leaves the login
/// handler. Emails are stored lowercase and the store enforces uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUserAccount {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub display_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserAccountUpdate {
    pub email: Option<String>,
    pub role: Option<Role>,
    pub display_name: Option<String>,
    pub password_hash: Option<String>,
}

fn normalize_email(email: &str) -> DomainResult<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::validation("invalid email address"));
    }
    Ok(email)
}

impl UserAccount {
    pub fn create(new: NewUserAccount, now: DateTime<Utc>) -> DomainResult<Self> {
        let display_name = new.display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(DomainError::validation("display_name cannot be empty"));
        }
        Ok(Self {
            id: UserId::new(),
            email: normalize_email(&new.email)?,
            password_hash: new.password_hash,
            role: new.role,
            display_name,
            created_at: now,
        })
    }

    pub fn apply_update(&mut self, update: UserAccountUpdate) -> DomainResult<()> {
        if let Some(email) = update.email {
            self.email = normalize_email(&email)?;
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(display_name) = update.display_name {
            let display_name = display_name.trim().to_string();
            if display_name.is_empty() {
                return Err(DomainError::validation("display_name cannot be empty"));
            }
            self.display_name = display_name;
        }
        if let Some(password_hash) = update.password_hash {
            self.password_hash = password_hash;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account() -> NewUserAccount {
        NewUserAccount {
            email: " Dean@Example.EDU ".to_string(),
            password_hash: "$2b$04$stub".to_string(),
            role: Role::Registrar,
            display_name: "Dean Okafor".to_string(),
        }
    }

    #[test]
    fn create_normalizes_email() {
        let account = UserAccount::create(new_account(), Utc::now()).unwrap();
        assert_eq!(account.email, "dean@example.edu");
    }

    #[test]
    fn create_rejects_bad_email() {
        let mut bad = new_account();
        bad.email = "not-an-email".to_string();
        assert!(UserAccount::create(bad, Utc::now()).is_err());
    }

    #[test]
    fn password_hash_never_serializes() {
        let account = UserAccount::create(new_account(), Utc::now()).unwrap();
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("$2b$"));
    }
}
