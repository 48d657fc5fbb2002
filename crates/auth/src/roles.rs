use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role used for coarse-grained access control.
///
/// Roles are a closed set, decoded once at the boundary: a token or account
/// row carrying an unrecognized role string yields no principal instead of
/// silently passing an opaque string around. Parsing is case-insensitive
/// because stored data is inconsistently cased (`"ADMIN"`, `"Admin"`,
/// `"admin"` all occur); the legacy numeric id `"1"` is an accepted alias
/// for admin. `"administrator"` is deliberately NOT accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    Admin,
    Registrar,
    Hod,
    Accountant,
    Lecturer,
    Staff,
    Student,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognized role '{0}'")]
pub struct RoleParseError(pub String);

impl Role {
    /// Canonical lowercase name (the form serialized and returned over HTTP).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Registrar => "registrar",
            Role::Hod => "hod",
            Role::Accountant => "accountant",
            Role::Lecturer => "lecturer",
            Role::Staff => "staff",
            Role::Student => "student",
        }
    }

    /// Case-insensitive parse; `None` for anything outside the closed set.
    pub fn parse(s: &str) -> Option<Role> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" | "1" => Some(Role::Admin),
            "registrar" => Some(Role::Registrar),
            "hod" => Some(Role::Hod),
            "accountant" => Some(Role::Accountant),
            "lecturer" => Some(Role::Lecturer),
            "staff" => Some(Role::Staff),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

impl core::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| RoleParseError(s.to_string()))
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = RoleParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}
