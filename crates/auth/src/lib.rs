//! `campuserp-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: the session
//! codec works on strings, the permission check on decoded principals. The
//! API layer wires both into the request path.

pub mod account;
pub mod password;
pub mod permission;
pub mod principal;
pub mod roles;
pub mod session;

pub use account::{NewUserAccount, UserAccount, UserAccountUpdate};
pub use password::{hash_password, hash_password_with_cost, verify_password, PasswordError};
pub use permission::{authorize, check_permission, AuthzError};
pub use principal::Principal;
pub use roles::Role;
pub use session::{ConfigError, SessionCodec, SessionError, SESSION_TTL_MINUTES};
