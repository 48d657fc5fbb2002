use campuserp_auth::{Principal, Role};
use campuserp_core::UserId;

/// Principal context for a request (authenticated identity + role).
///
/// Reconstructed from the session token on every request by the auth
/// middleware; never persisted, never shared across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn user_id(&self) -> UserId {
        self.principal.user_id
    }

    pub fn role(&self) -> Role {
        self.principal.role
    }
}
