use thiserror::Error;

use crate::{Principal, Role};

/// Outcome of [`authorize`] when the guard denies.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not logged in")]
    Unauthorized,

    #[error("insufficient role")]
    Forbidden,
}

/// Decide whether a principal's role is in the allowed set.
///
/// - No principal denies, regardless of the allow-list.
/// - An empty allow-list always denies; there is no wildcard role.
///
/// Case variants never reach this function: roles are a closed enum decoded
/// at the boundary ([`Role::parse`]).
pub fn check_permission(principal: Option<&Principal>, allowed: &[Role]) -> bool {
    match principal {
        Some(p) => allowed.contains(&p.role),
        None => false,
    }
}

/// Guard combinator used by every action: authenticate, then authorize.
///
/// - No IO
/// - No panics
/// - Distinguishes "not logged in" from "wrong role" so boundaries can map
///   to 401 vs 403.
pub fn authorize<'p>(
    principal: Option<&'p Principal>,
    allowed: &[Role],
) -> Result<&'p Principal, AuthzError> {
    let p = principal.ok_or(AuthzError::Unauthorized)?;
    if check_permission(Some(p), allowed) {
        Ok(p)
    } else {
        Err(AuthzError::Forbidden)
    }
}
