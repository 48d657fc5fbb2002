use serde::{Deserialize, Serialize};

use campuserp_core::UserId;

use crate::Role;

/// The authenticated identity derived from a verified session token.
///
/// Produced only by [`crate::SessionCodec::verify`]; immutable for the
/// lifetime of a request and never persisted — it is reconstructed from the
/// token on every access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}
