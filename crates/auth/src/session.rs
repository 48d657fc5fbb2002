use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Principal, Role};

/// Session lifetime. There is no refresh mechanism; expiry forces re-login.
pub const SESSION_TTL_MINUTES: i64 = 30;

/// Fatal configuration failure, surfaced at process start — never per-request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("session signing secret is not configured")]
    MissingSecret,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to encode session token: {0}")]
    Encode(String),
}

/// Wire shape of the signed token payload.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    /// User id (uuid string).
    sub: String,
    email: String,
    /// Raw role name; decoded through the closed [`Role`] set on verify.
    role: String,
    /// Issued-at (seconds since epoch).
    iat: i64,
    /// Expiry (seconds since epoch).
    exp: i64,
}

/// Signed, time-limited session token codec (HS256).
///
/// The secret is process-wide and read-only after startup; there is no
/// server-side session store, so revocation before expiry is not possible.
/// That is an accepted property of the design, not a gap.
pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec").finish_non_exhaustive()
    }
}

impl SessionCodec {
    pub fn new(secret: &str) -> Result<Self, ConfigError> {
        if secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        let mut validation = Validation::new(Algorithm::HS256);
        // Token expiry is authoritative; no grace window.
        validation.leeway = 0;
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Issue a token for `principal`, expiring [`SESSION_TTL_MINUTES`] from now.
    pub fn issue(&self, principal: &Principal) -> Result<String, SessionError> {
        self.issue_at(principal, Utc::now())
    }

    /// Issue with an explicit clock (tests mint backdated tokens this way).
    pub fn issue_at(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<String, SessionError> {
        let iat = now.timestamp();
        let claims = SessionClaims {
            sub: principal.user_id.to_string(),
            email: principal.email.clone(),
            role: principal.role.as_str().to_string(),
            iat,
            exp: iat + SESSION_TTL_MINUTES * 60,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| SessionError::Encode(e.to_string()))
    }

    /// Verify signature and expiry and decode the principal.
    ///
    /// Every failure mode (bad signature, malformed payload, expired token,
    /// unrecognized role) is uniformly `None` — callers cannot distinguish
    /// which occurred, and neither can a probing client.
    pub fn verify(&self, token: &str) -> Option<Principal> {
        let data = match jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.validation)
        {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!("session token rejected: {}", e);
                return None;
            }
        };
        let user_id = data.claims.sub.parse().ok()?;
        let role = Role::parse(&data.claims.role)?;
        Some(Principal {
            user_id,
            email: data.claims.email,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campuserp_core::UserId;
    use chrono::Duration;

    fn codec(secret: &str) -> SessionCodec {
        SessionCodec::new(secret).unwrap()
    }

    fn principal(role: Role) -> Principal {
        Principal {
            user_id: UserId::new(),
            email: "amaka@campus.edu".to_string(),
            role,
        }
    }

    #[test]
    fn empty_secret_is_a_config_error() {
        assert_eq!(
            SessionCodec::new("").unwrap_err(),
            ConfigError::MissingSecret
        );
        assert_eq!(
            SessionCodec::new("   ").unwrap_err(),
            ConfigError::MissingSecret
        );
    }

    #[test]
    fn issue_then_verify_round_trips() {
        let codec = codec("test-secret");
        let p = principal(Role::Registrar);
        let token = codec.issue(&p).unwrap();
        let back = codec.verify(&token).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn backdated_expiry_fails_even_with_valid_signature() {
        let codec = codec("test-secret");
        let p = principal(Role::Student);
        let token = codec
            .issue_at(&p, Utc::now() - Duration::minutes(SESSION_TTL_MINUTES + 5))
            .unwrap();
        assert_eq!(codec.verify(&token), None);
    }

    #[test]
    fn token_just_inside_ttl_still_verifies() {
        let codec = codec("test-secret");
        let p = principal(Role::Student);
        let token = codec
            .issue_at(&p, Utc::now() - Duration::minutes(SESSION_TTL_MINUTES - 1))
            .unwrap();
        assert!(codec.verify(&token).is_some());
    }

    #[test]
    fn tampered_token_fails_like_a_missing_one() {
        let codec = codec("test-secret");
        let p = principal(Role::Admin);
        let token = codec.issue(&p).unwrap();

        // Flip a character in the signature segment.
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert_eq!(codec.verify(&tampered), None);
        assert_eq!(codec.verify(""), None);
        assert_eq!(codec.verify("not.a.jwt"), None);
    }

    #[test]
    fn token_signed_with_other_secret_rejected() {
        let a = codec("secret-a");
        let b = codec("secret-b");
        let token = a.issue(&principal(Role::Admin)).unwrap();
        assert_eq!(b.verify(&token), None);
    }

    #[test]
    fn unrecognized_role_in_payload_yields_no_principal() {
        // Mint a structurally valid token whose role is outside the closed set.
        let secret = "test-secret";
        let codec = codec(secret);
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: UserId::new().to_string(),
            email: "x@campus.edu".to_string(),
            role: "administrator".to_string(),
            iat: now,
            exp: now + 600,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();
        assert_eq!(codec.verify(&token), None);
    }
}
