//! Identity resolution from bearer credentials.
//!
//! Tokens are issued by the auth service (HS256, shared secret) with the
//! user identifier in the `id` claim. The answer path treats any decode
//! failure as a legitimate anonymous caller; only the history path turns
//! a missing or invalid credential into an error.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Configuration for credential verification.
#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    /// Shared HS256 secret, matching the token issuer.
    pub secret: String,
}

/// Errors for the authenticated history path.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization` header was sent.
    #[error("Authorization credential is required")]
    MissingCredential,
    /// The credential did not decode to a usable identity.
    #[error("Authorization credential is invalid or expired")]
    InvalidCredential,
}

/// The decoded owner reference derived from a bearer credential.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Identity {
    /// Stable user identifier from the token's `id` claim.
    pub user_id: String,
}

/// Claims this subsystem reads from issued tokens.
///
/// Issued tokens also carry `email`, `iat`, and `exp`; expiry is checked
/// by the decoder and the rest is ignored here.
#[derive(Debug, Deserialize)]
struct Claims {
    id: String,
}

/// Decodes optional bearer credentials into identities.
pub struct IdentityResolver {
    key: DecodingKey,
    validation: Validation,
}

impl IdentityResolver {
    /// Create a resolver for the given auth configuration.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Resolve an optional `Authorization` header value into an identity.
    ///
    /// Absent, malformed, expired, or badly-signed credentials all yield
    /// `None`; this never surfaces an error to the caller.
    #[must_use]
    pub fn resolve(&self, header: Option<&str>) -> Option<Identity> {
        let token = header?.strip_prefix("Bearer ")?.trim();
        if token.is_empty() {
            return None;
        }

        match decode::<Claims>(token, &self.key, &self.validation) {
            Ok(data) if !data.claims.id.is_empty() => Some(Identity {
                user_id: data.claims.id,
            }),
            Ok(_) => {
                debug!("bearer token decoded without a user id");
                None
            }
            Err(err) => {
                debug!(%err, "bearer token rejected");
                None
            }
        }
    }

    /// Resolve a header value, treating absence or invalidity as an error.
    ///
    /// # Errors
    /// Returns [`AuthError::MissingCredential`] when no header was sent
    /// and [`AuthError::InvalidCredential`] when the token is unusable.
    pub fn require(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        match header {
            None => Err(AuthError::MissingCredential),
            Some(_) => self.resolve(header).ok_or(AuthError::InvalidCredential),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    const SECRET: &str = "unit-test-secret";

    #[derive(Serialize)]
    struct TestClaims {
        id: String,
        email: String,
        exp: i64,
    }

    fn resolver() -> IdentityResolver {
        IdentityResolver::new(&AuthConfig {
            secret: SECRET.to_string(),
        })
    }

    fn token(id: &str, secret: &str, exp_offset_secs: i64) -> String {
        let claims = TestClaims {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            exp: Utc::now().timestamp() + exp_offset_secs,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_resolves_identity() {
        let header = format!("Bearer {}", token("user-7", SECRET, 3600));
        let identity = resolver().resolve(Some(&header));
        assert_eq!(
            identity,
            Some(Identity {
                user_id: "user-7".to_string()
            })
        );
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        assert!(resolver().resolve(None).is_none());
    }

    #[test]
    fn test_malformed_header_is_anonymous() {
        let resolver = resolver();
        assert!(resolver.resolve(Some("not-a-bearer")).is_none());
        assert!(resolver.resolve(Some("Bearer ")).is_none());
        assert!(resolver.resolve(Some("Bearer garbage.garbage.garbage")).is_none());
    }

    #[test]
    fn test_wrong_secret_is_anonymous() {
        let header = format!("Bearer {}", token("user-7", "another-secret", 3600));
        assert!(resolver().resolve(Some(&header)).is_none());
    }

    #[test]
    fn test_expired_token_is_anonymous() {
        // Well past the decoder's default leeway.
        let header = format!("Bearer {}", token("user-7", SECRET, -86_400));
        assert!(resolver().resolve(Some(&header)).is_none());
    }

    #[test]
    fn test_require_rejects_missing_credential() {
        let err = resolver().require(None).unwrap_err();
        assert!(matches!(err, AuthError::MissingCredential));
    }

    #[test]
    fn test_require_rejects_invalid_credential() {
        let err = resolver().require(Some("Bearer nope")).unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredential));
    }

    #[test]
    fn test_require_accepts_valid_credential() {
        let header = format!("Bearer {}", token("user-9", SECRET, 3600));
        let identity = resolver().require(Some(&header)).unwrap();
        assert_eq!(identity.user_id, "user-9");
    }
}
