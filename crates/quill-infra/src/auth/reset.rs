//! Password-reset tokens - short-lived signed capabilities.
//!
//! A reset token is computed from the user id, the process secret and the
//! clock; nothing is stored server-side, so there is no expired-token
//! cleanup. Verification recomputes instead of looking anything up, and
//! every failure mode - bad signature, malformed token, expired - is the
//! same `None`.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::ports::{AuthError, ResetTokenService};

use super::session::DEFAULT_SECRET;

/// Claim value separating reset tokens from session tokens signed with
/// the same process secret.
const RESET_PURPOSE: &str = "password_reset";

/// Reset token configuration.
#[derive(Debug, Clone)]
pub struct ResetTokenConfig {
    pub secret: String,
    pub expiration_minutes: i64,
}

impl Default for ResetTokenConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_minutes: 30,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    sub: String,
    exp: i64,
    iat: i64,
    purpose: String,
}

/// JWT-based reset token service.
pub struct JwtResetTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: ResetTokenConfig,
}

impl JwtResetTokenService {
    pub fn new(config: ResetTokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }

    pub fn from_env() -> Self {
        let config = ResetTokenConfig {
            secret: std::env::var("APP_SECRET").unwrap_or_else(|_| DEFAULT_SECRET.to_string()),
            expiration_minutes: std::env::var("RESET_TTL_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        };
        Self::new(config)
    }
}

impl ResetTokenService for JwtResetTokenService {
    fn issue(&self, user_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + TimeDelta::minutes(self.config.expiration_minutes);

        let claims = ResetClaims {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            purpose: RESET_PURPOSE.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn verify(&self, token: &str) -> Option<Uuid> {
        let token_data =
            decode::<ResetClaims>(token, &self.decoding_key, &Validation::default()).ok()?;

        if token_data.claims.purpose != RESET_PURPOSE {
            return None;
        }

        Uuid::parse_str(&token_data.claims.sub).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtResetTokenService {
        JwtResetTokenService::new(ResetTokenConfig {
            secret: "test-secret-key".to_string(),
            expiration_minutes: 30,
        })
    }

    #[test]
    fn test_issue_then_verify_returns_issuing_user() {
        let service = service();
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id).unwrap();

        assert_eq!(service.verify(&token), Some(user_id));
    }

    #[test]
    fn test_token_never_verifies_to_another_user() {
        let service = service();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let token = service.issue(alice).unwrap();
        let verified = service.verify(&token).unwrap();

        assert_eq!(verified, alice);
        assert_ne!(verified, bob);
    }

    #[test]
    fn test_expired_token_returns_none() {
        // Expired well past jsonwebtoken's default 60s leeway.
        let service = JwtResetTokenService::new(ResetTokenConfig {
            secret: "test-secret-key".to_string(),
            expiration_minutes: -5,
        });

        let token = service.issue(Uuid::new_v4()).unwrap();

        assert_eq!(service.verify(&token), None);
    }

    #[test]
    fn test_tampered_signature_returns_none() {
        let service = service();
        let token = service.issue(Uuid::new_v4()).unwrap();

        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert_eq!(service.verify(&tampered), None);
    }

    #[test]
    fn test_malformed_token_returns_none() {
        let service = service();

        assert_eq!(service.verify(""), None);
        assert_eq!(service.verify("definitely.not.a-token"), None);
    }

    #[test]
    fn test_wrong_purpose_returns_none() {
        // A token signed with the right secret but without the reset
        // purpose (e.g. a session token) must not unlock a reset.
        let service = service();
        let claims = ResetClaims {
            sub: Uuid::new_v4().to_string(),
            exp: (Utc::now() + TimeDelta::minutes(30)).timestamp(),
            iat: Utc::now().timestamp(),
            purpose: "session".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key"),
        )
        .unwrap();

        assert_eq!(service.verify(&token), None);
    }

    #[test]
    fn test_secret_rotation_invalidates_outstanding_tokens() {
        let before = service();
        let after = JwtResetTokenService::new(ResetTokenConfig {
            secret: "rotated-secret".to_string(),
            expiration_minutes: 30,
        });

        let token = before.issue(Uuid::new_v4()).unwrap();

        assert_eq!(after.verify(&token), None);
    }
}
