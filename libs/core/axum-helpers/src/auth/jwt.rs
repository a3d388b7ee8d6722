use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// JWT claims structure.
///
/// The payload carries only the user id. All other user attributes are
/// loaded from the database on every request so that stale or revoked
/// accounts are rejected even while their token is still unexpired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String, // Subject (user ID)
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token encoding failed: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
    #[error("token is invalid or expired")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("token subject is not a valid UUID")]
    BadSubject(#[from] uuid::Error),
}

/// Stateless HS256 JWT signer and verifier.
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
    ttl_secs: i64,
}

impl JwtAuth {
    /// Create a new JWT auth instance.
    ///
    /// # Example
    /// ```ignore
    /// use axum_helpers::{JwtAuth, JwtConfig};
    /// use core_config::FromEnv;
    ///
    /// let config = JwtConfig::from_env()?;
    /// let jwt_auth = JwtAuth::new(&config);
    /// ```
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            ttl_secs: config.ttl_secs,
        }
    }

    /// Create a signed token whose subject is the given user id.
    pub fn create_token(&self, user_id: Uuid) -> Result<String, JwtError> {
        let now = Utc::now();
        let exp = (now + Duration::seconds(self.ttl_secs)).timestamp();
        let iat = now.timestamp();

        let claims = JwtClaims {
            sub: user_id.to_string(),
            exp,
            iat,
        };

        let header = Header {
            alg: jsonwebtoken::Algorithm::HS256,
            ..Default::default()
        };

        encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(JwtError::Encode)
    }

    /// Verify the token signature and expiry and decode claims.
    pub fn verify_token(&self, token: &str) -> Result<JwtClaims, JwtError> {
        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(JwtError::Invalid)?;

        Ok(token_data.claims)
    }

    /// Verify the token and parse its subject as a user id.
    pub fn verify_subject(&self, token: &str) -> Result<Uuid, JwtError> {
        let claims = self.verify_token(token)?;
        Ok(Uuid::parse_str(&claims.sub)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("test-secret-that-is-long-enough-32ch"))
    }

    #[test]
    fn test_round_trip() {
        let auth = auth();
        let user_id = Uuid::now_v7();
        let token = auth.create_token(user_id).unwrap();
        let subject = auth.verify_subject(&token).unwrap();
        assert_eq!(subject, user_id);
    }

    #[test]
    fn test_claims_carry_expiry() {
        let auth = auth();
        let token = auth.create_token(Uuid::now_v7()).unwrap();
        let claims = auth.verify_token(&token).unwrap();
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp - claims.iat, super::super::config::DEFAULT_TOKEN_TTL_SECS);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let auth_a = auth();
        let auth_b = JwtAuth::new(&JwtConfig::new("another-secret-that-is-long-enough!!"));
        let token = auth_a.create_token(Uuid::now_v7()).unwrap();
        assert!(matches!(
            auth_b.verify_token(&token),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let auth = auth();
        assert!(auth.verify_token("not.a.token").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Expired well past the default validation leeway (60s)
        let config = JwtConfig::new("test-secret-that-is-long-enough-32ch").with_ttl(-3600);
        let auth = JwtAuth::new(&config);
        let token = auth.create_token(Uuid::now_v7()).unwrap();
        assert!(matches!(
            auth.verify_token(&token),
            Err(JwtError::Invalid(_))
        ));
    }
}
