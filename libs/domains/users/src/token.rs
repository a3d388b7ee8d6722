//! Token issuing behind a narrow trait so handlers and tests can swap
//! the signing backend.

use axum_helpers::JwtAuth;
use uuid::Uuid;

use crate::error::{UserError, UserResult};

/// Issues and verifies bearer tokens whose subject is a user id.
pub trait TokenIssuer: Send + Sync {
    /// Create a signed token for the given user.
    fn issue(&self, user_id: Uuid) -> UserResult<String>;

    /// Verify a token and return the user id it was issued for.
    fn verify(&self, token: &str) -> UserResult<Uuid>;
}

impl TokenIssuer for JwtAuth {
    fn issue(&self, user_id: Uuid) -> UserResult<String> {
        self.create_token(user_id).map_err(|e| {
            tracing::error!("Failed to create token: {:?}", e);
            UserError::Internal("Failed to create token".to_string())
        })
    }

    fn verify(&self, token: &str) -> UserResult<Uuid> {
        self.verify_subject(token)
            .map_err(|_| UserError::Unauthorized("Invalid token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_helpers::JwtConfig;

    #[test]
    fn test_issue_and_verify() {
        let auth = JwtAuth::new(&JwtConfig::new("test-secret-that-is-long-enough-32ch"));
        let user_id = Uuid::now_v7();
        let token = auth.issue(user_id).unwrap();
        assert_eq!(auth.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let auth = JwtAuth::new(&JwtConfig::new("test-secret-that-is-long-enough-32ch"));
        assert!(matches!(
            auth.verify("garbage"),
            Err(UserError::Unauthorized(_))
        ));
    }
}
