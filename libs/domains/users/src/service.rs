use std::sync::Arc;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::hasher::PasswordHasher;
use crate::models::{normalize_email, AuthResponse, LoginRequest, RegisterRequest, User};
use crate::repository::UserRepository;
use crate::token::TokenIssuer;

/// Service layer for User business logic.
///
/// Hashing and token signing are injected so tests can substitute
/// cheap implementations.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

// Manual impl: every field is an Arc, so no `R: Clone` bound is needed
impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            hasher: Arc::clone(&self.hasher),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(
        repository: R,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            hasher,
            tokens,
        }
    }

    /// Register a new user and return the created user with a fresh token.
    pub async fn register(&self, input: RegisterRequest) -> UserResult<AuthResponse> {
        self.validate_password(&input.password)?;

        let email = normalize_email(&input.email);

        // Cheap pre-check; the unique index still catches races
        if self.repository.email_exists(&email).await? {
            return Err(UserError::DuplicateEmail(email));
        }

        let password_hash = self.hasher.hash(&input.password)?;

        let user = User::new(email, input.full_name, password_hash);
        let created = self.repository.create(user).await?;

        let token = self.tokens.issue(created.id)?;

        tracing::info!(user_id = %created.id, email = %created.email, "User registered");
        Ok(AuthResponse {
            user: created.into(),
            token,
        })
    }

    /// Verify credentials and return the user with a fresh token.
    pub async fn login(&self, input: LoginRequest) -> UserResult<AuthResponse> {
        let email = normalize_email(&input.email);

        let user = self
            .repository
            .get_by_email(&email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.hasher.verify(&input.password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(UserError::InactiveAccount);
        }

        let token = self.tokens.issue(user.id)?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    /// Re-issue a token for an already-authenticated user.
    pub async fn check_status(&self, user_id: Uuid) -> UserResult<AuthResponse> {
        let user = self
            .repository
            .get_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))?;

        let token = self.tokens.issue(user.id)?;

        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    /// Resolve a bearer token to a live user.
    ///
    /// The token only carries the user id; the account is re-read on every
    /// request so deleted or deactivated users are rejected immediately.
    pub async fn authenticate(&self, token: &str) -> UserResult<User> {
        let user_id = self.tokens.verify(token)?;

        let user = self
            .repository
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| UserError::Unauthorized("Token is not valid".to_string()))?;

        if !user.is_active {
            return Err(UserError::InactiveAccount);
        }

        Ok(user)
    }

    fn validate_password(&self, password: &str) -> UserResult<()> {
        if password.len() < 6 {
            return Err(UserError::Validation(
                "Password must be at least 6 characters".to_string(),
            ));
        }

        if password.len() > 50 {
            return Err(UserError::Validation(
                "Password cannot exceed 50 characters".to_string(),
            ));
        }

        let has_upper = password.chars().any(|c| c.is_uppercase());
        let has_lower = password.chars().any(|c| c.is_lowercase());
        let has_digit = password.chars().any(|c| c.is_numeric());

        if !(has_upper && has_lower && has_digit) {
            return Err(UserError::Validation(
                "The password must have an uppercase, lowercase letter and a number".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::Argon2Hasher;
    use crate::repository::InMemoryUserRepository;
    use axum_helpers::{JwtAuth, JwtConfig};

    fn test_service() -> UserService<InMemoryUserRepository> {
        let jwt = JwtAuth::new(&JwtConfig::new("test-secret-that-is-long-enough-32ch"));
        UserService::new(
            InMemoryUserRepository::new(),
            Arc::new(Argon2Hasher),
            Arc::new(jwt),
        )
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "Abc123def".to_string(),
            full_name: "Test User".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let service = test_service();
        let response = service
            .register(register_request("  Ada@Example.COM "))
            .await
            .unwrap();
        assert_eq!(response.user.email, "ada@example.com");
        assert!(!response.token.is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password() {
        let service = test_service();
        let mut input = register_request("ada@example.com");
        input.password = "alllowercase".to_string();
        assert!(matches!(
            service.register(input).await,
            Err(UserError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let service = test_service();
        service
            .register(register_request("ada@example.com"))
            .await
            .unwrap();

        // Same address with different casing collides after normalization
        let result = service.register(register_request("ADA@example.com")).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_login_round_trip() {
        let service = test_service();
        service
            .register(register_request("ada@example.com"))
            .await
            .unwrap();

        let response = service
            .login(LoginRequest {
                email: "Ada@Example.com".to_string(),
                password: "Abc123def".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let service = test_service();
        service
            .register(register_request("ada@example.com"))
            .await
            .unwrap();

        let result = service
            .login(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "Wrong123".to_string(),
            })
            .await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let service = test_service();
        let result = service
            .login(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "Abc123def".to_string(),
            })
            .await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_resolves_user() {
        let service = test_service();
        let registered = service
            .register(register_request("ada@example.com"))
            .await
            .unwrap();

        let user = service.authenticate(&registered.token).await.unwrap();
        assert_eq!(user.id, registered.user.id);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_bad_token() {
        let service = test_service();
        assert!(matches!(
            service.authenticate("garbage").await,
            Err(UserError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_deleted_user() {
        let service = test_service();
        let jwt = JwtAuth::new(&JwtConfig::new("test-secret-that-is-long-enough-32ch"));
        // Token signed for a user that was never persisted
        let token = jwt.create_token(Uuid::now_v7()).unwrap();
        assert!(matches!(
            service.authenticate(&token).await,
            Err(UserError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_check_status_reissues_token() {
        let service = test_service();
        let registered = service
            .register(register_request("ada@example.com"))
            .await
            .unwrap();

        let status = service.check_status(registered.user.id).await.unwrap();
        assert_eq!(status.user.id, registered.user.id);
        assert!(!status.token.is_empty());
    }
}
