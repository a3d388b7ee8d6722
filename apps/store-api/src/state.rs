//! Application state management.
//!
//! The state is cloned per handler (inexpensive Arc clones inside) and
//! carries the configuration, the PostgreSQL connection pool, and the
//! shared authentication state used by the auth middleware.

use std::sync::Arc;

use axum_helpers::JwtAuth;
use domain_users::{Argon2Hasher, AuthState, PostgresUserRepository, UserService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Auth handlers and middleware share this state
    pub auth: AuthState<PostgresUserRepository>,
}

impl AppState {
    pub fn new(config: crate::config::Config, db: database::postgres::DatabaseConnection) -> Self {
        let repository = PostgresUserRepository::new(db.clone());
        let jwt_auth = JwtAuth::new(&config.jwt);
        let service = UserService::new(repository, Arc::new(Argon2Hasher), Arc::new(jwt_auth));

        Self {
            config,
            db,
            auth: AuthState { service },
        }
    }
}
