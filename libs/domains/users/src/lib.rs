//! User domain: registration, login, and token-based authentication.

pub mod error;
pub mod handlers;
pub mod hasher;
pub mod middleware;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod token;

pub use error::{UserError, UserResult};
pub use handlers::{create_auth_router, AuthApiDoc, AuthState};
pub use hasher::{Argon2Hasher, PasswordHasher};
pub use middleware::require_auth;
pub use models::{
    normalize_email, AuthResponse, LoginRequest, RegisterRequest, User, UserResponse,
};
pub use postgres::PostgresUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
pub use token::TokenIssuer;
