//! JWT authentication and role-based authorization.

pub mod config;
pub mod jwt;
pub mod roles;

pub use config::JwtConfig;
pub use jwt::{JwtAuth, JwtClaims};
pub use roles::{authorize, role_guard, AuthUser, RequiredRoles};
