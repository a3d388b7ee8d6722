//! # Axum Helpers
//!
//! Utilities, middleware, and helpers shared by the store's Axum services.
//!
//! ## Modules
//!
//! - **[`auth`]**: JWT signing/verification, the role authorization check,
//!   and the role-guard route layer
//! - **[`server`]**: router assembly with OpenAPI docs, health endpoints,
//!   graceful shutdown
//! - **[`errors`]**: structured error responses
//! - **[`extractors`]**: custom extractors (UUID path, validated JSON)
//! - **[`audit`]**: audit logging for security-relevant events

pub mod audit;
pub mod auth;
pub mod errors;
pub mod extractors;
pub mod server;

// Re-export auth types
pub use auth::{
    authorize, role_guard, AuthUser, JwtAuth, JwtClaims, JwtConfig, RequiredRoles,
};

// Re-export server types
pub use server::{
    create_app, create_production_app, create_router, health_router, shutdown_signal,
    HealthResponse, ShutdownCoordinator,
};

// Re-export error types
pub use errors::{AppError, ErrorResponse};

// Re-export extractors
pub use extractors::{UuidPath, ValidatedJson};

// Re-export audit types
pub use audit::{extract_ip_from_headers, extract_user_agent, AuditEvent, AuditOutcome};
