//! Role-based access control for protected routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ErrorResponse;

/// Authenticated user attached to request extensions by the auth middleware.
///
/// Downstream handlers and guards read this instead of re-verifying the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub roles: Vec<String>,
}

/// Roles a route demands. An empty list means authentication only.
#[derive(Debug, Clone, Default)]
pub struct RequiredRoles(pub Vec<String>);

impl RequiredRoles {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(roles.into_iter().map(Into::into).collect())
    }
}

/// Decide whether a set of user roles satisfies a route's requirement.
///
/// Grants access when no roles are required, or when the user holds at
/// least one of the required roles. Matching is case-sensitive.
pub fn authorize(required: &[String], user_roles: &[String]) -> bool {
    if required.is_empty() {
        return true;
    }
    user_roles.iter().any(|role| required.contains(role))
}

/// Middleware enforcing [`RequiredRoles`] against the request's [`AuthUser`].
///
/// Returns 401 when no authenticated user is present and roles are required,
/// 403 when the user holds none of the required roles.
///
/// # Example
/// ```ignore
/// use axum_helpers::{role_guard, RequiredRoles};
///
/// let admin_routes = Router::new()
///     .route("/products/{id}", delete(delete_product))
///     .layer(axum::middleware::from_fn_with_state(
///         RequiredRoles::new(["admin", "super-user"]),
///         role_guard,
///     ));
/// ```
pub async fn role_guard(
    State(required): State<RequiredRoles>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    if required.0.is_empty() {
        return Ok(next.run(request).await);
    }

    let user = match request.extensions().get::<AuthUser>() {
        Some(user) => user.clone(),
        None => {
            tracing::debug!("role guard hit without an authenticated user");
            return Err(unauthorized("User not found in request"));
        }
    };

    if authorize(&required.0, &user.roles) {
        return Ok(next.run(request).await);
    }

    tracing::info!(
        user_id = %user.id,
        required = ?required.0,
        "access denied: insufficient roles"
    );
    Err(forbidden(format!(
        "User {} needs a valid role: [{}]",
        user.full_name,
        required.0.join(", ")
    )))
}

fn unauthorized(message: impl Into<String>) -> Response {
    let body = Json(ErrorResponse {
        error: "Unauthorized".to_string(),
        message: message.into(),
        details: None,
    });
    (StatusCode::UNAUTHORIZED, body).into_response()
}

fn forbidden(message: impl Into<String>) -> Response {
    let body = Json(ErrorResponse {
        error: "Forbidden".to_string(),
        message: message.into(),
        details: None,
    });
    (StatusCode::FORBIDDEN, body).into_response()
}
