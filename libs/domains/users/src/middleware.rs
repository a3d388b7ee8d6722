//! Request authentication middleware.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_helpers::AuthUser;

use crate::error::UserError;
use crate::handlers::AuthState;
use crate::repository::UserRepository;

/// Extract JWT from Authorization header or cookie
fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    // Try Authorization header first: "Bearer <token>"
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|s| s.to_string()))
        .or_else(|| {
            // Fallback to cookie: "access_token=<token>"
            headers
                .get("cookie")
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        let parts: Vec<&str> = cookie.trim().splitn(2, '=').collect();
                        if parts.len() == 2 && parts[0] == "access_token" {
                            Some(parts[1].to_string())
                        } else {
                            None
                        }
                    })
                })
        })
}

/// Authentication middleware.
///
/// Verifies the bearer token, loads the user from the repository, and
/// inserts an [`AuthUser`] into request extensions on success. Missing or
/// inactive accounts are rejected even when the token signature is valid.
///
/// # Example
///
/// ```ignore
/// let protected = Router::new()
///     .route("/check-status", get(check_status))
///     .layer(axum::middleware::from_fn_with_state(
///         auth_state.clone(),
///         require_auth,
///     ));
/// ```
pub async fn require_auth<R: UserRepository>(
    State(state): State<AuthState<R>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, UserError> {
    let token = match extract_token_from_request(&headers) {
        Some(t) => t,
        None => {
            tracing::debug!("No token found in Authorization header or cookie");
            return Err(UserError::Unauthorized("No token provided".to_string()));
        }
    };

    let user = state.service.authenticate(&token).await?;

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        roles: user.roles,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_token_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(
            extract_token_from_request(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_static("theme=dark; access_token=abc.def.ghi"),
        );
        assert_eq!(
            extract_token_from_request(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_extract_token_missing() {
        let headers = HeaderMap::new();
        assert_eq!(extract_token_from_request(&headers), None);
    }
}
