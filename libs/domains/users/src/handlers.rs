use axum::{
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        UnauthorizedResponse,
    },
    extract_ip_from_headers, extract_user_agent, AuditEvent, AuditOutcome, AuthUser, ValidatedJson,
};
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::middleware::require_auth;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

const TAG: &str = "auth";

/// OpenAPI documentation for the Auth API
#[derive(OpenApi)]
#[openapi(
    paths(register, login, check_status),
    components(
        schemas(RegisterRequest, LoginRequest, AuthResponse, UserResponse),
        responses(
            BadRequestValidationResponse,
            UnauthorizedResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Registration and authentication endpoints")
    )
)]
pub struct AuthApiDoc;

/// Shared state for auth handlers and the authentication middleware.
pub struct AuthState<R: UserRepository> {
    pub service: UserService<R>,
}

// Manual impl so the repository type itself does not have to be Clone
impl<R: UserRepository> Clone for AuthState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

/// Create the auth router with all HTTP endpoints
pub fn create_auth_router<R: UserRepository + 'static>(state: AuthState<R>) -> Router {
    let protected = Router::new()
        .route("/check-status", get(check_status))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
        .with_state(state)
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/register",
    tag = TAG,
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: UserRepository>(
    axum::extract::State(state): axum::extract::State<AuthState<R>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> UserResult<impl IntoResponse> {
    let response = state.service.register(input).await?;

    AuditEvent::new(
        Some(response.user.id.to_string()),
        "user.register",
        None,
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .log();

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with email/password
#[utoipa::path(
    post,
    path = "/login",
    tag = TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    axum::extract::State(state): axum::extract::State<AuthState<R>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<AuthResponse>> {
    let result = state.service.login(input).await;

    let outcome = if result.is_ok() {
        AuditOutcome::Success
    } else {
        AuditOutcome::Failure
    };
    AuditEvent::new(
        result.as_ref().map(|r| r.user.id.to_string()).ok(),
        "user.login",
        None,
        outcome,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .log();

    Ok(Json(result?))
}

/// Check authentication status and refresh the token
#[utoipa::path(
    get,
    path = "/check-status",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token refreshed", body = AuthResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn check_status<R: UserRepository>(
    axum::extract::State(state): axum::extract::State<AuthState<R>>,
    Extension(user): Extension<AuthUser>,
) -> UserResult<Json<AuthResponse>> {
    let response = state.service.check_status(user.id).await?;
    Ok(Json(response))
}
