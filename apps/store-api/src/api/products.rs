use axum::{Router, middleware};
use domain_products::{PgProductRepository, ProductService, create_products_router};
use domain_users::require_auth;

/// Products router backed by PostgreSQL.
///
/// The whole router sits behind the authentication middleware; the delete
/// endpoint carries its own role requirement inside.
pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgProductRepository::new(state.db.clone());
    let service = ProductService::new(repository);

    create_products_router(service).layer(middleware::from_fn_with_state(
        state.auth.clone(),
        require_auth,
    ))
}
