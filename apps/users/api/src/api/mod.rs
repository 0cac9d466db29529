use axum::{routing::get, Router};
use domain_users::entity::USERS_URL;

pub mod health;
pub mod users;

/// API routes without the `/api` prefix; `create_router` adds it.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new().nest(USERS_URL, users::router(state))
}

/// `/ready`, checking the database connection
pub fn ready_router(state: crate::state::AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
