pub mod error;
pub mod extract;
pub mod middleware;
pub mod rooms;
pub mod users;
pub mod views;

use std::sync::Arc;

use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use lobby_db::Database;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

/// All routes. `/health` is public, everything under `/api` needs a bearer
/// token. Transport layers (CORS, tracing) are added by the binary.
pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/api/room",
            get(rooms::list_rooms)
                .post(rooms::create_room)
                .delete(rooms::delete_room),
        )
        .route("/api/room/{id}", get(rooms::get_room))
        .route(
            "/api/user",
            get(users::list_users)
                .post(users::create_user)
                .delete(users::delete_user),
        )
        .route("/api/user/{id}", get(users::get_user))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .merge(protected_routes)
}

pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Run a store call off the async runtime.
pub(crate) async fn run_blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> lobby_db::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    let value = tokio::task::spawn_blocking(move || f(&state.db)).await??;
    Ok(value)
}
