use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;

use lobby_types::api::{Claims, CreateUserQuery, DeleteUserQuery, UserView};
use lobby_types::models::UserId;

use crate::error::ApiError;
use crate::extract::{Path, Query};
use crate::{AppState, run_blocking, views};

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserView>>, ApiError> {
    let users = run_blocking(&state, |db| db.list_users()).await?;
    Ok(Json(users.into_iter().map(views::user_view).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<UserView>, ApiError> {
    let user = run_blocking(&state, move |db| db.get_user(id)).await?;
    Ok(Json(views::user_view(user)))
}

/// POST /api/user?name=&room=: the room id is stored without checking
/// that the room exists.
pub async fn create_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<CreateUserQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let CreateUserQuery { name, room } = query;
    let user_id = run_blocking(&state, move |db| db.create_user(name.as_deref(), room)).await?;

    info!(user_id, room_id = ?room, by = %claims.sub, "User created");
    Ok((StatusCode::CREATED, Json(json!({}))))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<DeleteUserQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = query.user_id;
    run_blocking(&state, move |db| db.delete_user(user_id)).await?;

    info!(user_id, by = %claims.sub, "User deleted");
    Ok(Json(json!({})))
}
