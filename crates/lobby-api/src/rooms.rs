use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;

use lobby_types::api::{Claims, CreateRoomQuery, DeleteRoomQuery, RoomView};
use lobby_types::models::RoomId;

use crate::error::ApiError;
use crate::extract::{Path, Query};
use crate::{AppState, run_blocking, views};

/// GET /api/room: every room with its members.
pub async fn list_rooms(State(state): State<AppState>) -> Result<Json<Vec<RoomView>>, ApiError> {
    let rooms = run_blocking(&state, |db| db.list_rooms()).await?;
    Ok(Json(rooms.into_iter().map(views::room_view).collect()))
}

/// GET /api/room/{id}
pub async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<RoomId>,
) -> Result<Json<RoomView>, ApiError> {
    let room = run_blocking(&state, move |db| db.get_room(id)).await?;
    Ok(Json(views::room_view(room)))
}

/// POST /api/room?userId=: open a room with that user as first member.
pub async fn create_room(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<CreateRoomQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = query.user_id;
    let room_id = run_blocking(&state, move |db| db.create_room(user_id)).await?;

    info!(room_id, user_id, by = %claims.sub, "Room created");
    Ok((StatusCode::CREATED, Json(json!({}))))
}

/// DELETE /api/room?roomId=
pub async fn delete_room(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<DeleteRoomQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let room_id = query.room_id;
    run_blocking(&state, move |db| db.delete_room(room_id)).await?;

    info!(room_id, by = %claims.sub, "Room deleted");
    Ok(Json(json!({})))
}
