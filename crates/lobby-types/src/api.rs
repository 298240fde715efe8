use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{RoomId, UserId};

// -- JWT Claims --

/// Claims carried by bearer tokens. Tokens are minted by the identity
/// service that shares `LOBBY_JWT_SECRET`; this crate only verifies them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

// -- Views --

/// A user as returned to callers. The room is referenced by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub room_id: Option<RoomId>,
}

/// A room with its members expanded one level deep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
    pub id: RoomId,
    pub users: Vec<UserView>,
}

// -- Rooms --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomQuery {
    pub user_id: UserId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRoomQuery {
    pub room_id: RoomId,
}

// -- Users --

/// `name` stays optional here so a missing name is reported as a
/// validation failure by the store rather than as an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct CreateUserQuery {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub room: Option<RoomId>,
}

/// `room=` with no value means no room.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<RoomId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserQuery {
    pub user_id: UserId,
}

// -- Errors --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
