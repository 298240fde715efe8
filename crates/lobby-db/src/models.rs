//! Database row types. These map directly to SQLite rows and stay
//! independent of the lobby-types views.

use lobby_types::models::{GameId, RoomId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRow {
    pub id: RoomId,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: UserId,
    pub name: String,
    pub room_id: Option<RoomId>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRow {
    pub id: GameId,
    pub room_id: RoomId,
    pub created_at: String,
}

/// A room together with every user whose `room_id` points at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomWithUsers {
    pub room: RoomRow,
    pub users: Vec<UserRow>,
}
