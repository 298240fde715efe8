//! Store rows to API views. Views stop after one level: a room expands its
//! users, a user only names its room by id.

use lobby_db::models::{RoomWithUsers, UserRow};
use lobby_types::api::{RoomView, UserView};

pub fn user_view(row: UserRow) -> UserView {
    UserView {
        id: row.id,
        name: row.name,
        room_id: row.room_id,
    }
}

pub fn room_view(room: RoomWithUsers) -> RoomView {
    RoomView {
        id: room.room.id,
        users: room.users.into_iter().map(user_view).collect(),
    }
}
