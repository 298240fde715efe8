//! Keeps the room/user relationship consistent.
//!
//! The relationship is stored once, as `users.room_id`. A room's members
//! are whatever users currently point at it, so membership can never hold
//! a duplicate and deleting a user needs no bookkeeping here. These
//! functions take a plain `&Connection` so callers can run them inside a
//! transaction (`Transaction` derefs to `Connection`).

use lobby_types::models::{RoomId, UserId};
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::{Entity, Result, StoreError};

pub fn room_exists(conn: &Connection, room_id: RoomId) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM rooms WHERE id = ?1", [room_id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

pub fn user_exists(conn: &Connection, user_id: UserId) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM users WHERE id = ?1", [user_id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

/// The room a user currently points at.
pub fn current_room(conn: &Connection, user_id: UserId) -> Result<Option<RoomId>> {
    conn.query_row("SELECT room_id FROM users WHERE id = ?1", [user_id], |row| {
        row.get::<_, Option<RoomId>>(0)
    })
    .optional()?
    .ok_or(StoreError::NotFound(Entity::User))
}

pub fn member_ids(conn: &Connection, room_id: RoomId) -> Result<Vec<UserId>> {
    let mut stmt = conn.prepare("SELECT id FROM users WHERE room_id = ?1 ORDER BY id")?;
    let ids = stmt
        .query_map([room_id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<UserId>, _>>()?;
    Ok(ids)
}

/// Point `user_id` at `room_id` (or at nothing). Writes nothing when the
/// user already points there. The target room must exist.
pub fn assign_user(conn: &Connection, user_id: UserId, room_id: Option<RoomId>) -> Result<()> {
    let current = current_room(conn, user_id)?;

    if let Some(room_id) = room_id {
        if !room_exists(conn, room_id)? {
            return Err(StoreError::NotFound(Entity::Room));
        }
    }

    if current == room_id {
        return Ok(());
    }

    conn.execute(
        "UPDATE users SET room_id = ?1 WHERE id = ?2",
        params![room_id, user_id],
    )?;
    Ok(())
}

/// Clear a user's room. Succeeds silently when already unassigned.
pub fn unassign_user(conn: &Connection, user_id: UserId) -> Result<()> {
    assign_user(conn, user_id, None)
}

/// Unassign every member of `room_id`, returning how many were detached.
/// Must run before the room row is removed, in the same transaction.
pub fn detach_all_from_room(conn: &Connection, room_id: RoomId) -> Result<usize> {
    let members = member_ids(conn, room_id)?;
    for user_id in &members {
        unassign_user(conn, *user_id)?;
    }
    Ok(members.len())
}
