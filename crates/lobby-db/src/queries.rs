use std::collections::HashMap;

use lobby_types::models::{GameId, RoomId, UserId};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

use crate::Database;
use crate::association;
use crate::error::{Entity, Result, StoreError};
use crate::models::{GameRow, RoomRow, RoomWithUsers, UserRow};

impl Database {
    // -- Rooms --

    /// Every room ordered by id, each with its members ordered by id.
    pub fn list_rooms(&self) -> Result<Vec<RoomWithUsers>> {
        self.with_conn(|conn| {
            let rooms = query_rooms(conn)?;

            // One query for all members, grouped in memory (avoids N+1)
            let mut members: HashMap<RoomId, Vec<UserRow>> = HashMap::new();
            for user in query_assigned_users(conn)? {
                if let Some(room_id) = user.room_id {
                    members.entry(room_id).or_default().push(user);
                }
            }

            Ok(rooms
                .into_iter()
                .map(|room| {
                    let users = members.remove(&room.id).unwrap_or_default();
                    RoomWithUsers { room, users }
                })
                .collect())
        })
    }

    pub fn get_room(&self, id: RoomId) -> Result<RoomWithUsers> {
        self.with_conn(|conn| {
            let room = query_room_by_id(conn, id)?.ok_or(StoreError::NotFound(Entity::Room))?;
            let users = query_users_in_room(conn, id)?;
            Ok(RoomWithUsers { room, users })
        })
    }

    /// Create a room with `user_id` as its only member. A user already in
    /// another room is moved without complaint (last write wins). Users
    /// created earlier with this room id are stale pointers and get cleared.
    pub fn create_room(&self, user_id: UserId) -> Result<RoomId> {
        self.with_transaction(|tx| {
            if !association::user_exists(tx, user_id)? {
                return Err(StoreError::NotFound(Entity::User));
            }

            tx.execute("INSERT INTO rooms DEFAULT VALUES", [])?;
            let room_id = tx.last_insert_rowid();
            let stale = association::detach_all_from_room(tx, room_id)?;
            association::assign_user(tx, user_id, Some(room_id))?;

            debug!(room_id, user_id, stale, "room created");
            Ok(room_id)
        })
    }

    /// Detach every member, drop the room's game, then drop the room.
    pub fn delete_room(&self, id: RoomId) -> Result<()> {
        self.with_transaction(|tx| {
            if !association::room_exists(tx, id)? {
                return Err(StoreError::NotFound(Entity::Room));
            }

            let detached = association::detach_all_from_room(tx, id)?;
            let games = tx.execute("DELETE FROM games WHERE room_id = ?1", [id])?;
            tx.execute("DELETE FROM rooms WHERE id = ?1", [id])?;

            debug!(room_id = id, detached, games, "room deleted");
            Ok(())
        })
    }

    // -- Users --

    pub fn list_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, name, room_id, created_at FROM users ORDER BY id")?;
            let rows = stmt
                .query_map([], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_user(&self, id: UserId) -> Result<UserRow> {
        self.with_conn(|conn| query_user_by_id(conn, id)?.ok_or(StoreError::NotFound(Entity::User)))
    }

    /// Insert a user. `room_id` is stored as given: it is not checked
    /// against the rooms table.
    pub fn create_user(&self, name: Option<&str>, room_id: Option<RoomId>) -> Result<UserId> {
        let name = validate_name(name)?;

        self.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO users (name, room_id) VALUES (?1, ?2)",
                params![name, room_id],
            )?;
            let user_id = tx.last_insert_rowid();

            debug!(user_id, ?room_id, "user created");
            Ok(user_id)
        })
    }

    /// Remove a user. Rooms list members by query, so nothing else changes.
    pub fn delete_user(&self, id: UserId) -> Result<()> {
        self.with_transaction(|tx| {
            let deleted = tx.execute("DELETE FROM users WHERE id = ?1", [id])?;
            if deleted == 0 {
                return Err(StoreError::NotFound(Entity::User));
            }

            debug!(user_id = id, "user deleted");
            Ok(())
        })
    }

    // -- Games --

    pub fn create_game(&self, room_id: RoomId) -> Result<GameId> {
        self.with_transaction(|tx| {
            if !association::room_exists(tx, room_id)? {
                return Err(StoreError::NotFound(Entity::Room));
            }
            if query_game_for_room(tx, room_id)?.is_some() {
                return Err(StoreError::Validation("room already has a game"));
            }

            tx.execute("INSERT INTO games (room_id) VALUES (?1)", [room_id])?;
            let game_id = tx.last_insert_rowid();

            debug!(game_id, room_id, "game created");
            Ok(game_id)
        })
    }

    pub fn get_game_for_room(&self, room_id: RoomId) -> Result<Option<GameRow>> {
        self.with_conn(|conn| query_game_for_room(conn, room_id))
    }
}

fn validate_name(name: Option<&str>) -> Result<&str> {
    match name {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(StoreError::Validation("name is required")),
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        room_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn room_from_row(row: &Row<'_>) -> rusqlite::Result<RoomRow> {
    Ok(RoomRow {
        id: row.get(0)?,
        created_at: row.get(1)?,
    })
}

fn query_rooms(conn: &Connection) -> Result<Vec<RoomRow>> {
    let mut stmt = conn.prepare("SELECT id, created_at FROM rooms ORDER BY id")?;
    let rows = stmt
        .query_map([], room_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn query_room_by_id(conn: &Connection, id: RoomId) -> Result<Option<RoomRow>> {
    let row = conn
        .query_row("SELECT id, created_at FROM rooms WHERE id = ?1", [id], room_from_row)
        .optional()?;
    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: UserId) -> Result<Option<UserRow>> {
    let row = conn
        .query_row(
            "SELECT id, name, room_id, created_at FROM users WHERE id = ?1",
            [id],
            user_from_row,
        )
        .optional()?;
    Ok(row)
}

fn query_users_in_room(conn: &Connection, room_id: RoomId) -> Result<Vec<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, room_id, created_at FROM users WHERE room_id = ?1 ORDER BY id",
    )?;
    let rows = stmt
        .query_map([room_id], user_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn query_assigned_users(conn: &Connection) -> Result<Vec<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.name, u.room_id, u.created_at
         FROM users u
         JOIN rooms r ON r.id = u.room_id
         ORDER BY u.id",
    )?;
    let rows = stmt
        .query_map([], user_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn query_game_for_room(conn: &Connection, room_id: RoomId) -> Result<Option<GameRow>> {
    let row = conn
        .query_row(
            "SELECT id, room_id, created_at FROM games WHERE room_id = ?1",
            [room_id],
            |row| {
                Ok(GameRow {
                    id: row.get(0)?,
                    room_id: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}
