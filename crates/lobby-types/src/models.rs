/// Identifiers are SQLite rowids assigned by the store on insert.
/// Tables use AUTOINCREMENT, so the id of a deleted row never comes back.
pub type RoomId = i64;
pub type UserId = i64;
pub type GameId = i64;
