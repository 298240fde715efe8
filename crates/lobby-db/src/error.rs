use std::fmt;

use thiserror::Error;

/// The kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Room,
    User,
    Game,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Room => "room",
            Entity::User => "user",
            Entity::Game => "game",
        })
    }
}

/// Coarse classification callers map to transport status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Internal,
}

/// Errors produced by the store layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A referenced room, user or game does not exist.
    #[error("{0} not found")]
    NotFound(Entity),

    /// Required input missing or malformed. Carries a stable reason.
    #[error("{0}")]
    Validation(&'static str),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::Validation(_) => ErrorKind::Validation,
            StoreError::Sqlite(_) | StoreError::LockPoisoned => ErrorKind::Internal,
        }
    }

    /// Short machine-stable reason. Internal failures collapse to one
    /// string so storage details never reach callers.
    pub fn reason(&self) -> &'static str {
        match self {
            StoreError::NotFound(Entity::Room) => "room not found",
            StoreError::NotFound(Entity::User) => "user not found",
            StoreError::NotFound(Entity::Game) => "game not found",
            StoreError::Validation(reason) => reason,
            StoreError::Sqlite(_) | StoreError::LockPoisoned => "internal error",
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
