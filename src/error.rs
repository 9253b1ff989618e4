//! Crate error type

use std::io;

/// Errors surfaced by the game library
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("weapon slot {index} is not owned (player has {available})")]
    InvalidWeapon { index: usize, available: usize },

    #[error("unknown level {0}")]
    UnknownLevel(u32),

    #[error("invalid map for level {level}: {reason}")]
    InvalidMap { level: u32, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
