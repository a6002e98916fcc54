//! Error types shared across the application.

use std::path::PathBuf;
use std::time::Duration;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Missing piece images. Always fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("missing piece image: {0}")]
    Missing(PathBuf),
}

/// Recoverable problems with a move the user tried to play.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("{0} is not a legal move")]
    Illegal(String),

    #[error("invalid promotion choice: {0:?} (expected q, r, b or n)")]
    InvalidPromotion(String),

    #[error("cannot read {0:?} as a move (expected coordinates such as e2e4)")]
    Malformed(String),

    #[error("please enter a move")]
    Empty,

    #[error("the game is over, start a new one to keep playing")]
    GameOver,

    #[error("wait for the engine to move")]
    EngineToMove,

    #[error("choose a piece for the pending promotion first")]
    PromotionPending,
}

/// Failures talking to the external engine process.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine not found at {0}")]
    NotFound(PathBuf),

    #[error("failed to start engine {path}: {source}")]
    Spawn {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to open engine {0}")]
    Pipe(&'static str),

    #[error("engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("engine exited unexpectedly")]
    Exited,

    #[error("engine did not answer within {0:?}")]
    Timeout(Duration),

    #[error("engine protocol error: {0}")]
    Protocol(String),
}
