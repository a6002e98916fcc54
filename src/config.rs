//! Application configuration, loadable from TOML.
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! `$CHESS_PLAY_CONFIG` points at another file and `$CHESS_PLAY_ENGINE`
//! overrides the engine binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::chess::{GameMode, PlayerSide};
use crate::error::ConfigError;
use crate::session::SessionSettings;
use crate::ui::theme::BOARD_PADDING;

pub const CONFIG_ENV: &str = "CHESS_PLAY_CONFIG";
pub const ENGINE_ENV: &str = "CHESS_PLAY_ENGINE";
pub const DEFAULT_CONFIG_FILE: &str = "chess-play.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Relative paths are looked up next to the executable, then in the
    /// working directory; bare names go through `PATH`
    pub path: PathBuf,
    /// Extra command-line arguments for the engine
    pub args: Vec<String>,
    pub move_time_ms: u64,
    pub reply_delay_ms: u64,
    pub handshake_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("stockfish/stockfish"),
            args: Vec::new(),
            move_time_ms: 300,
            reply_delay_ms: 300,
            handshake_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub square_size: f32,
    pub asset_dir: PathBuf,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            square_size: 64.0,
            asset_dir: PathBuf::from("assets"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player_side: PlayerSide,
    pub mode: GameMode,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub board: BoardConfig,
    pub game: GameConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults if it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            info!(path = %path.display(), "loading config");
            Self::load(path)
        } else {
            info!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Config from the standard location plus environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut config = Self::load_or_default(&path)?;
        if let Some(engine) = std::env::var_os(ENGINE_ENV) {
            config.engine.path = PathBuf::from(engine);
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.board.square_size.is_finite() || self.board.square_size <= 0.0 {
            return Err(ConfigError::Validation(
                "board.square_size must be > 0".to_string(),
            ));
        }
        if self.engine.move_time_ms == 0 {
            return Err(ConfigError::Validation(
                "engine.move_time_ms must be > 0".to_string(),
            ));
        }
        if self.engine.handshake_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "engine.handshake_timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            board_origin: (BOARD_PADDING, BOARD_PADDING),
            square_size: self.board.square_size,
            engine_move_time: Duration::from_millis(self.engine.move_time_ms),
            engine_reply_delay: Duration::from_millis(self.engine.reply_delay_ms),
            player_side: self.game.player_side,
            mode: self.game.mode,
        }
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.engine.handshake_timeout_ms)
    }
}

/// Directory of the running executable, or the working directory
pub fn base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default()
}

/// Resolve the configured engine path. A missing binary is only logged: it
/// matters once engine mode actually needs it.
pub fn resolve_engine_path(configured: &Path, base: &Path, cwd: &Path) -> PathBuf {
    if configured.is_absolute() {
        if !configured.exists() {
            warn!(path = %configured.display(), "engine binary not found");
        }
        return configured.to_path_buf();
    }
    // bare command names are resolved through PATH at spawn time
    if configured.components().count() == 1 {
        let beside_exe = base.join(configured);
        return if beside_exe.exists() {
            beside_exe
        } else {
            configured.to_path_buf()
        };
    }

    let candidates = [base.join(configured), cwd.join(configured)];
    if let Some(found) = candidates.iter().find(|p| p.exists()) {
        return found.clone();
    }
    warn!(path = %configured.display(), "engine binary not found");
    candidates[0].clone()
}
