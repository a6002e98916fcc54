mod app;
mod config;
mod domain;
mod engine;
mod error;
mod models;
mod session;
mod ui;

use anyhow::Context as _;
use gpui::{App, Application};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::engine::UciLauncher;
use crate::ui::{FileAssets, PieceAssets};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().context("failed to load configuration")?;

    let base_dir = config::base_dir();
    let assets = FileAssets::new(base_dir.clone());
    let pieces = PieceAssets::load(&assets, &config.board.asset_dir)
        .inspect_err(|e| error!("{}", e))
        .context("piece images are required to draw the board")?;

    let cwd = std::env::current_dir().unwrap_or_else(|_| base_dir.clone());
    let engine_path = config::resolve_engine_path(&config.engine.path, &base_dir, &cwd);
    let launcher =
        UciLauncher::new(engine_path, config.handshake_timeout()).with_args(&config.engine.args);
    info!(engine = %launcher.program().display(), "engine configured");

    Application::new()
        .with_assets(assets)
        .run(move |cx: &mut App| app::run(cx, config, pieces, launcher));
    Ok(())
}
