//! Application setup and window creation.

use gpui::{App, Bounds, TitlebarOptions, WindowBounds, WindowOptions, prelude::*, px, size};
use gpui_component::Root;
use tracing::error;

use crate::config::AppConfig;
use crate::engine::UciLauncher;
use crate::models::GameModel;
use crate::session::Session;
use crate::ui::PieceAssets;
use crate::ui::theme::{BOARD_PADDING, MIN_WINDOW_HEIGHT, SIDE_PANEL_WIDTH};
use crate::ui::views::ChessBoardView;

/// Initialize and run the chess application
pub fn run(cx: &mut App, config: AppConfig, pieces: PieceAssets, launcher: UciLauncher) {
    gpui_component::init(cx);

    let session = Session::new(config.session_settings(), launcher);
    let model = cx.new(|cx| GameModel::new(session, cx));

    let board_panel = config.board.square_size * 8.0 + 2.0 * BOARD_PADDING;
    let window_size = size(
        px(board_panel + SIDE_PANEL_WIDTH),
        px(board_panel.max(MIN_WINDOW_HEIGHT)),
    );
    let bounds = Bounds::centered(None, window_size, cx);

    let view_model = model.clone();
    let opened = cx.open_window(
        WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            titlebar: Some(TitlebarOptions {
                title: Some("Chess".into()),
                ..Default::default()
            }),
            ..Default::default()
        },
        |window, cx| {
            let view = cx.new(|cx| ChessBoardView::new(view_model, pieces, window, cx));
            cx.new(|cx| Root::new(view, window, cx))
        },
    );

    if let Err(e) = opened {
        error!("failed to open window: {:#}", e);
        cx.quit();
        return;
    }

    // the view is subscribed now, so the first game's events reach it
    model.update(cx, |game, cx| game.new_game(cx));
}
