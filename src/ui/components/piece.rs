//! Piece rendering component.

use gpui::{SharedString, div, img, prelude::*, px};

/// Render a chess piece centered in its container
pub fn render_piece(image: SharedString, piece_size: f32) -> impl IntoElement {
    div()
        .size_full()
        .flex()
        .items_center()
        .justify_center()
        .child(img(image).size(px(piece_size)))
}

/// A piece drawn above the board, with its square's top-left corner at
/// (`left`, `top`) relative to the board panel
pub fn render_floating_piece(
    image: SharedString,
    left: f32,
    top: f32,
    square_size: f32,
    piece_size: f32,
) -> impl IntoElement {
    div()
        .absolute()
        .left(px(left))
        .top(px(top))
        .size(px(square_size))
        .child(render_piece(image, piece_size))
}
