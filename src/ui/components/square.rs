//! Square rendering component.

use crate::ui::components::render_piece;
use crate::ui::theme::{GHOST_OPACITY, SELECTED_OUTLINE, square_color};
use gpui::{SharedString, div, img, prelude::*, px, rgb};

/// Render a single board square with optional piece.
///
/// `selected` marks the origin of a drag: the square gets an outline and its
/// piece is shown as a ghost while the real one follows the pointer.
pub fn render_square(
    row: usize,
    col: usize,
    piece: Option<SharedString>,
    selected: bool,
    square_size: f32,
    piece_size: f32,
) -> impl IntoElement {
    div()
        .flex_shrink_0() // never shrink - maintain aspect ratio
        .size(px(square_size))
        .bg(square_color(row, col))
        .flex()
        .items_center()
        .justify_center()
        .when(selected, |el| el.border_2().border_color(rgb(SELECTED_OUTLINE)))
        .when_some(piece, |el, image| {
            if selected {
                el.child(
                    div()
                        .size_full()
                        .flex()
                        .items_center()
                        .justify_center()
                        .opacity(GHOST_OPACITY)
                        .child(img(image).size(px(piece_size))),
                )
            } else {
                el.child(render_piece(image, piece_size))
            }
        })
}
