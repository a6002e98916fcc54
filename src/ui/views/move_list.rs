//! Move list panel - the game's moves in SAN, numbered in pairs.

use gpui::{App, Div, Entity, SharedString, div, prelude::*, px, rgb};

use crate::models::GameModel;
use crate::ui::theme::{BORDER_COLOR, MOVE_LIST_BG, TEXT_PRIMARY, TEXT_SECONDARY};

const LAST_MOVE_BG: u32 = 0x4a6da7;

/// Render the move list panel for a given game model.
pub fn render_move_list_panel(model: &Entity<GameModel>, cx: &App) -> Div {
    let record = model.read(cx).session().record();
    let pairs = record.numbered_pairs();
    let last_ply = record.len();

    let moves_content = if pairs.is_empty() {
        div().text_color(rgb(TEXT_SECONDARY)).child("No moves yet")
    } else {
        div()
            .flex()
            .flex_col()
            .gap_1()
            .children(pairs.into_iter().map(|(number, white, black)| {
                // plies are 1-based: white's move of pair n is ply 2n - 1
                let white_ply = number * 2 - 1;
                div()
                    .flex()
                    .gap_2()
                    .child(
                        div()
                            .w(px(32.0))
                            .text_color(rgb(TEXT_SECONDARY))
                            .child(format!("{}.", number)),
                    )
                    .child(render_move(white, white_ply == last_ply))
                    .when_some(black, |el, san| {
                        el.child(render_move(san, white_ply + 1 == last_ply))
                    })
            }))
    };

    div()
        .flex_1()
        .flex()
        .flex_col()
        .bg(rgb(MOVE_LIST_BG))
        .border_1()
        .border_color(rgb(BORDER_COLOR))
        .rounded_md()
        .overflow_hidden()
        // Header (fixed)
        .child(
            div()
                .p_4()
                .pb_2()
                .text_color(rgb(TEXT_PRIMARY))
                .border_b_1()
                .border_color(rgb(BORDER_COLOR))
                .child("Move History"),
        )
        // Scrollable moves content
        .child(
            div()
                .id("move-list-scroll")
                .flex_1()
                .overflow_y_scroll()
                .p_4()
                .pt_2()
                .child(moves_content),
        )
}

fn render_move(san: String, is_last: bool) -> impl IntoElement {
    div()
        .w(px(72.0))
        .px_1()
        .rounded(px(3.0))
        .text_color(rgb(TEXT_PRIMARY))
        .when(is_last, |el| el.bg(rgb(LAST_MOVE_BG)))
        .child(SharedString::from(san))
}
