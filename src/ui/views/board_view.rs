//! Chess board view - the board, its controls and the dialogs the game asks for.

use gpui::{
    AsyncApp, Context, Entity, MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, Pixels,
    PromptLevel, SharedString, Subscription, WeakEntity, Window, div, prelude::*, px, rgb,
};
use gpui_component::button::{Button, ButtonVariants};
use gpui_component::input::{Input, InputEvent, InputState};
use gpui_component::resizable::{h_resizable, resizable_panel};
use shakmaty::Position;

use crate::domain::chess::{GameMode, PlayerSide, color_name, shakmaty_to_piece};
use crate::models::{GameEvent, GameModel};
use crate::session::NoticeLevel;
use crate::ui::assets::PieceAssets;
use crate::ui::components::{render_floating_piece, render_square};
use crate::ui::theme::{
    BOARD_PADDING, BORDER_COLOR, PANEL_BG, PIECE_SCALE, SIDE_PANEL_WIDTH, TEXT_ACCENT,
    TEXT_PRIMARY, TEXT_SECONDARY,
};
use crate::ui::views::render_move_list_panel;

/// Buttons of the promotion dialog, in the order of [`PROMOTION_CHOICES`]
const PROMOTION_BUTTONS: [&str; 5] = ["Queen", "Rook", "Bishop", "Knight", "Cancel"];
const PROMOTION_CHOICES: [&str; 4] = ["q", "r", "b", "n"];

/// The main chess board view that observes a GameModel
pub struct ChessBoardView {
    model: Entity<GameModel>,
    pieces: PieceAssets,
    move_input: Entity<InputState>,
    _subscriptions: Vec<Subscription>,
}

impl ChessBoardView {
    pub fn new(
        model: Entity<GameModel>,
        pieces: PieceAssets,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let move_input = cx.new(|cx| InputState::new(window, cx).placeholder("e2e4"));
        let _subscriptions = vec![
            cx.observe(&model, |_, _, cx| cx.notify()),
            cx.subscribe_in(&model, window, Self::on_game_event),
            cx.subscribe_in(&move_input, window, Self::on_input_event),
        ];
        Self {
            model,
            pieces,
            move_input,
            _subscriptions,
        }
    }

    fn on_game_event(
        &mut self,
        _model: &Entity<GameModel>,
        event: &GameEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        match event {
            GameEvent::Notice(notice) => {
                let level = match notice.level {
                    NoticeLevel::Info => PromptLevel::Info,
                    NoticeLevel::Warning => PromptLevel::Warning,
                    NoticeLevel::Error => PromptLevel::Critical,
                };
                // informational only; the answer is not needed
                let _ = window.prompt(level, &notice.title, Some(notice.message.as_str()), &["OK"], cx);
            }
            GameEvent::PromotionRequested => {
                let answer = window.prompt(
                    PromptLevel::Info,
                    "Promotion",
                    Some("Promote to (q, r, b, n)?"),
                    &PROMOTION_BUTTONS,
                    cx,
                );
                let model = self.model.clone();
                cx.spawn(async move |_: WeakEntity<ChessBoardView>, cx: &mut AsyncApp| {
                    let choice = answer
                        .await
                        .ok()
                        .and_then(|ix| PROMOTION_CHOICES.get(ix).copied());
                    let _ = model.update(cx, |game, cx| game.choose_promotion(choice, cx));
                })
                .detach();
            }
        }
    }

    fn on_input_event(
        &mut self,
        _input: &Entity<InputState>,
        event: &InputEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if let InputEvent::PressEnter { .. } = event {
            self.submit_move_text(window, cx);
        }
    }

    fn submit_move_text(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let text = self.move_input.read(cx).value().to_string();
        self.move_input
            .update(cx, |input, cx| input.set_value("", window, cx));
        self.model
            .update(cx, |game, cx| game.submit_text(&text, cx));
    }

    fn render_controls(&self, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        let game = self.model.read(cx);
        let side = game.session().player_side();
        let mode = game.session().mode();

        let side_button = |id: &'static str, label: &'static str, choice: PlayerSide| {
            let model = self.model.clone();
            toggle_button(id, label, side == choice).on_click(move |_, _, cx| {
                model.update(cx, |game, cx| game.choose_side(choice, cx));
            })
        };
        let mode_button = |id: &'static str, label: &'static str, choice: GameMode| {
            let model = self.model.clone();
            toggle_button(id, label, mode == choice).on_click(move |_, _, cx| {
                model.update(cx, |game, cx| game.set_mode(choice, cx));
            })
        };
        let model_reset = self.model.clone();
        let model_flip = self.model.clone();

        let sides = div()
            .flex()
            .gap_2()
            .child(side_button("side-white", "White", PlayerSide::White))
            .child(side_button("side-black", "Black", PlayerSide::Black))
            .child(side_button("side-random", "Random", PlayerSide::Random));

        let modes = div()
            .flex()
            .gap_2()
            .child(mode_button("mode-engine", "Engine", GameMode::Engine))
            .child(mode_button("mode-two-player", "Two players", GameMode::TwoPlayer));

        let board_actions = div()
            .flex()
            .gap_2()
            .child(
                Button::new("reset")
                    .label("Reset")
                    .on_click(move |_, _, cx| model_reset.update(cx, |game, cx| game.reset(cx))),
            )
            .child(
                Button::new("flip")
                    .label("Flip")
                    .on_click(move |_, _, cx| model_flip.update(cx, |game, cx| game.flip(cx))),
            );

        let move_entry = div()
            .flex()
            .gap_2()
            .child(div().flex_1().child(Input::new(&self.move_input)))
            .child(
                Button::new("play-move")
                    .label("Play")
                    .primary()
                    .on_click(cx.listener(|this, _, window, cx| this.submit_move_text(window, cx))),
            );

        div()
            .flex()
            .flex_col()
            .gap_2()
            .pb_4()
            .border_b_1()
            .border_color(rgb(BORDER_COLOR))
            .child(sides)
            .child(modes)
            .child(board_actions)
            .child(move_entry)
    }

    fn status_line(&self, cx: &Context<Self>) -> SharedString {
        let session = self.model.read(cx).session();
        if let Some(result) = session.result() {
            return format!("Game over: {}", result).into();
        }
        let turn = color_name(session.position().turn());
        let status = match session.mode() {
            GameMode::TwoPlayer => format!("Two players - {} to move", turn),
            GameMode::Engine if session.engine_thinking() => "Engine is thinking...".to_string(),
            GameMode::Engine => format!(
                "You play {} - {} to move",
                color_name(session.human_color()),
                turn
            ),
        };
        status.into()
    }
}

/// A button that is highlighted while its option is active
fn toggle_button(id: &'static str, label: &'static str, active: bool) -> Button {
    let button = Button::new(id).label(label);
    if active { button.primary() } else { button }
}

impl Render for ChessBoardView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let controls = self.render_controls(cx);
        let status = self.status_line(cx);
        let move_list = render_move_list_panel(&self.model, cx);

        let model_down = self.model.clone();
        let model_move = self.model.clone();
        let model_up = self.model.clone();
        let model_up_out = self.model.clone();

        let session = self.model.read(cx).session();
        let geometry = session.geometry();
        let square_size = geometry.square_size;
        let piece_size = square_size * PIECE_SCALE;
        let drag = session.drag().copied();
        let board_state = session.position().board();

        // Floating piece keeps its grab offset while following the pointer
        let floating_piece = drag.map(|d| {
            let (x, y) = geometry.square_origin(d.from);
            render_floating_piece(
                self.pieces.path(shakmaty_to_piece(d.piece)),
                x + d.offset_x,
                y + d.offset_y,
                square_size,
                piece_size,
            )
        });

        let board = div()
            .flex_shrink_0()
            .flex()
            .flex_col()
            .w(px(geometry.board_size()))
            .h(px(geometry.board_size()))
            .overflow_hidden()
            .children((0..8).map(|row| {
                div().flex().flex_shrink_0().children((0..8).map(|col| {
                    let square = geometry.square_in_cell(row, col);
                    let piece = board_state
                        .piece_at(square)
                        .map(|p| self.pieces.path(shakmaty_to_piece(p)));
                    let selected = drag.is_some_and(|d| d.from == square);
                    render_square(row, col, piece, selected, square_size, piece_size)
                }))
            }));

        let board_panel = div()
            .id("board-panel")
            .relative()
            .size_full()
            .overflow_hidden()
            .bg(rgb(PANEL_BG))
            .p(px(BOARD_PADDING))
            .child(board)
            .when_some(floating_piece, |el, fp| el.child(fp))
            .on_mouse_down(
                MouseButton::Left,
                move |ev: &MouseDownEvent, _window, cx| {
                    let pos = ev.position;
                    model_down.update(cx, |game, cx| game.press(pos.x.into(), pos.y.into(), cx));
                },
            )
            .on_mouse_move(move |ev: &MouseMoveEvent, _, cx| {
                let pos = ev.position;
                model_move.update(cx, |game, cx| game.drag_to(pos.x.into(), pos.y.into(), cx));
            })
            .on_mouse_up(MouseButton::Left, move |ev: &MouseUpEvent, _window, cx| {
                let pos = ev.position;
                model_up.update(cx, |game, cx| game.release(pos.x.into(), pos.y.into(), cx));
            })
            // releasing outside the panel cancels the drag
            .on_mouse_up_out(MouseButton::Left, move |ev: &MouseUpEvent, _window, cx| {
                let pos = ev.position;
                model_up_out.update(cx, |game, cx| game.release(pos.x.into(), pos.y.into(), cx));
            });

        let side_panel = div()
            .size_full()
            .flex()
            .flex_col()
            .gap_4()
            .bg(rgb(PANEL_BG))
            .p(px(BOARD_PADDING))
            .child(controls)
            .child(
                div()
                    .text_color(if session.result().is_some() {
                        rgb(TEXT_ACCENT)
                    } else {
                        rgb(TEXT_PRIMARY)
                    })
                    .child(status),
            )
            .child(
                div()
                    .text_sm()
                    .text_color(rgb(TEXT_SECONDARY))
                    .child("Drag a piece or type a move like e2e4 or e7e8q"),
            )
            .child(move_list);

        let board_panel_width = geometry.board_size() + 2.0 * BOARD_PADDING;
        div().size_full().font_family("Berkeley Mono").child(
            h_resizable("chess-layout")
                .child(
                    resizable_panel()
                        .size(px(board_panel_width))
                        .size_range(px(board_panel_width)..Pixels::MAX)
                        .child(board_panel),
                )
                .child(
                    resizable_panel()
                        .size(px(SIDE_PANEL_WIDTH))
                        .size_range(px(200.)..Pixels::MAX)
                        .child(side_panel),
                ),
        )
    }
}
