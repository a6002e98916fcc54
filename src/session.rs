//! Interaction controller for one board.
//!
//! `Session` owns everything that changes while playing: the position, the
//! orientation, the piece being dragged and the engine handle. Every input
//! returns a [`Reaction`] telling the UI driver what to do next. Engine turns
//! are handed out as jobs tagged with a generation number; anything that
//! starts a new game bumps the generation so late replies are dropped.

use std::time::Duration;

use shakmaty::uci::UciMove;
use shakmaty::{Chess, Color, Move, Position, Role, Square};
use tracing::{debug, info, warn};

use crate::domain::chess::{GameMode, PlayerSide, color_name, is_last_rank, parse_promotion};
use crate::domain::geometry::BoardGeometry;
use crate::domain::record::{GameRecord, GameResult, Termination};
use crate::engine::{
    Engine, EngineJob, EngineLauncher, EngineOutcome, EngineReply, EngineTicket, SearchRequest,
};
use crate::error::{EngineError, MoveError};

#[derive(Clone, Debug)]
pub struct SessionSettings {
    /// Top-left corner of the board inside the board panel
    pub board_origin: (f32, f32),
    pub square_size: f32,
    pub engine_move_time: Duration,
    /// Pause before the engine replies, so the human move is drawn first
    pub engine_reply_delay: Duration,
    pub player_side: PlayerSide,
    pub mode: GameMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message for a modal prompt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn warning(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// What the UI has to do after an input
#[derive(Debug, Default)]
#[must_use]
pub struct Reaction {
    pub redraw: bool,
    pub notices: Vec<Notice>,
    /// Run an engine turn after `ticket.delay`
    pub engine_turn: Option<EngineTicket>,
    /// Ask the user for a promotion piece, then call `choose_promotion`
    pub promotion_prompt: bool,
}

impl Reaction {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }

    fn with_notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }
}

/// A piece picked up with the mouse
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragState {
    pub from: Square,
    pub piece: shakmaty::Piece,
    /// Pointer position at the previous motion event
    pub last_x: f32,
    pub last_y: f32,
    /// Accumulated translation of the dragged piece
    pub offset_x: f32,
    pub offset_y: f32,
}

/// A pawn move waiting for the user's promotion choice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingPromotion {
    pub from: Square,
    pub to: Square,
}

pub struct Session<L: EngineLauncher> {
    position: Chess,
    record: GameRecord,
    result: Option<GameResult>,
    flipped: bool,
    drag: Option<DragState>,
    pending_promotion: Option<PendingPromotion>,
    mode: GameMode,
    side: PlayerSide,
    /// `side` resolved for the current game
    human: Color,
    settings: SessionSettings,
    generation: u64,
    /// An engine turn has been scheduled or is running
    engine_turn_pending: bool,
    engine: Option<L::Engine>,
    launcher: L,
}

impl<L: EngineLauncher> Session<L> {
    /// A session at the starting position. Call [`Session::reset`] to begin
    /// play, which also schedules the engine if it has the first move.
    pub fn new(settings: SessionSettings, launcher: L) -> Self {
        let position = Chess::default();
        let human = settings.player_side.resolve();
        Self {
            record: GameRecord::new(&position),
            position,
            result: None,
            flipped: human == Color::Black,
            drag: None,
            pending_promotion: None,
            mode: settings.mode,
            side: settings.player_side,
            human,
            settings,
            generation: 0,
            engine_turn_pending: false,
            engine: None,
            launcher,
        }
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    #[allow(dead_code)]
    pub fn flipped(&self) -> bool {
        self.flipped
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    #[cfg(test)]
    pub fn pending_promotion(&self) -> Option<PendingPromotion> {
        self.pending_promotion
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn player_side(&self) -> PlayerSide {
        self.side
    }

    pub fn human_color(&self) -> Color {
        self.human
    }

    #[cfg(test)]
    pub fn engine_alive(&self) -> bool {
        self.engine.is_some()
    }

    pub fn engine_thinking(&self) -> bool {
        self.engine_turn_pending
    }

    pub fn geometry(&self) -> BoardGeometry {
        let (x, y) = self.settings.board_origin;
        BoardGeometry::new(x, y, self.settings.square_size, self.flipped)
    }

    fn human_may_move(&self) -> Result<(), MoveError> {
        if self.result.is_some() {
            Err(MoveError::GameOver)
        } else if self.engine_turn_pending {
            Err(MoveError::EngineToMove)
        } else if self.pending_promotion.is_some() {
            Err(MoveError::PromotionPending)
        } else {
            Ok(())
        }
    }

    /// Pick up the piece under the pointer if it belongs to the side to move
    pub fn press(&mut self, x: f32, y: f32) -> Reaction {
        if self.drag.is_some() || self.human_may_move().is_err() {
            return Reaction::none();
        }
        let Some(square) = self.geometry().square_at(x, y) else {
            return Reaction::none();
        };
        let Some(piece) = self.position.board().piece_at(square) else {
            return Reaction::none();
        };
        if piece.color != self.position.turn() {
            return Reaction::none();
        }

        debug!(%square, "picked up piece");
        self.drag = Some(DragState {
            from: square,
            piece,
            last_x: x,
            last_y: y,
            offset_x: 0.0,
            offset_y: 0.0,
        });
        Reaction::redraw()
    }

    /// Move the dragged piece along with the pointer. Board state is untouched.
    pub fn drag_to(&mut self, x: f32, y: f32) -> Reaction {
        let Some(drag) = self.drag.as_mut() else {
            return Reaction::none();
        };
        drag.offset_x += x - drag.last_x;
        drag.offset_y += y - drag.last_y;
        drag.last_x = x;
        drag.last_y = y;
        Reaction::redraw()
    }

    /// Drop the dragged piece and try the resulting move
    pub fn release(&mut self, x: f32, y: f32) -> Reaction {
        let Some(drag) = self.drag.take() else {
            return Reaction::none();
        };
        // off the board is a cancel; everything else is a candidate move
        let Some(target) = self.geometry().square_at(x, y) else {
            return Reaction::redraw();
        };

        if drag.piece.role == Role::Pawn && is_last_rank(target) {
            self.pending_promotion = Some(PendingPromotion {
                from: drag.from,
                to: target,
            });
            return Reaction {
                redraw: true,
                promotion_prompt: true,
                ..Reaction::default()
            };
        }

        self.apply_move(UciMove::Normal {
            from: drag.from,
            to: target,
            promotion: None,
        })
    }

    /// Finish a pending promotion. `None` means the prompt was dismissed.
    pub fn choose_promotion(&mut self, choice: Option<&str>) -> Reaction {
        let Some(pending) = self.pending_promotion.take() else {
            return Reaction::none();
        };
        match choice.and_then(parse_promotion) {
            Some(role) => self.apply_move(UciMove::Normal {
                from: pending.from,
                to: pending.to,
                promotion: Some(role),
            }),
            None => {
                let err = MoveError::InvalidPromotion(choice.unwrap_or_default().to_string());
                Reaction::redraw().with_notice(Notice::error("Promotion", err.to_string()))
            }
        }
    }

    /// Play a move typed in coordinate notation, e.g. `e2e4` or `e7e8q`
    pub fn submit_text(&mut self, text: &str) -> Reaction {
        let text = text.trim().to_ascii_lowercase();
        if text.is_empty() {
            return Reaction::none().with_notice(Notice::warning("Input", MoveError::Empty.to_string()));
        }
        match text.parse::<UciMove>() {
            Ok(uci) => self.apply_move(uci),
            Err(_) => Reaction::none()
                .with_notice(Notice::error("Input", MoveError::Malformed(text).to_string())),
        }
    }

    /// Apply a human move if it is legal in the current position
    pub fn apply_move(&mut self, uci: UciMove) -> Reaction {
        if let Err(err) = self.human_may_move() {
            return Reaction::redraw().with_notice(Notice::warning("Move rejected", err.to_string()));
        }

        // to_move only resolves moves from the legal move set
        let played = match uci.to_move(&self.position) {
            Ok(m) => self.play(m),
            Err(_) => false,
        };
        if !played {
            debug!(%uci, "rejected illegal move");
            return Reaction::redraw().with_notice(Notice::error(
                "Invalid move",
                MoveError::Illegal(uci.to_string()).to_string(),
            ));
        }

        if self.mode == GameMode::TwoPlayer {
            self.flipped = !self.flipped;
        }
        let mut reaction = Reaction::redraw();
        self.after_move(&mut reaction);
        reaction
    }

    fn play(&mut self, m: Move) -> bool {
        match self.position.clone().play(m.clone()) {
            Ok(next) => {
                self.record.push(&self.position, &m, &next);
                self.position = next;
                true
            }
            Err(_) => false,
        }
    }

    fn after_move(&mut self, reaction: &mut Reaction) {
        if let Some(result) = self.record.result(&self.position) {
            self.end_game(result, reaction);
            return;
        }
        reaction.engine_turn = self.issue_engine_ticket();
    }

    fn issue_engine_ticket(&mut self) -> Option<EngineTicket> {
        let engine_to_move = self.mode == GameMode::Engine
            && self.result.is_none()
            && self.position.turn() != self.human;
        if !engine_to_move || self.engine_turn_pending {
            return None;
        }
        self.engine_turn_pending = true;
        Some(EngineTicket {
            generation: self.generation,
            delay: self.settings.engine_reply_delay,
        })
    }

    /// Hand out the engine search for `ticket`, or `None` if the ticket is
    /// stale. The engine handle travels with the job.
    pub fn begin_engine_turn(&mut self, ticket: EngineTicket) -> Option<EngineJob<L>> {
        if ticket.generation != self.generation || !self.engine_turn_pending {
            debug!(ticket = ticket.generation, current = self.generation, "stale engine ticket");
            return None;
        }

        Some(EngineJob {
            ticket,
            request: SearchRequest {
                position: self.position.clone(),
                moves: self.record.uci_moves().to_vec(),
                move_time: self.settings.engine_move_time,
            },
            engine: self.engine.take(),
            launcher: self.launcher.clone(),
        })
    }

    /// Apply the engine's answer. Replies from an earlier game are dropped and
    /// their engine is shut down.
    pub fn finish_engine_turn(&mut self, reply: EngineReply<L::Engine>) -> Reaction {
        let EngineReply {
            ticket,
            engine,
            outcome,
        } = reply;

        if ticket.generation != self.generation {
            debug!(ticket = ticket.generation, current = self.generation, "discarding stale engine reply");
            if let Some(mut engine) = engine {
                engine.quit();
            }
            return Reaction::none();
        }

        self.engine_turn_pending = false;
        self.engine = engine;

        match outcome {
            EngineOutcome::Move(m) => {
                debug!(?m, "engine move");
                let mut reaction = Reaction::redraw();
                if self.play(m) {
                    self.after_move(&mut reaction);
                } else {
                    let err = EngineError::Protocol("engine move could not be played".to_string());
                    self.engine_failed(err, &mut reaction);
                }
                reaction
            }
            EngineOutcome::NoMove => {
                let mut reaction = Reaction::redraw();
                let err = EngineError::Protocol("engine returned no move".to_string());
                self.engine_failed(err, &mut reaction);
                reaction
            }
            EngineOutcome::Unavailable(err) => {
                warn!("engine unavailable: {}", err);
                Reaction::redraw().with_notice(Notice::error("Engine unavailable", err.to_string()))
            }
            EngineOutcome::Failed(err) => {
                let mut reaction = Reaction::redraw();
                self.engine_failed(err, &mut reaction);
                reaction
            }
        }
    }

    fn engine_failed(&mut self, err: EngineError, reaction: &mut Reaction) {
        warn!("engine failure: {}", err);
        reaction.notices.push(Notice::error("Engine error", err.to_string()));
        self.end_game(
            GameResult {
                winner: None,
                termination: Termination::EngineFailure,
            },
            reaction,
        );
    }

    fn end_game(&mut self, result: GameResult, reaction: &mut Reaction) {
        info!(%result, "game over");
        self.result = Some(result);
        self.release_engine();
        reaction.redraw = true;
        reaction
            .notices
            .push(Notice::info("Game over", format!("Game over! Result: {}", result)));
    }

    /// Shut the engine down and invalidate any outstanding engine turn
    fn release_engine(&mut self) {
        self.generation += 1;
        self.engine_turn_pending = false;
        if let Some(mut engine) = self.engine.take() {
            engine.quit();
        }
    }

    /// Start a fresh game with the current side and mode
    pub fn reset(&mut self) -> Reaction {
        self.release_engine();
        self.position = Chess::default();
        self.record = GameRecord::new(&self.position);
        self.result = None;
        self.human = self.side.resolve();
        self.flipped = self.human == Color::Black;
        self.drag = None;
        self.pending_promotion = None;
        info!(
            mode = self.mode.label(),
            human = color_name(self.human),
            "new game"
        );

        let mut reaction = Reaction::redraw();
        reaction.engine_turn = self.issue_engine_ticket();
        reaction
    }

    /// Turn the board around. Position and turn are unchanged.
    pub fn flip(&mut self) -> Reaction {
        self.flipped = !self.flipped;
        Reaction::redraw()
    }

    pub fn choose_side(&mut self, side: PlayerSide) -> Reaction {
        self.side = side;
        self.reset()
    }

    pub fn set_mode(&mut self, mode: GameMode) -> Reaction {
        self.mode = mode;
        let message = match mode {
            GameMode::TwoPlayer => "Two-player mode enabled.",
            GameMode::Engine => "Playing against the engine.",
        };
        self.reset().with_notice(Notice::info("Mode", message))
    }

    /// Release the engine before the application exits
    pub fn shutdown(&mut self) {
        self.release_engine();
    }
}
