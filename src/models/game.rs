//! Game model - the gpui entity around a [`Session`].
//!
//! Every user action goes through the session and comes back as a
//! [`Reaction`], which the model turns into a repaint, events for the view
//! and, when the engine is to move, a background search.
//!
//! Architecture:
//! - Engine searches block, so they run on the background executor
//! - The reply is applied on the foreground, where the session discards it
//!   if a reset happened in the meantime

use gpui::{AsyncApp, Context, EventEmitter, Subscription, Task, WeakEntity};
use tracing::debug;

use crate::domain::chess::{GameMode, PlayerSide};
use crate::engine::{EngineTicket, UciLauncher};
use crate::session::{Notice, Reaction, Session};

/// Events the board view turns into dialogs
#[derive(Clone, Debug)]
pub enum GameEvent {
    Notice(Notice),
    /// A pawn reached the last rank; ask which piece it becomes
    PromotionRequested,
}

pub struct GameModel {
    session: Session<UciLauncher>,
    /// The scheduled or running engine turn
    _engine_task: Option<Task<()>>,
    _quit_subscription: Subscription,
}

impl EventEmitter<GameEvent> for GameModel {}

impl GameModel {
    pub fn new(session: Session<UciLauncher>, cx: &mut Context<Self>) -> Self {
        let _quit_subscription = cx.on_app_quit(|game: &mut GameModel, _cx| {
            game.session.shutdown();
            async {}
        });
        Self {
            session,
            _engine_task: None,
            _quit_subscription,
        }
    }

    pub fn session(&self) -> &Session<UciLauncher> {
        &self.session
    }

    /// Start the first game. Separate from `new` so the view can subscribe
    /// before any event is emitted.
    pub fn new_game(&mut self, cx: &mut Context<Self>) {
        let reaction = self.session.reset();
        self.react(reaction, cx);
    }

    pub fn press(&mut self, x: f32, y: f32, cx: &mut Context<Self>) {
        let reaction = self.session.press(x, y);
        self.react(reaction, cx);
    }

    pub fn drag_to(&mut self, x: f32, y: f32, cx: &mut Context<Self>) {
        let reaction = self.session.drag_to(x, y);
        self.react(reaction, cx);
    }

    pub fn release(&mut self, x: f32, y: f32, cx: &mut Context<Self>) {
        let reaction = self.session.release(x, y);
        self.react(reaction, cx);
    }

    pub fn choose_promotion(&mut self, choice: Option<&str>, cx: &mut Context<Self>) {
        let reaction = self.session.choose_promotion(choice);
        self.react(reaction, cx);
    }

    pub fn submit_text(&mut self, text: &str, cx: &mut Context<Self>) {
        let reaction = self.session.submit_text(text);
        self.react(reaction, cx);
    }

    pub fn reset(&mut self, cx: &mut Context<Self>) {
        let reaction = self.session.reset();
        self.react(reaction, cx);
    }

    pub fn flip(&mut self, cx: &mut Context<Self>) {
        let reaction = self.session.flip();
        self.react(reaction, cx);
    }

    pub fn choose_side(&mut self, side: PlayerSide, cx: &mut Context<Self>) {
        let reaction = self.session.choose_side(side);
        self.react(reaction, cx);
    }

    pub fn set_mode(&mut self, mode: GameMode, cx: &mut Context<Self>) {
        let reaction = self.session.set_mode(mode);
        self.react(reaction, cx);
    }

    fn react(&mut self, reaction: Reaction, cx: &mut Context<Self>) {
        let Reaction {
            redraw,
            notices,
            engine_turn,
            promotion_prompt,
        } = reaction;

        if let Some(ticket) = engine_turn {
            self.schedule_engine_turn(ticket, cx);
        }
        for notice in notices {
            cx.emit(GameEvent::Notice(notice));
        }
        if promotion_prompt {
            cx.emit(GameEvent::PromotionRequested);
        }
        if redraw {
            cx.notify();
        }
    }

    fn schedule_engine_turn(&mut self, ticket: EngineTicket, cx: &mut Context<Self>) {
        debug!(generation = ticket.generation, "engine turn scheduled");
        let task = cx.spawn(async move |weak_entity: WeakEntity<GameModel>, cx: &mut AsyncApp| {
            Self::run_engine_turn(weak_entity, ticket, cx).await;
        });
        self._engine_task = Some(task);
    }

    async fn run_engine_turn(
        weak_entity: WeakEntity<GameModel>,
        ticket: EngineTicket,
        cx: &mut AsyncApp,
    ) {
        // give the human's move a moment on screen
        cx.background_executor().timer(ticket.delay).await;

        let job = weak_entity.update(cx, |game, _| game.session.begin_engine_turn(ticket));
        let Ok(Some(job)) = job else {
            return;
        };

        let reply = cx.background_executor().spawn(async move { job.run() }).await;

        let _ = weak_entity.update(cx, |game, cx| {
            let reaction = game.session.finish_engine_turn(reply);
            game.react(reaction, cx);
        });
    }
}
