//! Engine collaborator seam.
//!
//! A search is packaged as an [`EngineJob`] so it can run off the UI thread;
//! the matching [`EngineReply`] carries the engine handle back together with
//! the generation ticket it was issued under.

mod process;

pub use process::UciLauncher;

use std::time::Duration;

use shakmaty::uci::UciMove;
use shakmaty::{Chess, Move};

use crate::error::EngineError;

/// Everything an engine needs to pick a move
#[derive(Clone, Debug)]
pub struct SearchRequest {
    /// Position to search; matches `moves` played from the start position
    pub position: Chess,
    pub moves: Vec<UciMove>,
    pub move_time: Duration,
}

/// A live connection to a move-selecting engine
pub trait Engine: Send + 'static {
    /// `Ok(None)` means the engine reported that it has no move.
    fn best_move(&mut self, request: &SearchRequest) -> Result<Option<Move>, EngineError>;

    fn quit(&mut self);
}

/// Creates engine connections on demand
pub trait EngineLauncher: Clone + Send + 'static {
    type Engine: Engine;

    fn launch(&self) -> Result<Self::Engine, EngineError>;
}

/// Identifies one scheduled engine turn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineTicket {
    pub generation: u64,
    pub delay: Duration,
}

#[derive(Debug)]
pub enum EngineOutcome {
    Move(Move),
    /// The engine answered but offered no move
    NoMove,
    /// The engine could not be started; nothing was asked
    Unavailable(EngineError),
    /// The engine was reached but the exchange failed
    Failed(EngineError),
}

pub struct EngineJob<L: EngineLauncher> {
    pub ticket: EngineTicket,
    pub request: SearchRequest,
    pub(crate) engine: Option<L::Engine>,
    pub(crate) launcher: L,
}

pub struct EngineReply<E: Engine> {
    pub ticket: EngineTicket,
    pub engine: Option<E>,
    pub outcome: EngineOutcome,
}

impl<L: EngineLauncher> EngineJob<L> {
    /// Run the search to completion. Blocks; call from a worker.
    pub fn run(self) -> EngineReply<L::Engine> {
        let EngineJob {
            ticket,
            request,
            engine,
            launcher,
        } = self;

        let mut engine = match engine {
            Some(engine) => engine,
            None => match launcher.launch() {
                Ok(engine) => engine,
                Err(err) => {
                    return EngineReply {
                        ticket,
                        engine: None,
                        outcome: EngineOutcome::Unavailable(err),
                    };
                }
            },
        };

        let outcome = match engine.best_move(&request) {
            Ok(Some(m)) => EngineOutcome::Move(m),
            Ok(None) => EngineOutcome::NoMove,
            Err(err) => EngineOutcome::Failed(err),
        };

        EngineReply {
            ticket,
            engine: Some(engine),
            outcome,
        }
    }
}
