//! Moves played in the current game and terminal-state detection.

use std::collections::HashMap;
use std::fmt;

use shakmaty::san::San;
use shakmaty::uci::UciMove;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position};

/// Halfmove clock value at which the seventy-five-move rule ends the game
const SEVENTY_FIVE_MOVE_PLIES: u32 = 150;
const FIVEFOLD: u32 = 5;

/// Why a game ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
    /// The engine could not continue; no result on the board
    EngineFailure,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Termination::Checkmate => "checkmate",
            Termination::Stalemate => "stalemate",
            Termination::InsufficientMaterial => "insufficient material",
            Termination::SeventyFiveMoves => "seventy-five-move rule",
            Termination::FivefoldRepetition => "fivefold repetition",
            Termination::EngineFailure => "engine failure",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameResult {
    pub winner: Option<Color>,
    pub termination: Termination,
}

impl GameResult {
    /// PGN-style score
    pub fn score(&self) -> &'static str {
        match (self.termination, self.winner) {
            (Termination::EngineFailure, _) => "*",
            (_, Some(Color::White)) => "1-0",
            (_, Some(Color::Black)) => "0-1",
            (_, None) => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.score(), self.termination)
    }
}

/// Applied moves plus how often each position has occurred
#[derive(Clone, Debug)]
pub struct GameRecord {
    uci: Vec<UciMove>,
    san: Vec<String>,
    occurrences: HashMap<Zobrist64, u32>,
}

impl GameRecord {
    pub fn new(start: &Chess) -> Self {
        let mut record = Self {
            uci: Vec::new(),
            san: Vec::new(),
            occurrences: HashMap::new(),
        };
        record.count(start);
        record
    }

    fn count(&mut self, position: &Chess) {
        let hash = position.zobrist_hash::<Zobrist64>(EnPassantMode::Legal);
        *self.occurrences.entry(hash).or_insert(0) += 1;
    }

    /// Record `m`, played from `before` and resulting in `after`
    pub fn push(&mut self, before: &Chess, m: &Move, after: &Chess) {
        self.uci.push(m.to_uci(CastlingMode::Standard));
        self.san.push(San::from_move(before, m.clone()).to_string());
        self.count(after);
    }

    pub fn uci_moves(&self) -> &[UciMove] {
        &self.uci
    }

    #[allow(dead_code)]
    pub fn san_moves(&self) -> &[String] {
        &self.san
    }

    pub fn len(&self) -> usize {
        self.uci.len()
    }

    /// How many times `position` has occurred in this game
    pub fn occurrences(&self, position: &Chess) -> u32 {
        let hash = position.zobrist_hash::<Zobrist64>(EnPassantMode::Legal);
        self.occurrences.get(&hash).copied().unwrap_or(0)
    }

    /// Terminal state of `position`, the latest position of this game
    pub fn result(&self, position: &Chess) -> Option<GameResult> {
        if position.is_checkmate() {
            return Some(GameResult {
                winner: Some(position.turn().other()),
                termination: Termination::Checkmate,
            });
        }

        let termination = if position.is_stalemate() {
            Termination::Stalemate
        } else if position.is_insufficient_material() {
            Termination::InsufficientMaterial
        } else if position.halfmoves() >= SEVENTY_FIVE_MOVE_PLIES {
            Termination::SeventyFiveMoves
        } else if self.occurrences(position) >= FIVEFOLD {
            Termination::FivefoldRepetition
        } else {
            return None;
        };

        Some(GameResult {
            winner: None,
            termination,
        })
    }

    /// Move pairs for display: (move number, white, black)
    pub fn numbered_pairs(&self) -> Vec<(usize, String, Option<String>)> {
        self.san
            .chunks(2)
            .enumerate()
            .map(|(i, chunk)| (i + 1, chunk[0].clone(), chunk.get(1).cloned()))
            .collect()
    }
}
