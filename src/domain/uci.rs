//! The slice of UCI this app speaks.
//!
//! Only builds command lines and sorts engine output; the process itself is
//! driven from `engine::process`.

use std::fmt;

use shakmaty::uci::UciMove;

/// Commands sent to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciCommand {
    Uci,
    IsReady,
    UciNewGame,
    /// `position startpos moves ...`
    StartPos(Vec<UciMove>),
    /// Search for a fixed number of milliseconds
    GoMoveTime(u64),
    Quit,
}

impl fmt::Display for UciCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciCommand::Uci => f.write_str("uci"),
            UciCommand::IsReady => f.write_str("isready"),
            UciCommand::UciNewGame => f.write_str("ucinewgame"),
            UciCommand::StartPos(moves) => {
                f.write_str("position startpos")?;
                if !moves.is_empty() {
                    f.write_str(" moves")?;
                    for m in moves {
                        write!(f, " {}", m)?;
                    }
                }
                Ok(())
            }
            UciCommand::GoMoveTime(ms) => write!(f, "go movetime {}", ms),
            UciCommand::Quit => f.write_str("quit"),
        }
    }
}

/// The engine lines the app waits for; everything else is `Other`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineLine {
    UciOk,
    ReadyOk,
    /// Everything after the `bestmove` keyword
    BestMove(String),
    Other,
}

impl EngineLine {
    pub fn classify(line: &str) -> Self {
        let line = line.trim();
        match line {
            "uciok" => EngineLine::UciOk,
            "readyok" => EngineLine::ReadyOk,
            _ => match line.strip_prefix("bestmove") {
                Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
                    EngineLine::BestMove(rest.trim().to_string())
                }
                _ => EngineLine::Other,
            },
        }
    }
}

/// Read the move out of the payload of a `bestmove` line.
///
/// `Ok(None)` means the engine has no move to offer (`(none)` or `0000`).
pub fn parse_best_move(payload: &str) -> Result<Option<UciMove>, String> {
    let Some(token) = payload.split_whitespace().next() else {
        return Err("bestmove without a move".to_string());
    };
    if token == "(none)" || token == "0000" {
        return Ok(None);
    }
    token
        .parse::<UciMove>()
        .map(Some)
        .map_err(|_| format!("unreadable bestmove {:?}", token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_without_moves() {
        assert_eq!(UciCommand::StartPos(vec![]).to_string(), "position startpos");
    }

    #[test]
    fn test_startpos_with_moves() {
        let moves = ["e2e4", "e7e5", "g7h8q"]
            .iter()
            .map(|m| m.parse().unwrap())
            .collect();
        assert_eq!(
            UciCommand::StartPos(moves).to_string(),
            "position startpos moves e2e4 e7e5 g7h8q"
        );
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(UciCommand::Uci.to_string(), "uci");
        assert_eq!(UciCommand::UciNewGame.to_string(), "ucinewgame");
        assert_eq!(UciCommand::GoMoveTime(300).to_string(), "go movetime 300");
        assert_eq!(UciCommand::Quit.to_string(), "quit");
    }

    #[test]
    fn test_classify() {
        assert_eq!(EngineLine::classify("uciok"), EngineLine::UciOk);
        assert_eq!(EngineLine::classify("readyok\r"), EngineLine::ReadyOk);
        assert_eq!(
            EngineLine::classify("bestmove e2e4 ponder e7e5"),
            EngineLine::BestMove("e2e4 ponder e7e5".to_string())
        );
        assert_eq!(EngineLine::classify("bestmove"), EngineLine::BestMove(String::new()));
        assert_eq!(
            EngineLine::classify("info depth 20 score cp 35 pv e2e4 e7e5"),
            EngineLine::Other
        );
        assert_eq!(EngineLine::classify("bestmoves are rare"), EngineLine::Other);
    }

    #[test]
    fn test_parse_best_move() {
        let m = parse_best_move("e2e4 ponder e7e5").unwrap().unwrap();
        assert_eq!(m.to_string(), "e2e4");

        let promo = parse_best_move("a7a8q").unwrap().unwrap();
        assert_eq!(promo.to_string(), "a7a8q");
    }

    #[test]
    fn test_parse_best_move_none() {
        assert_eq!(parse_best_move("(none)"), Ok(None));
        assert_eq!(parse_best_move("0000"), Ok(None));
    }

    #[test]
    fn test_parse_best_move_garbage() {
        assert!(parse_best_move("").is_err());
        assert!(parse_best_move("hello").is_err());
    }
}
