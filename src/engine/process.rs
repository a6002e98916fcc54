//! External UCI engine process.
//!
//! Architecture:
//! - The engine's stdout is drained by a reader OS thread into a channel
//! - Commands are written straight to the engine's stdin
//! - Every wait on the channel is bounded, so a hung engine surfaces as a timeout

use std::ffi::OsString;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::{Engine, EngineLauncher, SearchRequest};
use crate::domain::uci::{EngineLine, UciCommand, parse_best_move};
use crate::error::EngineError;
use shakmaty::Move;

/// How long a quitting engine gets before it is killed
const QUIT_GRACE: Duration = Duration::from_millis(500);

/// Messages sent from the engine reader thread
#[derive(Debug)]
enum EngineEvent {
    /// A line of output from the engine
    Output(String),
    /// Engine closed its stdout
    Exited,
    /// Reading failed
    Error(String),
}

/// Spawns [`UciEngine`]s from a binary path
#[derive(Clone, Debug)]
pub struct UciLauncher {
    program: PathBuf,
    args: Vec<OsString>,
    response_timeout: Duration,
}

impl UciLauncher {
    pub fn new(program: impl Into<PathBuf>, response_timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            response_timeout,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl EngineLauncher for UciLauncher {
    type Engine = UciEngine;

    fn launch(&self) -> Result<UciEngine, EngineError> {
        UciEngine::start(&self.program, &self.args, self.response_timeout)
    }
}

/// A running engine process that has completed the UCI handshake
pub struct UciEngine {
    process: Option<Child>,
    stdin: Option<ChildStdin>,
    events: Receiver<EngineEvent>,
    /// Bound on handshake replies, and added on top of the search time
    response_timeout: Duration,
}

impl UciEngine {
    pub fn start(
        program: &Path,
        args: &[OsString],
        response_timeout: Duration,
    ) -> Result<Self, EngineError> {
        // bare names are left to the PATH lookup
        if program.components().count() > 1 && !program.exists() {
            return Err(EngineError::NotFound(program.to_path_buf()));
        }

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                path: program.to_path_buf(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or(EngineError::Pipe("stdin"))?;
        let stdout = child.stdout.take().ok_or(EngineError::Pipe("stdout"))?;

        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();

        // Reader thread (OS thread for blocking I/O)
        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                match line {
                    Ok(text) => {
                        if event_tx.send(EngineEvent::Output(text)).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        let _ = event_tx.send(EngineEvent::Error(e.to_string()));
                        return;
                    }
                }
            }
            let _ = event_tx.send(EngineEvent::Exited);
        });

        let mut engine = Self {
            process: Some(child),
            stdin: Some(stdin),
            events: event_rx,
            response_timeout,
        };

        engine.send(UciCommand::Uci)?;
        engine.wait_for(response_timeout, |kind| {
            matches!(kind, EngineLine::UciOk).then_some(())
        })?;
        engine.send(UciCommand::UciNewGame)?;
        engine.send(UciCommand::IsReady)?;
        engine.wait_for(response_timeout, |kind| {
            matches!(kind, EngineLine::ReadyOk).then_some(())
        })?;

        info!(engine = %program.display(), "engine started");
        Ok(engine)
    }

    fn send(&mut self, cmd: UciCommand) -> Result<(), EngineError> {
        let stdin = self.stdin.as_mut().ok_or(EngineError::Exited)?;
        debug!(">> {}", cmd);
        writeln!(stdin, "{}", cmd)?;
        stdin.flush()?;
        Ok(())
    }

    /// Read engine output until `accept` picks a line or `timeout` passes
    fn wait_for<T>(
        &self,
        timeout: Duration,
        mut accept: impl FnMut(EngineLine) -> Option<T>,
    ) -> Result<T, EngineError> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.events.recv_timeout(remaining) {
                Ok(EngineEvent::Output(line)) => {
                    debug!("<< {}", line);
                    if let Some(value) = accept(EngineLine::classify(&line)) {
                        return Ok(value);
                    }
                }
                Ok(EngineEvent::Exited) | Err(RecvTimeoutError::Disconnected) => {
                    return Err(EngineError::Exited);
                }
                Ok(EngineEvent::Error(e)) => return Err(EngineError::Protocol(e)),
                Err(RecvTimeoutError::Timeout) => return Err(EngineError::Timeout(timeout)),
            }
        }
    }
}

impl Engine for UciEngine {
    fn best_move(&mut self, request: &SearchRequest) -> Result<Option<Move>, EngineError> {
        self.send(UciCommand::StartPos(request.moves.clone()))?;
        self.send(UciCommand::GoMoveTime(request.move_time.as_millis() as u64))?;

        let payload = self.wait_for(request.move_time + self.response_timeout, |kind| {
            match kind {
                EngineLine::BestMove(payload) => Some(payload),
                _ => None,
            }
        })?;

        let Some(uci) = parse_best_move(&payload).map_err(EngineError::Protocol)? else {
            return Ok(None);
        };
        uci.to_move(&request.position)
            .map(Some)
            .map_err(|_| EngineError::Protocol(format!("engine played illegal move {}", uci)))
    }

    fn quit(&mut self) {
        let Some(mut child) = self.process.take() else {
            return;
        };

        if let Err(e) = self.send(UciCommand::Quit) {
            debug!("quit not delivered: {}", e);
        }
        self.stdin = None;

        let deadline = Instant::now() + QUIT_GRACE;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    info!(%status, "engine stopped");
                    return;
                }
                Ok(None) if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(10));
                }
                _ => break,
            }
        }

        warn!("engine ignored quit, killing it");
        let _ = child.kill();
        let _ = child.wait();
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        self.quit();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use shakmaty::uci::UciMove;
    use shakmaty::{Chess, Position};

    const FAKE_ENGINE: &str = r#"
while read -r line; do
  case "$line" in
    uci) echo "id name fake"; echo uciok ;;
    isready) echo readyok ;;
    go*) echo "info depth 1 score cp 12 pv e7e5"; echo "bestmove e7e5 ponder g1f3" ;;
    quit) exit 0 ;;
  esac
done
"#;

    const NO_MOVE_ENGINE: &str = r#"
while read -r line; do
  case "$line" in
    uci) echo uciok ;;
    isready) echo readyok ;;
    go*) echo "bestmove (none)" ;;
    quit) exit 0 ;;
  esac
done
"#;

    const SILENT_SEARCH_ENGINE: &str = r#"
while read -r line; do
  case "$line" in
    uci) echo uciok ;;
    isready) echo readyok ;;
    quit) exit 0 ;;
  esac
done
"#;

    fn launcher(script: &str) -> UciLauncher {
        UciLauncher::new("sh", Duration::from_secs(5)).with_args(["-c", script])
    }

    fn after_e4() -> SearchRequest {
        let start = Chess::default();
        let uci: UciMove = "e2e4".parse().unwrap();
        let m = uci.to_move(&start).unwrap();
        SearchRequest {
            position: start.play(m).unwrap(),
            moves: vec![uci],
            move_time: Duration::from_millis(10),
        }
    }

    #[test]
    fn test_best_move_from_script_engine() {
        let mut engine = launcher(FAKE_ENGINE).launch().unwrap();
        let m = engine.best_move(&after_e4()).unwrap().unwrap();
        assert_eq!(m.from(), Some(shakmaty::Square::E7));
        assert_eq!(m.to(), shakmaty::Square::E5);
        engine.quit();
        assert!(engine.process.is_none());
    }

    #[test]
    fn test_engine_without_move() {
        let mut engine = launcher(NO_MOVE_ENGINE).launch().unwrap();
        assert!(engine.best_move(&after_e4()).unwrap().is_none());
    }

    #[test]
    fn test_search_timeout() {
        let mut engine = UciLauncher::new("sh", Duration::from_millis(200))
            .with_args(["-c", SILENT_SEARCH_ENGINE])
            .launch()
            .unwrap();
        let err = engine.best_move(&after_e4()).unwrap_err();
        assert!(matches!(err, EngineError::Timeout(_)));
    }

    #[test]
    fn test_engine_exiting_during_handshake() {
        // depending on timing the dead engine shows up on stdout or on stdin
        let result = launcher("exit 0").launch();
        assert!(matches!(
            result,
            Err(EngineError::Exited | EngineError::Io(_))
        ));
    }

    #[test]
    fn test_missing_binary() {
        let result = UciLauncher::new("/nonexistent/dir/stockfish", Duration::from_secs(1)).launch();
        assert!(matches!(result, Err(EngineError::NotFound(_))));
    }
}
