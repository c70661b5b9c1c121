//! Engine session: the UCI handshake and request/response exchanges.
//!
//! An [`EngineSession`] owns one engine connection for its whole life. On
//! [`start`](EngineSession::start) it runs the `uci` / `isready` / `setoption`
//! handshake once in the background and publishes the result through a
//! [`Deferred`] that any number of callers can [`ready`](EngineSession::ready)
//! on. After that, arbitrary commands are exchanged through
//! [`send_and_wait_for`](EngineSession::send_and_wait_for).

use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;

use serde::Serialize;
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Color, Position};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uci::{
    is_bestmove, is_readyok, is_uciok, parse_bestmove, parse_id_name, parse_line, Evaluation,
    GoOptions, GuiCommand,
};

use crate::deferred::Deferred;
use crate::dispatch::LineDispatcher;
use crate::engine::{EngineError, EngineProcess, EngineTransport, LineReceiver};

/// Session settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Value for `setoption name Threads` after the handshake.
    pub threads: u32,
    /// Bound on each handshake step. `None` waits forever.
    pub handshake_timeout: Option<Duration>,
    /// Default bound for [`EngineSession::send_and_wait_for`]. `None` waits forever.
    pub wait_timeout: Option<Duration>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            threads: 5,
            handshake_timeout: None,
            wait_timeout: None,
        }
    }
}

/// Where the session is in its handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Starting,
    Ready,
    Failed(String),
}

/// Cancels outstanding waits when triggered. Clones share the signal.
#[derive(Debug, Clone)]
pub struct CancelToken {
    signal: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            signal: Arc::new(signal),
        }
    }

    pub fn cancel(&self) {
        self.signal.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.signal.borrow()
    }

    /// Completes once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.signal.subscribe();
        // Only errors if the sender is gone, and `self` holds it.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-call bounds for a wait.
#[derive(Debug, Clone, Default)]
pub struct WaitOptions {
    pub timeout: Option<Duration>,
    pub cancel: Option<CancelToken>,
}

impl WaitOptions {
    pub fn timeout(after: Duration) -> Self {
        Self {
            timeout: Some(after),
            cancel: None,
        }
    }

    pub fn cancel(token: CancelToken) -> Self {
        Self {
            timeout: None,
            cancel: Some(token),
        }
    }
}

/// Result of a single search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionEvaluation {
    /// Last scored `info` line before `bestmove`, White-relative.
    pub evaluation: Option<Evaluation>,
    /// The best move found (in UCI notation, e.g., "e2e4").
    pub best_move: String,
    pub ponder: Option<String>,
}

/// A running UCI engine and the state of its handshake.
pub struct EngineSession {
    transport: Box<dyn EngineTransport>,
    dispatcher: Arc<LineDispatcher>,
    ready: Deferred<()>,
    options: SessionOptions,
    engine_name: Arc<OnceLock<String>>,
    /// Serializes searches; `go` replies carry no request id.
    search: tokio::sync::Mutex<()>,
}

impl EngineSession {
    /// Starts a session over an existing connection.
    ///
    /// Spawns the task that feeds `lines` to waiting requests and the task
    /// that runs the handshake, then returns. Await [`ready`](Self::ready)
    /// before analysing. Must be called from within a Tokio runtime.
    pub fn start(
        transport: impl EngineTransport,
        mut lines: LineReceiver,
        options: SessionOptions,
    ) -> Arc<Self> {
        let session = Arc::new(Self {
            transport: Box::new(transport),
            dispatcher: LineDispatcher::new(),
            ready: Deferred::new(),
            options,
            engine_name: Arc::new(OnceLock::new()),
            search: tokio::sync::Mutex::new(()),
        });

        let dispatcher = Arc::clone(&session.dispatcher);
        tokio::spawn(async move {
            while let Some(line) = lines.recv().await {
                debug!(line = %line, "engine >");
                dispatcher.dispatch(&line);
            }
            debug!("engine output closed");
            dispatcher.close();
        });

        let handshake = Arc::clone(&session);
        tokio::spawn(async move {
            match handshake.handshake().await {
                Ok(()) => {
                    info!(
                        engine = handshake.engine_name().unwrap_or("unknown"),
                        threads = handshake.options.threads,
                        "engine ready"
                    );
                    handshake.ready.resolve(());
                }
                Err(e) => {
                    warn!(error = %e, "engine handshake failed");
                    handshake.ready.reject(e.to_string());
                }
            }
        });

        session
    }

    /// Spawns an engine executable and starts a session on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started. Handshake
    /// failures are reported through [`ready`](Self::ready).
    pub fn spawn(
        path: &str,
        args: &[String],
        options: SessionOptions,
    ) -> Result<Arc<Self>, EngineError> {
        let (process, lines) = EngineProcess::spawn(path, args)?;
        info!(path, pid = ?process.id(), "engine process started");
        Ok(Self::start(process, lines, options))
    }

    async fn handshake(&self) -> Result<(), EngineError> {
        let bound = WaitOptions {
            timeout: self.options.handshake_timeout,
            cancel: None,
        };

        let name = Arc::clone(&self.engine_name);
        self.send_and_wait_for_with(
            &GuiCommand::Uci.to_uci(),
            move |line| {
                if let Some(id) = parse_id_name(line) {
                    let _ = name.set(id.to_string());
                }
                is_uciok(line)
            },
            bound.clone(),
        )
        .await?;

        self.send_and_wait_for_with(&GuiCommand::IsReady.to_uci(), is_readyok, bound)
            .await?;

        self.send(
            &GuiCommand::SetOption {
                name: "Threads".to_string(),
                value: Some(self.options.threads.to_string()),
            }
            .to_uci(),
        )
    }

    /// Waits for the handshake to finish. Never re-runs it.
    ///
    /// # Errors
    ///
    /// `EngineError::InitFailed` if the handshake failed, or
    /// `EngineError::Closed` if the session went away first.
    pub async fn ready(&self) -> Result<(), EngineError> {
        self.ready.wait().await.map_err(EngineError::from)
    }

    pub fn state(&self) -> SessionState {
        match self.ready.peek() {
            None => SessionState::Starting,
            Some(Ok(())) => SessionState::Ready,
            Some(Err(e)) => SessionState::Failed(e.to_string()),
        }
    }

    /// Name reported by `id name` during the handshake.
    pub fn engine_name(&self) -> Option<&str> {
        self.engine_name.get().map(String::as_str)
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Sends a command without waiting for any reply.
    pub fn send(&self, command: &str) -> Result<(), EngineError> {
        debug!(cmd = command, "engine <");
        self.transport.send(command)
    }

    /// Sends `command` and resolves with the first line satisfying `predicate`.
    ///
    /// The predicate is registered before the command goes out and is
    /// removed once it matches or the wait ends. Uses the session's
    /// default timeout.
    pub async fn send_and_wait_for(
        &self,
        command: &str,
        predicate: impl Fn(&str) -> bool + Send + 'static,
    ) -> Result<String, EngineError> {
        let bound = WaitOptions {
            timeout: self.options.wait_timeout,
            cancel: None,
        };
        self.send_and_wait_for_with(command, predicate, bound).await
    }

    /// [`send_and_wait_for`](Self::send_and_wait_for) with explicit bounds.
    ///
    /// # Errors
    ///
    /// - `EngineError::Timeout` if nothing matched within `options.timeout`
    /// - `EngineError::Cancelled` if `options.cancel` fired first
    /// - `EngineError::Closed` if the engine's output ended
    pub async fn send_and_wait_for_with(
        &self,
        command: &str,
        predicate: impl Fn(&str) -> bool + Send + 'static,
        options: WaitOptions,
    ) -> Result<String, EngineError> {
        let subscription = self.dispatcher.subscribe(predicate);
        self.send(command)?;

        let reply = async move { subscription.await.ok_or(EngineError::Closed) };
        let bounded = async {
            match options.timeout {
                Some(after) => tokio::time::timeout(after, reply).await.map_err(|_| {
                    warn!(cmd = command, ?after, "engine wait timed out");
                    EngineError::Timeout {
                        command: command.to_string(),
                        after,
                    }
                })?,
                None => reply.await,
            }
        };

        match &options.cancel {
            Some(token) => tokio::select! {
                result = bounded => result,
                _ = token.cancelled() => Err(EngineError::Cancelled),
            },
            None => bounded.await,
        }
    }

    /// Searches `fen` and reports the final score and best move.
    ///
    /// Scores are converted to White's point of view. Searches on one
    /// session run one at a time. If the wait for `bestmove` times out, the
    /// search is stopped and its late output discarded before the error is
    /// returned.
    pub async fn evaluate(&self, fen: &str, go: &GoOptions) -> Result<PositionEvaluation, EngineError> {
        self.ready().await?;
        let invert = side_to_move(fen)? == Color::Black;

        let _search = self.search.lock().await;
        self.send(
            &GuiCommand::Position {
                fen: Some(fen.to_string()),
                moves: Vec::new(),
            }
            .to_uci(),
        )?;

        let latest: Arc<Mutex<Option<Evaluation>>> = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&latest);
        let reply = self
            .send_and_wait_for(&GuiCommand::Go(go.clone()).to_uci(), move |line| {
                if is_bestmove(line) {
                    return true;
                }
                if let Some(eval) = parse_line(line, invert) {
                    *sink.lock().unwrap_or_else(PoisonError::into_inner) = Some(eval);
                }
                false
            })
            .await;
        let line = match reply {
            Ok(line) => line,
            Err(e) => {
                if matches!(e, EngineError::Timeout { .. } | EngineError::Cancelled) {
                    self.abandon_search().await;
                }
                return Err(e);
            }
        };

        let (best_move, ponder) =
            parse_bestmove(&line).ok_or_else(|| EngineError::InvalidResponse(line.clone()))?;
        let evaluation = latest.lock().unwrap_or_else(PoisonError::into_inner).take();

        Ok(PositionEvaluation {
            evaluation,
            best_move,
            ponder,
        })
    }

    /// Stops a search nobody is waiting for any more and swallows the rest of
    /// its output, so the next search only sees its own lines. Must run with
    /// the search lock held.
    async fn abandon_search(&self) {
        let bound = WaitOptions {
            timeout: self.options.wait_timeout,
            cancel: None,
        };
        match self
            .send_and_wait_for_with(&GuiCommand::Stop.to_uci(), is_bestmove, bound.clone())
            .await
        {
            Ok(line) => debug!(line = %line, "discarded abandoned search"),
            Err(e) => warn!(error = %e, "abandoned search did not report a best move"),
        }
        if let Err(e) = self
            .send_and_wait_for_with(&GuiCommand::IsReady.to_uci(), is_readyok, bound)
            .await
        {
            warn!(error = %e, "engine did not resync after stop");
        }
    }

    /// Tells the engine to clear its state and waits until it is ready again.
    pub async fn new_game(&self) -> Result<(), EngineError> {
        self.ready().await?;
        self.send(&GuiCommand::UciNewGame.to_uci())?;
        self.send_and_wait_for(&GuiCommand::IsReady.to_uci(), is_readyok)
            .await
            .map(|_| ())
    }

    /// Stops any running search.
    pub fn stop(&self) -> Result<(), EngineError> {
        self.send(&GuiCommand::Stop.to_uci())
    }

    /// Asks the engine to exit.
    pub fn quit(&self) -> Result<(), EngineError> {
        self.send(&GuiCommand::Quit.to_uci())
    }
}

/// Side to move in a FEN.
pub(crate) fn side_to_move(fen: &str) -> Result<Color, EngineError> {
    let setup: Fen = fen
        .parse()
        .map_err(|e| EngineError::InvalidPosition(format!("{}: {}", fen, e)))?;
    let position: Chess = setup
        .into_position(CastlingMode::Standard)
        .map_err(|e| EngineError::InvalidPosition(format!("{}: {}", fen, e)))?;
    Ok(position.turn())
}
