//! Engine process plumbing: errors, the transport seam, and the stdin/stdout
//! bridge to a spawned UCI engine.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::deferred::DeferredError;

/// Errors that can occur when working with chess engines.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to spawn the engine process.
    #[error("Failed to spawn engine: {0}")]
    SpawnError(#[from] std::io::Error),
    /// Engine executable was not found at the specified path.
    #[error("Engine not found at path: {0}")]
    NotFound(String),
    /// The UCI handshake did not complete.
    #[error("Engine initialization failed: {0}")]
    InitFailed(String),
    /// Engine returned an invalid or unexpected response.
    #[error("Invalid engine response: {0}")]
    InvalidResponse(String),
    /// The position handed to the engine could not be parsed.
    #[error("Invalid position: {0}")]
    InvalidPosition(String),
    /// The engine's input or output channel is gone.
    #[error("Engine channel closed")]
    Closed,
    /// No matching reply arrived in time.
    #[error("Timed out after {after:?} waiting for a reply to `{command}`")]
    Timeout { command: String, after: Duration },
    /// The wait was cancelled by the caller.
    #[error("Wait cancelled")]
    Cancelled,
}

impl From<DeferredError> for EngineError {
    fn from(error: DeferredError) -> Self {
        match error {
            DeferredError::Rejected(reason) => EngineError::InitFailed(reason),
            DeferredError::Abandoned => EngineError::Closed,
        }
    }
}

/// Outbound half of an engine connection.
///
/// Commands must be delivered in the order they are sent. Replies come back
/// separately as a stream of lines (see [`LineReceiver`]).
pub trait EngineTransport: Send + Sync + 'static {
    /// Queues one command line (without trailing newline).
    fn send(&self, command: &str) -> Result<(), EngineError>;
}

/// Inbound half of an engine connection: one item per output line.
pub type LineReceiver = mpsc::UnboundedReceiver<String>;

impl EngineTransport for mpsc::UnboundedSender<String> {
    fn send(&self, command: &str) -> Result<(), EngineError> {
        mpsc::UnboundedSender::send(self, command.to_string()).map_err(|_| EngineError::Closed)
    }
}

/// A spawned engine process bridged onto channels.
///
/// A writer task drains queued commands into the engine's stdin and a
/// reader task forwards each stdout line. The process is killed when this
/// value is dropped.
pub struct EngineProcess {
    child: Child,
    commands: mpsc::UnboundedSender<String>,
}

impl EngineProcess {
    /// Spawns the engine and returns it together with its output lines.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// - `EngineError::NotFound` if `path` names a file that doesn't exist
    /// - `EngineError::SpawnError` if the engine process fails to start
    pub fn spawn(path: &str, args: &[String]) -> Result<(Self, LineReceiver), EngineError> {
        // Bare names are resolved through PATH by the OS.
        let looks_like_path = path.contains(std::path::MAIN_SEPARATOR) || path.contains('/');
        if looks_like_path && !Path::new(path).exists() {
            return Err(EngineError::NotFound(path.to_string()));
        }

        let mut child = Command::new(path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::InitFailed("Failed to open stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::InitFailed("Failed to open stdout".to_string()))?;

        let (commands, mut command_rx) = mpsc::unbounded_channel::<String>();
        let (line_tx, line_rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            while let Some(cmd) = command_rx.recv().await {
                let written = async {
                    stdin.write_all(cmd.as_bytes()).await?;
                    stdin.write_all(b"\n").await?;
                    stdin.flush().await
                };
                if let Err(e) = written.await {
                    warn!(error = %e, "engine stdin closed");
                    break;
                }
            }
        });

        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if line_tx.send(line).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        debug!("engine stdout reached EOF");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to read engine output");
                        break;
                    }
                }
            }
        });

        Ok((Self { child, commands }, line_rx))
    }

    /// OS process id, while the process is running.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }
}

impl EngineTransport for EngineProcess {
    fn send(&self, command: &str) -> Result<(), EngineError> {
        self.commands
            .send(command.to_string())
            .map_err(|_| EngineError::Closed)
    }
}
