//! UCI (Universal Chess Interface) protocol helpers for driving an analysis engine.
//!
//! This crate covers the GUI side of the protocol: formatting the commands we
//! send and making sense of the lines the engine prints back.
//!
//! # Commands sent to the engine
//!
//! - `uci` - Initialize engine, get id and options
//! - `isready` / `readyok` - Synchronization
//! - `setoption name <name> [value <value>]` - Configure (e.g. `Threads`)
//! - `position fen <fen> [moves <move>...]` - Set position
//! - `go [depth <d>] [movetime <ms>] [nodes <n>] [infinite]` - Start search
//! - `stop` - Stop search
//! - `quit` - Exit engine
//!
//! # Lines read from the engine
//!
//! - [`parse_line`] - Extract a centipawn or mate [`Evaluation`] from an `info` line
//! - [`is_uciok`], [`is_readyok`], [`is_bestmove`] - Recognise the replies a wait ends on
//! - [`parse_bestmove`], [`parse_id_name`] - Pull fields out of `bestmove` and `id name`

mod command;
mod evaluation;
mod message;

pub use command::{GoOptions, GuiCommand};
pub use evaluation::{parse_line, Evaluation, MATE_SENTINEL_CP};
pub use message::{is_bestmove, is_readyok, is_uciok, parse_bestmove, parse_id_name};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UciError {
    #[error("Parse error: {0}")]
    ParseError(String),
}
