//! Game analysis with move quality classification.
//!
//! This module provides the [`GameAnalyzer`] for evaluating every position of
//! a game through an [`EngineSession`] and labelling each move.

use std::sync::Arc;

use chess_openings::{BookLookup, OpeningBook};
use serde::Serialize;
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position};
use thiserror::Error;
use tracing::{debug, info};
use uci::{Evaluation, GoOptions};

use crate::engine::EngineError;
use crate::percent::to_percent;
use crate::quality::{classify, MoveQuality, PlayerStats};
use crate::session::EngineSession;

/// Errors that can occur during game analysis.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Error from the analysis engine.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    /// Invalid game data was provided.
    #[error("Invalid game data: {0}")]
    InvalidGame(String),
}

/// One analysed position of a game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlyAnalysis {
    /// 0 for the starting position, then one per half-move.
    pub ply: usize,
    pub fen: String,
    /// Move that led here, in UCI notation, when known.
    #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
    pub mv: Option<String>,
    /// Evaluation from White's point of view.
    pub evaluation: Option<Evaluation>,
    /// White's winning chances, 0 to 100.
    pub percent: Option<f64>,
    /// Engine's preferred continuation from this position.
    pub best_move: String,
    /// Label for the move that led here. Always `None` for ply 0.
    pub quality: Option<MoveQuality>,
}

/// Result of analysing a whole game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameAnalysis {
    pub plies: Vec<PlyAnalysis>,
    pub white_stats: PlayerStats,
    pub black_stats: PlayerStats,
}

/// True when White made the move that produced `fen`.
///
/// That is the side *not* to move in `fen`. `None` if the side-to-move
/// field is missing or malformed.
pub fn moved_by_white(fen: &str) -> Option<bool> {
    match fen.split_whitespace().nth(1)? {
        "b" => Some(true),
        "w" => Some(false),
        _ => None,
    }
}

/// Labels each move of a game from consecutive evaluations.
///
/// `fens[0]` is the starting position and `fens[i]` the position after ply
/// `i`; `evals` runs parallel to it. The result has one entry per ply, so it
/// is one shorter than the inputs.
pub fn label_plies(
    evals: &[Option<Evaluation>],
    fens: &[String],
    book: &impl BookLookup,
) -> Vec<Option<MoveQuality>> {
    let centipawns = |i: usize| {
        evals
            .get(i)
            .and_then(Option::as_ref)
            .map(|e| f64::from(e.centipawns()))
    };

    (1..fens.len())
        .map(|i| {
            let is_white = moved_by_white(&fens[i])?;
            classify(centipawns(i - 1), centipawns(i), is_white, &fens[i], book)
        })
        .collect()
}

/// Analyzes chess games to classify move quality.
///
/// Uses a ready [`EngineSession`] to evaluate each position and an opening
/// book to recognise theory.
pub struct GameAnalyzer {
    session: Arc<EngineSession>,
    book: OpeningBook,
    go: GoOptions,
}

impl GameAnalyzer {
    pub fn new(session: Arc<EngineSession>, book: OpeningBook, go: GoOptions) -> Self {
        Self { session, book, go }
    }

    pub fn session(&self) -> &Arc<EngineSession> {
        &self.session
    }

    pub fn book(&self) -> &OpeningBook {
        &self.book
    }

    /// Analyzes a game given as the list of positions it passed through.
    ///
    /// # Errors
    ///
    /// Returns an error if `fens` is empty or any engine search fails.
    pub async fn analyze_fens(&self, fens: &[String]) -> Result<GameAnalysis, AnalyzerError> {
        self.analyze(fens, &[]).await
    }

    /// Analyzes a game given as UCI moves from `start_fen` (the standard
    /// starting position when `None`).
    ///
    /// # Errors
    ///
    /// Returns an error if the start position or any move is invalid, or
    /// if an engine search fails.
    pub async fn analyze_moves(
        &self,
        start_fen: Option<&str>,
        moves: &[String],
    ) -> Result<GameAnalysis, AnalyzerError> {
        let fens = replay(start_fen, moves)?;
        self.analyze(&fens, moves).await
    }

    async fn analyze(&self, fens: &[String], moves: &[String]) -> Result<GameAnalysis, AnalyzerError> {
        if fens.is_empty() {
            return Err(AnalyzerError::InvalidGame("no positions provided".to_string()));
        }

        self.session.new_game().await?;

        let mut searches = Vec::with_capacity(fens.len());
        for (ply, fen) in fens.iter().enumerate() {
            let result = self.session.evaluate(fen, &self.go).await?;
            debug!(
                ply,
                eval = %result
                    .evaluation
                    .as_ref()
                    .map_or_else(|| "-".to_string(), ToString::to_string),
                best = %result.best_move,
                "position analysed"
            );
            searches.push(result);
        }

        let evals: Vec<Option<Evaluation>> = searches.iter().map(|s| s.evaluation.clone()).collect();
        let labels = label_plies(&evals, fens, &self.book);

        let mut white_stats = PlayerStats::default();
        let mut black_stats = PlayerStats::default();
        let mut plies = Vec::with_capacity(fens.len());

        for (ply, (fen, search)) in fens.iter().zip(searches).enumerate() {
            let quality = if ply == 0 { None } else { labels[ply - 1] };
            if ply > 0 {
                match moved_by_white(fen) {
                    Some(true) => white_stats.record(quality),
                    Some(false) => black_stats.record(quality),
                    None => {}
                }
            }
            let mv = ply.checked_sub(1).and_then(|i| moves.get(i)).cloned();
            if let Some(quality) = quality {
                debug!(ply, "{} {}", mv.as_deref().unwrap_or("-"), quality.symbol());
            }
            plies.push(PlyAnalysis {
                ply,
                fen: fen.clone(),
                mv,
                percent: search
                    .evaluation
                    .as_ref()
                    .map(|e| to_percent(f64::from(e.centipawns()))),
                evaluation: search.evaluation,
                best_move: search.best_move,
                quality,
            });
        }

        info!(
            plies = plies.len() - 1,
            white_blunders = white_stats.blunders,
            black_blunders = black_stats.blunders,
            "game analysed"
        );

        Ok(GameAnalysis {
            plies,
            white_stats,
            black_stats,
        })
    }
}

/// Plays `moves` from `start_fen` and returns every position, start included.
pub fn replay(start_fen: Option<&str>, moves: &[String]) -> Result<Vec<String>, AnalyzerError> {
    let mut position: Chess = match start_fen {
        None => Chess::default(),
        Some(fen) => fen
            .parse::<Fen>()
            .map_err(|e| AnalyzerError::InvalidGame(format!("{}: {}", fen, e)))?
            .into_position(CastlingMode::Standard)
            .map_err(|e| AnalyzerError::InvalidGame(format!("{}: {}", fen, e)))?,
    };

    let mut fens = Vec::with_capacity(moves.len() + 1);
    fens.push(Fen::from_position(&position, EnPassantMode::Legal).to_string());

    for (index, uci) in moves.iter().enumerate() {
        let illegal = || AnalyzerError::InvalidGame(format!("illegal move {} at ply {}", uci, index + 1));
        let parsed: UciMove = uci.parse().map_err(|_| illegal())?;
        let mv = parsed.to_move(&position).map_err(|_| illegal())?;
        position = position.play(mv).map_err(|_| illegal())?;
        fens.push(Fen::from_position(&position, EnPassantMode::Legal).to_string());
    }

    Ok(fens)
}
