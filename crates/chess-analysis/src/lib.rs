//! Chess game analysis driven by a UCI engine.
//!
//! This crate runs a long-lived engine session (handshake, request/response
//! matching, searches) and turns the resulting scores into per-move quality
//! labels.
//!
//! # Overview
//!
//! - [`EngineSession`] - One engine connection: handshake, waits, searches
//! - [`LineDispatcher`] - Routes engine output lines to waiting requests
//! - [`Deferred`] - Single-assignment value used for session readiness
//! - [`to_percent`] - Maps centipawns onto a 0..100 winning-chance scale
//! - [`classify`] / [`MoveQuality`] - Labels a move from two evaluations
//! - [`GameAnalyzer`] - Analyzes complete games
//!
//! # Example
//!
//! ```ignore
//! use chess_analysis::{AnalysisConfig, EngineSession, GameAnalyzer};
//!
//! let config = AnalysisConfig::default();
//! let session = EngineSession::spawn(&config.engine.path, &config.engine.args, config.session_options())?;
//! session.ready().await?;
//! let analyzer = GameAnalyzer::new(session, chess_openings::builtin_book(), config.go_options());
//! let analysis = analyzer.analyze_moves(None, &moves).await?;
//! println!("White blunders: {}", analysis.white_stats.blunders);
//! ```

pub mod analyzer;
pub mod config;
pub mod deferred;
pub mod dispatch;
pub mod engine;
pub mod percent;
pub mod quality;
pub mod session;

pub use analyzer::{label_plies, replay, AnalyzerError, GameAnalysis, GameAnalyzer, PlyAnalysis};
pub use config::{AnalysisConfig, ConfigError, EngineConfig};
pub use deferred::{Deferred, DeferredError, Promise, Settled};
pub use dispatch::{LineDispatcher, Predicate, Subscription};
pub use engine::{EngineError, EngineProcess, EngineTransport, LineReceiver};
pub use percent::to_percent;
pub use quality::{classify, MoveQuality, PlayerStats};
pub use session::{
    CancelToken, EngineSession, PositionEvaluation, SessionOptions, SessionState, WaitOptions,
};
