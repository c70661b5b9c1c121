//! chess-analyze - Labels every move of a game using a UCI engine.
//!
//! Reads settings from `analysis.toml` (if present), applies command-line
//! overrides, runs the engine over each position and prints the analysis
//! as JSON on stdout. Logs go to stderr; set `RUST_LOG=debug` to see the
//! engine traffic.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chess_analysis::{AnalysisConfig, EngineSession, GameAnalysis, GameAnalyzer};
use chess_openings::{builtin_book, OpeningBook};
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// Analyze a chess game with a UCI engine.
#[derive(Parser)]
#[command(name = "chess-analyze")]
#[command(about = "Labels each move of a game using a UCI engine")]
struct Args {
    /// Moves in UCI notation (e.g. e2e4 e7e5 g1f3)
    moves: Vec<String>,

    /// Configuration file
    #[arg(long, default_value = AnalysisConfig::FILE_NAME)]
    config: PathBuf,

    /// Starting position (defaults to the standard start)
    #[arg(long)]
    fen: Option<String>,

    /// File with one FEN per line, analysed instead of moves
    #[arg(long, conflicts_with_all = ["moves", "fen"])]
    fens_file: Option<PathBuf>,

    /// Engine executable
    #[arg(long)]
    engine: Option<String>,

    /// Search depth per position
    #[arg(long)]
    depth: Option<u32>,

    /// Search time per position in milliseconds (overrides depth)
    #[arg(long)]
    movetime: Option<u64>,

    /// Engine search threads
    #[arg(long)]
    threads: Option<u32>,

    /// Extra opening book (JSON)
    #[arg(long)]
    book: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

impl Args {
    fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(engine) = &self.engine {
            config.engine.path = engine.clone();
        }
        if let Some(depth) = self.depth {
            config.depth = depth;
            config.movetime_ms = None;
        }
        if let Some(movetime) = self.movetime {
            config.movetime_ms = Some(movetime);
        }
        if let Some(threads) = self.threads {
            config.engine.threads = threads;
        }
        if let Some(book) = &self.book {
            config.book_path = Some(book.clone());
        }
    }
}

fn load_book(config: &AnalysisConfig) -> anyhow::Result<OpeningBook> {
    let mut book = builtin_book();
    if let Some(path) = &config.book_path {
        let extra = OpeningBook::load(path)
            .with_context(|| format!("Failed to load opening book {:?}", path))?;
        tracing::info!("Loaded {} book positions from {:?}", extra.len(), path);
        book.merge(extra);
    }
    Ok(book)
}

fn read_fens(path: &Path) -> anyhow::Result<Vec<String>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

async fn run(analyzer: &GameAnalyzer, args: &Args) -> anyhow::Result<GameAnalysis> {
    analyzer.session().ready().await.context("Engine failed to start")?;
    tracing::info!(
        "Engine ready: {}",
        analyzer.session().engine_name().unwrap_or("unknown")
    );

    let analysis = match &args.fens_file {
        Some(path) => analyzer.analyze_fens(&read_fens(path)?).await?,
        None => analyzer.analyze_moves(args.fen.as_deref(), &args.moves).await?,
    };
    Ok(analysis)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut config = AnalysisConfig::load(&args.config)
        .with_context(|| format!("Failed to load config {:?}", args.config))?;
    args.apply(&mut config);

    if args.fens_file.is_none() && args.moves.is_empty() && args.fen.is_none() {
        bail!("Nothing to analyze: pass moves, --fen or --fens-file");
    }

    tracing::info!("Engine: {}", config.engine.path);
    tracing::info!("Search: {}", config.go_options().to_uci());

    let book = load_book(&config)?;
    let session = EngineSession::spawn(
        &config.engine.path,
        &config.engine.args,
        config.session_options(),
    )?;
    let analyzer = GameAnalyzer::new(session, book, config.go_options());

    let outcome = tokio::select! {
        result = run(&analyzer, &args) => Some(result),
        _ = signal::ctrl_c() => {
            tracing::info!("Interrupted, stopping engine");
            let _ = analyzer.session().stop();
            None
        }
    };
    let _ = analyzer.session().quit();

    let Some(result) = outcome else {
        return Ok(());
    };
    let analysis = result?;

    tracing::info!(
        "White: {} blunders, {} mistakes; Black: {} blunders, {} mistakes",
        analysis.white_stats.blunders,
        analysis.white_stats.mistakes,
        analysis.black_stats.blunders,
        analysis.black_stats.mistakes
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&analysis)?
    } else {
        serde_json::to_string(&analysis)?
    };
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "chess-analyze",
            "--engine",
            "/opt/sf",
            "--movetime",
            "200",
            "--threads",
            "1",
            "e2e4",
            "e7e5",
        ]);
        let mut config = AnalysisConfig::default();
        args.apply(&mut config);

        assert_eq!(args.moves, vec!["e2e4", "e7e5"]);
        assert_eq!(config.engine.path, "/opt/sf");
        assert_eq!(config.engine.threads, 1);
        assert_eq!(config.go_options().to_uci(), "go movetime 200");
    }

    #[test]
    fn test_depth_flag_clears_configured_movetime() {
        let args = Args::parse_from(["chess-analyze", "--depth", "9", "d2d4"]);
        let mut config = AnalysisConfig {
            movetime_ms: Some(1000),
            ..AnalysisConfig::default()
        };
        args.apply(&mut config);
        assert_eq!(config.go_options().to_uci(), "go depth 9");
    }

    #[test]
    fn test_fens_file_conflicts_with_moves() {
        let result = Args::try_parse_from(["chess-analyze", "--fens-file", "game.txt", "e2e4"]);
        assert!(result.is_err());
    }
}
