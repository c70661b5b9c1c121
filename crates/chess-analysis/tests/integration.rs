//! Integration tests for chess-analysis crate.
//!
//! Most tests drive an [`EngineSession`] against a scripted in-process
//! engine. The tests at the bottom require Stockfish to be installed and
//! available in PATH.
//! Run them with: `cargo test -p chess-analysis --test integration -- --ignored`

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chess_analysis::{
    AnalyzerError, CancelToken, EngineError, EngineSession, GameAnalyzer, LineReceiver,
    MoveQuality, SessionOptions, SessionState, WaitOptions,
};
use chess_openings::{builtin_book, piece_placement};
use tokio::sync::mpsc;
use tokio::time::Instant;
use uci::{GoOptions, GuiCommand, MATE_SENTINEL_CP};

const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";

type CommandLog = Arc<Mutex<Vec<String>>>;

/// Runs `respond` for every command the session sends. Returning `None`
/// makes the fake engine exit.
fn fake_engine(
    mut respond: impl FnMut(&str) -> Option<Vec<String>> + Send + 'static,
) -> (mpsc::UnboundedSender<String>, LineReceiver, CommandLog) {
    let (command_tx, mut command_rx) = mpsc::unbounded_channel::<String>();
    let (line_tx, line_rx) = mpsc::unbounded_channel::<String>();
    let log = CommandLog::default();
    let seen = Arc::clone(&log);

    tokio::spawn(async move {
        while let Some(command) = command_rx.recv().await {
            seen.lock().unwrap().push(command.clone());
            let Some(lines) = respond(&command) else {
                return;
            };
            for line in lines {
                if line_tx.send(line).is_err() {
                    return;
                }
            }
        }
    });

    (command_tx, line_rx, log)
}

/// A well-behaved engine. `scores` maps piece placements to the `score`
/// part of the final info line, from the side to move's point of view.
///
/// Extra commands for tests: `echo a b` replies with lines `a` and `b`,
/// `exit` kills the engine.
fn stockfish_like(
    scores: HashMap<&'static str, &'static str>,
) -> impl FnMut(&str) -> Option<Vec<String>> + Send + 'static {
    let mut position: Option<String> = None;
    move |command| {
        let lines = match GuiCommand::parse(command) {
            Ok(GuiCommand::Uci) => vec![
                "id name FakeFish 1.0".to_string(),
                "id author Test".to_string(),
                "option name Threads type spin default 1 min 1 max 512".to_string(),
                "uciok".to_string(),
            ],
            Ok(GuiCommand::IsReady) => vec!["readyok".to_string()],
            Ok(GuiCommand::Position { fen, .. }) => {
                position = fen;
                Vec::new()
            }
            Ok(GuiCommand::Go(_)) => {
                let placement = position.as_deref().map(piece_placement).unwrap_or("");
                let score = scores.get(placement).copied().unwrap_or("cp 0");
                vec![
                    "info string NNUE evaluation enabled".to_string(),
                    "info depth 1 seldepth 1 score cp 1 nodes 20 pv a2a3".to_string(),
                    format!("info depth 12 seldepth 18 score {} nodes 9000 pv e2e4 e7e5", score),
                    "bestmove e2e4 ponder e7e5".to_string(),
                ]
            }
            Ok(GuiCommand::Quit) => return None,
            Ok(GuiCommand::Unknown(text)) if text == "exit" => return None,
            Ok(GuiCommand::Unknown(text)) => match text.strip_prefix("echo ") {
                Some(rest) => rest.split_whitespace().map(str::to_string).collect(),
                None => Vec::new(),
            },
            _ => Vec::new(),
        };
        Some(lines)
    }
}

/// Like [`stockfish_like`], but a search of the `slow` placement only
/// reports after `think`. While it runs, other commands wait behind it
/// except `stop`, which makes it report at once, and `isready`, which is
/// answered after the search output.
fn slow_engine(
    scores: HashMap<&'static str, &'static str>,
    slow: &'static str,
    think: Duration,
) -> (mpsc::UnboundedSender<String>, LineReceiver, CommandLog) {
    let (command_tx, mut command_rx) = mpsc::unbounded_channel::<String>();
    let (line_tx, line_rx) = mpsc::unbounded_channel::<String>();
    let log = CommandLog::default();
    let seen = Arc::clone(&log);
    let mut respond = stockfish_like(scores);

    tokio::spawn(async move {
        let mut position = String::new();
        let mut pending: Vec<String> = Vec::new();
        let mut deadline: Option<Instant> = None;
        let mut backlog: VecDeque<String> = VecDeque::new();
        loop {
            let mut lines = Vec::new();
            let command = match backlog.pop_front() {
                Some(command) if deadline.is_none() => command,
                queued => {
                    if let Some(command) = queued {
                        backlog.push_front(command);
                    }
                    let due = deadline;
                    let finished = async move {
                        match due {
                            Some(at) => tokio::time::sleep_until(at).await,
                            None => std::future::pending().await,
                        }
                    };
                    tokio::select! {
                        command = command_rx.recv() => {
                            let Some(command) = command else {
                                return;
                            };
                            seen.lock().unwrap().push(command.clone());
                            command
                        }
                        _ = finished => {
                            deadline = None;
                            for line in pending.drain(..) {
                                let _ = line_tx.send(line);
                            }
                            continue;
                        }
                    }
                }
            };

            match command.as_str() {
                "stop" | "isready" => {
                    deadline = None;
                    lines.append(&mut pending);
                    if command == "isready" {
                        lines.push("readyok".to_string());
                    }
                }
                _ if deadline.is_some() => backlog.push_back(command.clone()),
                go if go.starts_with("go") && piece_placement(&position) == slow => {
                    pending = respond(go).unwrap_or_default();
                    deadline = Some(Instant::now() + think);
                }
                other => {
                    if let Some(fen) = other.strip_prefix("position fen ") {
                        position = fen.to_string();
                    }
                    match respond(other) {
                        Some(reply) => lines = reply,
                        None => return,
                    }
                }
            }
            for line in lines {
                if line_tx.send(line).is_err() {
                    return;
                }
            }
        }
    });

    (command_tx, line_rx, log)
}

fn start_session(
    scores: HashMap<&'static str, &'static str>,
    options: SessionOptions,
) -> (Arc<EngineSession>, CommandLog) {
    let (transport, lines, log) = fake_engine(stockfish_like(scores));
    (EngineSession::start(transport, lines, options), log)
}

#[tokio::test]
async fn test_handshake_runs_once_for_many_waiters() {
    let (session, log) = start_session(HashMap::new(), SessionOptions::default());

    let mut waiters = Vec::new();
    for _ in 0..10 {
        let session = Arc::clone(&session);
        waiters.push(tokio::spawn(async move { session.ready().await }));
    }
    for waiter in waiters {
        waiter.await.unwrap().unwrap();
    }
    session.ready().await.unwrap();

    // Flush the fake engine's queue before inspecting what it received.
    session.send_and_wait_for("isready", |l| l == "readyok").await.unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["uci", "isready", "setoption name Threads value 5", "isready"]
    );
    assert_eq!(session.state(), SessionState::Ready);
    assert_eq!(session.engine_name(), Some("FakeFish 1.0"));
}

#[tokio::test]
async fn test_threads_option_follows_configuration() {
    let options = SessionOptions {
        threads: 2,
        ..SessionOptions::default()
    };
    let (session, log) = start_session(HashMap::new(), options);
    session.ready().await.unwrap();
    session.send_and_wait_for("isready", |l| l == "readyok").await.unwrap();
    assert!(log
        .lock()
        .unwrap()
        .contains(&"setoption name Threads value 2".to_string()));
}

#[tokio::test]
async fn test_handshake_fails_when_engine_exits() {
    let (transport, lines, _log) = fake_engine(|_| None);
    let session = EngineSession::start(transport, lines, SessionOptions::default());

    let err = session.ready().await.unwrap_err();
    assert!(matches!(err, EngineError::InitFailed(_)), "got {:?}", err);
    assert!(matches!(session.state(), SessionState::Failed(_)));

    // Readiness stays failed; nothing is retried.
    assert!(session.ready().await.is_err());
}

#[tokio::test]
async fn test_handshake_timeout() {
    let (transport, lines, log) = fake_engine(|_| Some(Vec::new()));
    let options = SessionOptions {
        handshake_timeout: Some(Duration::from_millis(50)),
        ..SessionOptions::default()
    };
    let session = EngineSession::start(transport, lines, options);

    match session.ready().await {
        Err(EngineError::InitFailed(reason)) => assert!(reason.contains("`uci`"), "{}", reason),
        other => panic!("Expected InitFailed, got {:?}", other),
    }
    assert_eq!(*log.lock().unwrap(), vec!["uci"]);
}

#[tokio::test]
async fn test_concurrent_waits_with_disjoint_predicates() {
    let (session, _log) = start_session(HashMap::new(), SessionOptions::default());
    session.ready().await.unwrap();

    // The reply to the second request arrives first, then the first's.
    let (first, second) = tokio::join!(
        session.send_and_wait_for("echo", |l| l == "pong-a"),
        session.send_and_wait_for("echo pong-b pong-a", |l| l == "pong-b"),
    );
    assert_eq!(first.unwrap(), "pong-a");
    assert_eq!(second.unwrap(), "pong-b");
}

#[tokio::test]
async fn test_unmatched_lines_are_ignored() {
    let (session, _log) = start_session(HashMap::new(), SessionOptions::default());
    session.ready().await.unwrap();

    let line = session
        .send_and_wait_for("echo noise info-line wanted", |l| l == "wanted")
        .await
        .unwrap();
    assert_eq!(line, "wanted");
}

#[tokio::test]
async fn test_wait_timeout() {
    let (session, _log) = start_session(HashMap::new(), SessionOptions::default());
    session.ready().await.unwrap();

    let err = session
        .send_and_wait_for_with(
            "echo something-else",
            |l| l == "never",
            WaitOptions::timeout(Duration::from_millis(50)),
        )
        .await
        .unwrap_err();
    match err {
        EngineError::Timeout { command, after } => {
            assert_eq!(command, "echo something-else");
            assert_eq!(after, Duration::from_millis(50));
        }
        other => panic!("Expected Timeout, got {:?}", other),
    }

    // The timed-out subscriber is gone and does not swallow later lines.
    let line = session
        .send_and_wait_for("echo never", |l| l == "never")
        .await
        .unwrap();
    assert_eq!(line, "never");
}

#[tokio::test]
async fn test_default_wait_timeout_from_options() {
    let options = SessionOptions {
        wait_timeout: Some(Duration::from_millis(30)),
        ..SessionOptions::default()
    };
    let (session, _log) = start_session(HashMap::new(), options);
    session.ready().await.unwrap();

    let result = session.send_and_wait_for("echo", |l| l == "never").await;
    assert!(matches!(result, Err(EngineError::Timeout { .. })));
}

#[tokio::test]
async fn test_wait_cancel() {
    let (session, _log) = start_session(HashMap::new(), SessionOptions::default());
    session.ready().await.unwrap();

    let token = CancelToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let result = session
        .send_and_wait_for_with("echo", |l| l == "never", WaitOptions::cancel(token))
        .await;
    assert!(matches!(result, Err(EngineError::Cancelled)));
}

#[tokio::test]
async fn test_pending_wait_fails_when_engine_exits() {
    let (session, _log) = start_session(HashMap::new(), SessionOptions::default());
    session.ready().await.unwrap();

    let result = session.send_and_wait_for("exit", |l| l == "never").await;
    assert!(matches!(result, Err(EngineError::Closed)), "got {:?}", result);

    let again = session.send_and_wait_for("isready", |l| l == "readyok").await;
    assert!(matches!(again, Err(EngineError::Closed)));
}

#[tokio::test]
async fn test_evaluate_reports_white_relative_scores() {
    let scores = HashMap::from([
        (piece_placement(START), "mate 3"),
        (piece_placement(AFTER_E4), "cp 40"),
    ]);
    let (session, log) = start_session(scores, SessionOptions::default());
    let go = GoOptions::depth(12);

    let black = session.evaluate(AFTER_E4, &go).await.unwrap();
    let evaluation = black.evaluation.expect("scored info line");
    assert_eq!(evaluation.centipawns(), -40);
    assert_eq!(evaluation.pv(), ["e2e4", "e7e5"]);
    assert_eq!(black.best_move, "e2e4");
    assert_eq!(black.ponder.as_deref(), Some("e7e5"));

    let white = session.evaluate(START, &go).await.unwrap();
    let evaluation = white.evaluation.expect("scored info line");
    assert!(evaluation.is_mate());
    assert_eq!(evaluation.centipawns(), MATE_SENTINEL_CP);

    let log = log.lock().unwrap();
    assert!(log.contains(&format!("position fen {}", AFTER_E4)));
    assert!(log.contains(&"go depth 12".to_string()));
}

#[tokio::test]
async fn test_concurrent_evaluations_are_serialized() {
    let scores = HashMap::from([
        (piece_placement(START), "cp 25"),
        (piece_placement(AFTER_E4), "cp 30"),
    ]);
    let (session, _log) = start_session(scores, SessionOptions::default());
    let go = GoOptions::depth(8);

    let (start, after_e4) = tokio::join!(session.evaluate(START, &go), session.evaluate(AFTER_E4, &go));
    assert_eq!(start.unwrap().evaluation.unwrap().centipawns(), 25);
    assert_eq!(after_e4.unwrap().evaluation.unwrap().centipawns(), -30);
}

#[tokio::test]
async fn test_timed_out_search_does_not_leak_into_next_evaluation() {
    let scores = HashMap::from([
        (piece_placement(START), "cp -900"),
        (piece_placement(AFTER_E4), "cp 10"),
    ]);
    let (transport, lines, log) =
        slow_engine(scores, piece_placement(START), Duration::from_millis(300));
    let options = SessionOptions {
        wait_timeout: Some(Duration::from_millis(50)),
        ..SessionOptions::default()
    };
    let session = EngineSession::start(transport, lines, options);
    let go = GoOptions::depth(20);

    match session.evaluate(START, &go).await {
        Err(EngineError::Timeout { command, .. }) => assert_eq!(command, "go depth 20"),
        other => panic!("Expected Timeout, got {:?}", other),
    }

    let next = session.evaluate(AFTER_E4, &go).await.unwrap();
    assert_eq!(next.evaluation.unwrap().centipawns(), -10);
    assert_eq!(next.best_move, "e2e4");

    let log = log.lock().unwrap();
    let abandoned = log.iter().position(|c| c == "go depth 20").unwrap();
    assert_eq!(log[abandoned + 1], "stop");
    assert_eq!(log[abandoned + 2], "isready");
    assert_eq!(log[abandoned + 3], format!("position fen {}", AFTER_E4));
}

#[tokio::test]
async fn test_evaluate_rejects_invalid_fen() {
    let (session, _log) = start_session(HashMap::new(), SessionOptions::default());
    let result = session.evaluate("not a position", &GoOptions::depth(1)).await;
    assert!(matches!(result, Err(EngineError::InvalidPosition(_))));
}

#[tokio::test]
async fn test_analyze_moves_end_to_end() {
    let scores = HashMap::from([
        ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR", "cp 20"),
        ("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR", "cp -20"),
        ("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR", "cp 20"),
        // 2.a3, well outside theory, scored badly for White.
        ("rnbqkbnr/pppp1ppp/8/4p3/4P3/P7/1PPP1PPP/RNBQKBNR", "cp 300"),
    ]);
    let (session, log) = start_session(scores, SessionOptions::default());
    let analyzer = GameAnalyzer::new(session, builtin_book(), GoOptions::depth(10));

    let moves: Vec<String> = ["e2e4", "e7e5", "a2a3"].iter().map(|m| m.to_string()).collect();
    let analysis = analyzer.analyze_moves(None, &moves).await.unwrap();

    assert_eq!(analysis.plies.len(), 4);
    assert_eq!(analysis.plies[0].quality, None);
    assert_eq!(analysis.plies[0].mv, None);
    assert_eq!(analysis.plies[1].quality, Some(MoveQuality::Book));
    assert_eq!(analysis.plies[2].quality, Some(MoveQuality::Book));
    assert_eq!(analysis.plies[3].mv.as_deref(), Some("a2a3"));
    assert_eq!(analysis.plies[3].percent, Some(35.0));
    assert_eq!(analysis.plies[3].quality, Some(MoveQuality::Mistake));

    assert_eq!(analysis.white_stats.total_moves, 2);
    assert_eq!(analysis.white_stats.book, 1);
    assert_eq!(analysis.white_stats.mistakes, 1);
    assert_eq!(analysis.black_stats.total_moves, 1);
    assert_eq!(analysis.black_stats.book, 1);

    let log = log.lock().unwrap();
    assert!(log.contains(&"ucinewgame".to_string()));
    assert_eq!(log.iter().filter(|c| c.starts_with("go ")).count(), 4);

    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["plies"][3]["move"], "a2a3");
    assert_eq!(json["plies"][3]["quality"], "mistake");
}

#[tokio::test]
async fn test_analyze_rejects_bad_input() {
    let (session, _log) = start_session(HashMap::new(), SessionOptions::default());
    let analyzer = GameAnalyzer::new(session, builtin_book(), GoOptions::depth(1));

    assert!(matches!(
        analyzer.analyze_fens(&[]).await,
        Err(AnalyzerError::InvalidGame(_))
    ));
    let moves = vec!["e2e5".to_string()];
    assert!(matches!(
        analyzer.analyze_moves(None, &moves).await,
        Err(AnalyzerError::InvalidGame(_))
    ));
}

/// Check if Stockfish is available in PATH.
fn stockfish_available() -> bool {
    std::process::Command::new("stockfish")
        .arg("--version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .is_ok()
}

fn stockfish_options() -> SessionOptions {
    SessionOptions {
        threads: 1,
        handshake_timeout: Some(Duration::from_secs(10)),
        wait_timeout: Some(Duration::from_secs(60)),
    }
}

#[tokio::test]
#[ignore = "requires Stockfish"]
async fn test_stockfish_session() {
    if !stockfish_available() {
        eprintln!("Skipping test: Stockfish not available");
        return;
    }

    let session = EngineSession::spawn("stockfish", &[], stockfish_options())
        .expect("Failed to start Stockfish");
    session.ready().await.expect("handshake");

    let name = session.engine_name().unwrap_or_default().to_lowercase();
    assert!(name.contains("stockfish"), "unexpected engine name: {}", name);

    let result = session
        .evaluate(START, &GoOptions::depth(10))
        .await
        .expect("Failed to analyze starting position");
    assert!(!result.best_move.is_empty(), "Best move should not be empty");
    let evaluation = result.evaluation.expect("Stockfish reports a score");
    assert!(evaluation.centipawns().abs() < 200);

    session.quit().unwrap();
}

#[tokio::test]
#[ignore = "requires Stockfish"]
async fn test_scholars_mate_game_analysis() {
    if !stockfish_available() {
        eprintln!("Skipping test: Stockfish not available");
        return;
    }

    // 1.e4 e5 2.Qh5 Nc6 3.Bc4 Nf6?? 4.Qxf7#
    let moves: Vec<String> = ["e2e4", "e7e5", "d1h5", "b8c6", "f1c4", "g8f6", "h5f7"]
        .iter()
        .map(|m| m.to_string())
        .collect();

    let session = EngineSession::spawn("stockfish", &[], stockfish_options())
        .expect("Failed to start Stockfish");
    let analyzer = GameAnalyzer::new(session, builtin_book(), GoOptions::depth(12));
    let analysis = analyzer
        .analyze_moves(None, &moves)
        .await
        .expect("Failed to analyze game");

    assert_eq!(analysis.plies.len(), 8);
    assert_eq!(analysis.plies[6].quality, Some(MoveQuality::Blunder));
    assert!(analysis.black_stats.blunders >= 1);

    // Black is checkmated: White's winning chances are maxed out.
    assert_eq!(analysis.plies[7].percent, Some(100.0));

    analyzer.session().quit().unwrap();
}
