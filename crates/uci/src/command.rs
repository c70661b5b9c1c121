//! Commands sent from the analysis side to the engine.

use crate::UciError;

/// Commands sent from GUI to engine.
#[derive(Debug, Clone, PartialEq)]
pub enum GuiCommand {
    /// Initialize UCI mode.
    Uci,
    /// Check if engine is ready.
    IsReady,
    /// Set an engine option.
    SetOption { name: String, value: Option<String> },
    /// Start of a new game; engine may clear its hash.
    UciNewGame,
    /// Set up position. `fen: None` is the standard start.
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },
    /// Start calculating.
    Go(GoOptions),
    /// Stop calculating.
    Stop,
    /// Quit the engine.
    Quit,
    /// Anything else, kept verbatim.
    Unknown(String),
}

/// Search limits for the `go` command.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GoOptions {
    /// Search to this depth.
    pub depth: Option<u32>,
    /// Search for exactly this time in milliseconds.
    pub movetime: Option<u64>,
    /// Stop after this many nodes.
    pub nodes: Option<u64>,
    /// Search indefinitely until `stop`.
    pub infinite: bool,
}

impl GuiCommand {
    /// Parse a UCI command string.
    pub fn parse(input: &str) -> Result<Self, UciError> {
        let input = input.trim();
        let (keyword, rest) = input.split_once(' ').unwrap_or((input, ""));
        let args: Vec<&str> = rest.split_whitespace().collect();

        Ok(match keyword {
            "uci" => GuiCommand::Uci,
            "isready" => GuiCommand::IsReady,
            "ucinewgame" => GuiCommand::UciNewGame,
            "stop" => GuiCommand::Stop,
            "quit" => GuiCommand::Quit,
            "setoption" => parse_setoption(&args)?,
            "position" => parse_position(&args)?,
            "go" => GuiCommand::Go(GoOptions::parse(&args)),
            _ => GuiCommand::Unknown(input.to_string()),
        })
    }

    /// Format command for output.
    pub fn to_uci(&self) -> String {
        match self {
            GuiCommand::Uci => "uci".to_string(),
            GuiCommand::IsReady => "isready".to_string(),
            GuiCommand::SetOption { name, value } => match value {
                Some(v) => format!("setoption name {} value {}", name, v),
                None => format!("setoption name {}", name),
            },
            GuiCommand::UciNewGame => "ucinewgame".to_string(),
            GuiCommand::Position { fen, moves } => {
                let base = match fen {
                    Some(f) => format!("position fen {}", f),
                    None => "position startpos".to_string(),
                };
                if moves.is_empty() {
                    base
                } else {
                    format!("{} moves {}", base, moves.join(" "))
                }
            }
            GuiCommand::Go(opts) => opts.to_uci(),
            GuiCommand::Stop => "stop".to_string(),
            GuiCommand::Quit => "quit".to_string(),
            GuiCommand::Unknown(s) => s.clone(),
        }
    }
}

fn parse_setoption(args: &[&str]) -> Result<GuiCommand, UciError> {
    let Some(("name", rest)) = args.split_first().map(|(first, rest)| (*first, rest)) else {
        return Err(UciError::ParseError(
            "Expected 'name' after setoption".to_string(),
        ));
    };
    let (name, value) = match rest.iter().position(|&s| s == "value") {
        Some(idx) => (rest[..idx].join(" "), Some(rest[idx + 1..].join(" "))),
        None => (rest.join(" "), None),
    };
    if name.is_empty() {
        return Err(UciError::ParseError("Missing option name".to_string()));
    }
    Ok(GuiCommand::SetOption { name, value })
}

fn parse_position(args: &[&str]) -> Result<GuiCommand, UciError> {
    let split = args.iter().position(|&s| s == "moves");
    let (setup, moves) = match split {
        Some(idx) => (&args[..idx], &args[idx + 1..]),
        None => (args, &[][..]),
    };

    let fen = match setup.split_first() {
        Some((&"startpos", [])) => None,
        Some((&"fen", fields)) if !fields.is_empty() => Some(fields.join(" ")),
        Some((other, _)) => {
            return Err(UciError::ParseError(format!(
                "Expected 'startpos' or 'fen <fen>', got '{}'",
                other
            )))
        }
        None => {
            return Err(UciError::ParseError(
                "Expected 'startpos' or 'fen'".to_string(),
            ))
        }
    };

    Ok(GuiCommand::Position {
        fen,
        moves: moves.iter().map(|m| m.to_string()).collect(),
    })
}

impl GoOptions {
    /// Search to a fixed depth.
    pub fn depth(depth: u32) -> Self {
        Self {
            depth: Some(depth),
            ..Self::default()
        }
    }

    /// Search for a fixed time.
    pub fn movetime(ms: u64) -> Self {
        Self {
            movetime: Some(ms),
            ..Self::default()
        }
    }

    /// Reads limits from the arguments of a `go` command. Unknown keywords
    /// and unparsable values are skipped.
    fn parse(args: &[&str]) -> Self {
        let mut opts = Self::default();
        let mut tokens = args.iter().copied();
        while let Some(token) = tokens.next() {
            match token {
                "infinite" => opts.infinite = true,
                "depth" => opts.depth = tokens.next().and_then(|v| v.parse().ok()),
                "movetime" => opts.movetime = tokens.next().and_then(|v| v.parse().ok()),
                "nodes" => opts.nodes = tokens.next().and_then(|v| v.parse().ok()),
                _ => {}
            }
        }
        opts
    }

    /// Format as a `go` command.
    pub fn to_uci(&self) -> String {
        let mut cmd = "go".to_string();
        if let Some(d) = self.depth {
            cmd.push_str(&format!(" depth {}", d));
        }
        if let Some(t) = self.movetime {
            cmd.push_str(&format!(" movetime {}", t));
        }
        if let Some(n) = self.nodes {
            cmd.push_str(&format!(" nodes {}", n));
        }
        if self.infinite {
            cmd.push_str(" infinite");
        }
        cmd
    }
}
