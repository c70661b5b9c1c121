//! Score extraction from engine `info` lines.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Centipawn stand-in used for forced-mate scores.
pub const MATE_SENTINEL_CP: i32 = 500_000;

static SCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"score (cp|mate) (-?\d+)").expect("valid score pattern"));

static PV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" pv (.+)").expect("valid pv pattern"));

/// A position evaluation reported by the engine.
///
/// `centipawns` is always present so callers can compare mate and
/// centipawn scores on one axis; for mates it holds [`MATE_SENTINEL_CP`]
/// with the sign of the winning side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Evaluation {
    /// Centipawn score.
    Cp {
        centipawns: i32,
        /// Score in pawns, as reported by the engine.
        value: f64,
        #[serde(default)]
        pv: Vec<String>,
    },
    /// Forced mate. Positive `plies` means the side to move delivers it.
    Mate {
        plies: i32,
        centipawns: i32,
        #[serde(default)]
        pv: Vec<String>,
    },
}

impl Evaluation {
    /// Centipawn score with no principal variation.
    pub fn cp(centipawns: i32) -> Self {
        Evaluation::Cp {
            centipawns,
            value: f64::from(centipawns) / 100.0,
            pv: Vec::new(),
        }
    }

    /// Mate score with no principal variation.
    pub fn mate(plies: i32) -> Self {
        Evaluation::Mate {
            plies,
            centipawns: if plies > 0 {
                MATE_SENTINEL_CP
            } else {
                -MATE_SENTINEL_CP
            },
            pv: Vec::new(),
        }
    }

    pub fn centipawns(&self) -> i32 {
        match self {
            Evaluation::Cp { centipawns, .. } | Evaluation::Mate { centipawns, .. } => *centipawns,
        }
    }

    pub fn pv(&self) -> &[String] {
        match self {
            Evaluation::Cp { pv, .. } | Evaluation::Mate { pv, .. } => pv,
        }
    }

    pub fn is_mate(&self) -> bool {
        matches!(self, Evaluation::Mate { .. })
    }

    /// Returns the same evaluation with the centipawn field negated, or
    /// `None` when the negation does not fit in an `i32`.
    ///
    /// `value` and `plies` stay in the engine's reporting frame.
    pub fn inverted(mut self) -> Option<Self> {
        match &mut self {
            Evaluation::Cp { centipawns, .. } | Evaluation::Mate { centipawns, .. } => {
                *centipawns = centipawns.checked_neg()?;
            }
        }
        Some(self)
    }

    fn pv_mut(&mut self) -> &mut Vec<String> {
        match self {
            Evaluation::Cp { pv, .. } | Evaluation::Mate { pv, .. } => pv,
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Cp { centipawns, .. } => {
                write!(f, "{:+.2}", f64::from(*centipawns) / 100.0)
            }
            Evaluation::Mate { plies, .. } => write!(f, "#{}", plies),
        }
    }
}

/// Parse one line of engine output into an [`Evaluation`].
///
/// Looks for `score cp <n>` or `score mate <n>` anywhere in the line and,
/// when a score was found, for a trailing ` pv <moves>` section. With
/// `invert_sign` the centipawn field is negated, which turns a
/// side-to-move score into the opposite frame.
///
/// Returns `None` for lines without a score, and for scores that do not
/// fit in an `i32` before or after inversion; most `info` lines
/// (`currmove`, `string`, `nodes` only) carry none and should be skipped.
///
/// # Examples
///
/// ```
/// use uci::{parse_line, Evaluation};
///
/// let eval = parse_line("info depth 20 score cp 35 pv e2e4 e7e5", false).unwrap();
/// assert_eq!(eval.centipawns(), 35);
/// assert_eq!(eval.pv(), ["e2e4", "e7e5"]);
///
/// assert_eq!(parse_line("info depth 5 nodes 1000", false), None);
/// assert_eq!(parse_line("info score mate -3", false), Some(Evaluation::mate(-3)));
/// ```
pub fn parse_line(line: &str, invert_sign: bool) -> Option<Evaluation> {
    let caps = SCORE_RE.captures(line)?;
    let n: i32 = caps[2].parse().ok()?;

    let mut eval = match &caps[1] {
        "cp" => Evaluation::cp(n),
        _ => Evaluation::mate(n),
    };
    if invert_sign {
        eval = eval.inverted()?;
    }

    if let Some(pv) = PV_RE.captures(line) {
        *eval.pv_mut() = pv[1].split_whitespace().map(str::to_string).collect();
    }

    Some(eval)
}
