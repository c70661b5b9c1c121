//! Move quality classification.

use std::fmt;

use chess_openings::{piece_placement, BookLookup};
use serde::{Deserialize, Serialize};

use crate::percent::to_percent;

/// Classification of a move by the evaluation swing it caused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveQuality {
    /// Lost 20 or more percentage points.
    Blunder,
    /// Lost 10 to 20 points.
    Mistake,
    /// Lost 5 to 10 points.
    Inaccuracy,
    /// Lost 2 to 5 points.
    Okay,
    /// Gained 5 to 20 points.
    Good,
    /// Gained 20 or more points.
    Excellent,
    /// Reached a catalogued opening position.
    Book,
}

impl MoveQuality {
    /// All labels, worst first.
    pub const ALL: [MoveQuality; 7] = [
        MoveQuality::Blunder,
        MoveQuality::Mistake,
        MoveQuality::Inaccuracy,
        MoveQuality::Okay,
        MoveQuality::Good,
        MoveQuality::Excellent,
        MoveQuality::Book,
    ];

    /// Lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            MoveQuality::Blunder => "blunder",
            MoveQuality::Mistake => "mistake",
            MoveQuality::Inaccuracy => "inaccuracy",
            MoveQuality::Okay => "okay",
            MoveQuality::Good => "good",
            MoveQuality::Excellent => "excellent",
            MoveQuality::Book => "book",
        }
    }

    /// Annotation glyph as used in PGN comments.
    pub fn symbol(self) -> &'static str {
        match self {
            MoveQuality::Blunder => "??",
            MoveQuality::Mistake => "?",
            MoveQuality::Inaccuracy => "?!",
            MoveQuality::Okay => "",
            MoveQuality::Good => "!",
            MoveQuality::Excellent => "!!",
            MoveQuality::Book => "book",
        }
    }

    /// Label for a swing in percentage points, seen from the mover's side.
    ///
    /// Small losses (-5..-2) are labelled [`MoveQuality::Okay`] while small
    /// gains (below 5) get no label at all.
    pub fn from_delta(delta: f64) -> Option<Self> {
        if delta <= -20.0 {
            Some(MoveQuality::Blunder)
        } else if delta <= -10.0 {
            Some(MoveQuality::Mistake)
        } else if delta <= -5.0 {
            Some(MoveQuality::Inaccuracy)
        } else if delta <= -2.0 {
            Some(MoveQuality::Okay)
        } else if delta >= 20.0 {
            Some(MoveQuality::Excellent)
        } else if delta >= 5.0 {
            Some(MoveQuality::Good)
        } else {
            None
        }
    }
}

impl fmt::Display for MoveQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a move from the evaluations before and after it.
///
/// * `previous`, `current` - White-relative centipawn evaluations of the
///   positions before and after the move; `None` while not yet analysed.
/// * `is_white` - true when White played the move.
/// * `fen` - position after the move; only its piece placement is used.
///
/// Returns `None` when either evaluation is missing or the swing is too
/// small to label. Book positions are labelled [`MoveQuality::Book`]
/// regardless of the swing.
pub fn classify(
    previous: Option<f64>,
    current: Option<f64>,
    is_white: bool,
    fen: &str,
    book: &impl BookLookup,
) -> Option<MoveQuality> {
    let (previous, current) = (previous?, current?);

    if book.is_book_position(piece_placement(fen)) {
        return Some(MoveQuality::Book);
    }

    let sign = if is_white { 1.0 } else { -1.0 };
    let delta = (to_percent(current) - to_percent(previous)) * sign;
    MoveQuality::from_delta(delta)
}

/// Label counts for one side of a game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Moves played by this side.
    pub total_moves: u32,
    /// Moves with no label.
    pub unlabeled: u32,
    pub book: u32,
    pub excellent: u32,
    pub good: u32,
    pub okay: u32,
    pub inaccuracies: u32,
    pub mistakes: u32,
    pub blunders: u32,
}

impl PlayerStats {
    /// Counts the given labels.
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a Option<MoveQuality>>) -> Self {
        let mut stats = Self::default();
        for label in labels {
            stats.record(*label);
        }
        stats
    }

    /// Adds one move to the counts.
    pub fn record(&mut self, label: Option<MoveQuality>) {
        self.total_moves += 1;
        let slot = match label {
            None => &mut self.unlabeled,
            Some(MoveQuality::Book) => &mut self.book,
            Some(MoveQuality::Excellent) => &mut self.excellent,
            Some(MoveQuality::Good) => &mut self.good,
            Some(MoveQuality::Okay) => &mut self.okay,
            Some(MoveQuality::Inaccuracy) => &mut self.inaccuracies,
            Some(MoveQuality::Mistake) => &mut self.mistakes,
            Some(MoveQuality::Blunder) => &mut self.blunders,
        };
        *slot += 1;
    }
}
