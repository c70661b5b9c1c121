//! Core opening types and structures.

use serde::{Deserialize, Serialize};

/// A catalogued opening position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    /// The ECO code for this opening (e.g., "B20", "C44").
    #[serde(default)]
    pub eco: String,
    /// The name of the opening.
    #[serde(default)]
    pub name: String,
    /// Position reached, as a full FEN or just its piece-placement field.
    pub fen: String,
}

impl Opening {
    /// Creates a new opening with the given ECO code, name, and position.
    #[must_use]
    pub fn new(eco: impl Into<String>, name: impl Into<String>, fen: impl Into<String>) -> Self {
        Self {
            eco: eco.into(),
            name: name.into(),
            fen: fen.into(),
        }
    }

    /// The piece-placement field of this opening's position.
    #[must_use]
    pub fn placement(&self) -> &str {
        piece_placement(&self.fen)
    }
}

/// Returns the first space-delimited field of a FEN (the piece placement).
///
/// Side to move, castling rights and move counters are ignored by book
/// lookups, so transpositions with different clocks still match.
#[must_use]
pub fn piece_placement(fen: &str) -> &str {
    fen.trim_start().split(' ').next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_new() {
        let opening = Opening::new(
            "C44",
            "King's Pawn Game",
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
        );
        assert_eq!(opening.eco, "C44");
        assert_eq!(opening.name, "King's Pawn Game");
        assert_eq!(
            opening.placement(),
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R"
        );
    }

    #[test]
    fn test_piece_placement() {
        assert_eq!(piece_placement("8/8/8/8/8/8/8/K6k w - - 0 1"), "8/8/8/8/8/8/8/K6k");
        assert_eq!(piece_placement("8/8/8/8/8/8/8/K6k"), "8/8/8/8/8/8/8/K6k");
        assert_eq!(piece_placement(""), "");
    }

    #[test]
    fn test_deserialize_without_metadata() {
        let opening: Opening = serde_json::from_str(r#"{"fen": "8/8/8/8/8/8/8/K6k w - - 0 1"}"#).unwrap();
        assert!(opening.name.is_empty());
        assert_eq!(opening.placement(), "8/8/8/8/8/8/8/K6k");
    }
}
