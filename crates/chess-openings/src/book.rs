//! Opening book storage and lookup.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::opening::{piece_placement, Opening};

/// Errors that can occur when loading an opening book.
#[derive(Debug, Error)]
pub enum BookError {
    /// Failed to read the opening book file.
    #[error("failed to read opening book: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Anything that can answer "is this piece placement a known book position?".
///
/// Lookups use exact string equality on the FEN piece-placement field.
pub trait BookLookup {
    /// Returns true if `placement` is a catalogued opening position.
    fn is_book_position(&self, placement: &str) -> bool;
}

impl<T: BookLookup + ?Sized> BookLookup for &T {
    fn is_book_position(&self, placement: &str) -> bool {
        (**self).is_book_position(placement)
    }
}

/// An opening book keyed by piece placement.
#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    positions: HashMap<String, Opening>,
}

/// On-disk entries may be full records or bare FEN strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum BookEntry {
    Opening(Opening),
    Fen(String),
}

impl OpeningBook {
    /// Creates a new empty opening book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a book from opening records. Later duplicates of a
    /// placement keep the first record.
    #[must_use]
    pub fn with_openings(openings: Vec<Opening>) -> Self {
        let mut book = Self::new();
        for opening in openings {
            book.add(opening);
        }
        book
    }

    /// Parses a JSON array of opening records or FEN strings.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::JsonError`] if the document is not such an array.
    pub fn from_json(json: &str) -> Result<Self, BookError> {
        let entries: Vec<BookEntry> = serde_json::from_str(json)?;
        let openings = entries
            .into_iter()
            .map(|entry| match entry {
                BookEntry::Opening(opening) => opening,
                BookEntry::Fen(fen) => Opening::new("", "", fen),
            })
            .collect();
        Ok(Self::with_openings(openings))
    }

    /// Loads a JSON opening book from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BookError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Adds an opening, keyed by its piece placement.
    pub fn add(&mut self, opening: Opening) {
        let key = opening.placement().to_string();
        self.positions.entry(key).or_insert(opening);
    }

    /// Adds every position of `other` not already present.
    pub fn merge(&mut self, other: OpeningBook) {
        for (key, opening) in other.positions {
            self.positions.entry(key).or_insert(opening);
        }
    }

    /// Returns true if the book is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns the number of positions in the book.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Looks up the opening for a piece placement.
    #[must_use]
    pub fn lookup(&self, placement: &str) -> Option<&Opening> {
        self.positions.get(placement)
    }

    /// Looks up the opening for a full FEN, using only its placement field.
    #[must_use]
    pub fn lookup_fen(&self, fen: &str) -> Option<&Opening> {
        self.lookup(piece_placement(fen))
    }
}

impl BookLookup for OpeningBook {
    fn is_book_position(&self, placement: &str) -> bool {
        self.positions.contains_key(placement)
    }
}
