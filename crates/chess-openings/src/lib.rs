//! Chess opening book and lookup.
//!
//! This crate provides the set of known opening positions used to mark
//! moves as "book". Positions are keyed by the piece-placement field of
//! their FEN. A built-in book is compiled into the library and custom books
//! can be loaded from JSON.

pub mod book;
pub mod builtin;
pub mod opening;

pub use book::{BookError, BookLookup, OpeningBook};
pub use builtin::builtin_book;
pub use opening::{piece_placement, Opening};
