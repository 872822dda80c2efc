//! Format implementations
//!
//! This module contains all format implementations that convert between
//! the song model and various text representations.

pub mod chordpro;
pub mod common;
pub mod musicociel;
pub mod text;

pub use chordpro::ChordProFormat;
pub use musicociel::MusicocielFormat;
pub use text::TextFormat;
