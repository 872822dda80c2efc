//! Chords-over-lyrics text format
//!
//! The plain-text layout found on most chord sites:
//!
//! ```text
//! Title: Amazing Grace
//! Artist: John Newton
//!
//! [Verse]
//! G              C
//! Amazing grace, how sweet
//! ```
//!
//! Header lines (`Name: value`) are only read before the first body line.
//! A line is a chord line when every whitespace-separated token is a chord
//! with a known quality; it is merged with the lyric line below it by column.
//! Column alignment is the only link between chords and lyrics, so a chord
//! wider than the lyrics under it pads the lyrics with spaces on export.

pub mod parser;
pub mod serializer;

use crate::error::FormatError;
use crate::format::Format;
use crate::model::Song;

/// Format implementation for chords-over-lyrics text
#[derive(Debug, Default)]
pub struct TextFormat;

impl Format for TextFormat {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Plain text with chords above the lyrics"
    }

    fn file_extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Song, FormatError> {
        parser::parse_text(source)
    }

    fn serialize(&self, song: &Song) -> Result<String, FormatError> {
        Ok(serializer::serialize_to_text(song))
    }
}
