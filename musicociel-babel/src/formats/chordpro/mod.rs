//! ChordPro format implementation
//!
//! Supported subset:
//!
//! | ChordPro                                   | Song model                              |
//! |--------------------------------------------|-----------------------------------------|
//! | `{title: x}` / `{t: x}`                    | `title`                                 |
//! | `{artist: x}`                              | `artist`                                |
//! | `{key: x}`                                 | `music.key`                             |
//! | `{subtitle: x}` / `{st: x}`, `{capo: x}`.. | `metadata`                              |
//! | `{start_of_chorus}` ... `{end_of_chorus}`  | section named "Chorus" (or the label)   |
//! | `{start_of_verse}`, `{start_of_bridge}`    | section named "Verse" / "Bridge"        |
//! | `{comment: x}` / `{c: x}`                  | section named `x`                       |
//! | `[Am]lyrics`                               | segment with chord                      |
//! | `# ...`                                    | ignored                                 |
//!
//! Unknown directives are skipped. Input with neither a directive nor a
//! recognisable chord is rejected so that auto-detection can move on to the
//! next format.

pub mod parser;
pub mod serializer;

use crate::error::FormatError;
use crate::format::Format;
use crate::model::Song;

/// Format implementation for ChordPro
#[derive(Debug, Default)]
pub struct ChordProFormat;

impl Format for ChordProFormat {
    fn name(&self) -> &str {
        "chordpro"
    }

    fn description(&self) -> &str {
        "ChordPro format with inline [chords]"
    }

    fn file_extensions(&self) -> &[&str] {
        &["cho", "crd", "chopro", "chordpro", "pro"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Song, FormatError> {
        parser::parse_chordpro(source)
    }

    fn serialize(&self, song: &Song) -> Result<String, FormatError> {
        Ok(serializer::serialize_to_chordpro(song))
    }
}
