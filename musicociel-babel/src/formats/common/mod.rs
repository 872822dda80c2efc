//! Common utilities for the line-oriented song formats
//!
//! ChordPro and chords-over-lyrics text describe the same structure with
//! different syntax. Both feed their lines through [`SongBuilder`] so that the
//! same song written in either format yields the same [`Song`] (and therefore
//! the same store identifier).

use crate::model::{Line, Section, Song};

/// Header names recognised at the top of text-based formats.
pub const HEADER_FIELDS: &[&str] = &[
    "title", "subtitle", "artist", "composer", "lyricist", "album", "key", "capo", "tempo",
    "time", "year", "copyright",
];

/// Incrementally assembles a [`Song`] from a stream of lines.
///
/// Sections are delimited in three ways:
/// - a named header starts a new section;
/// - a blank line closes the current section, unless an explicit environment
///   (ChordPro `{start_of_chorus}` ... `{end_of_chorus}`) is open;
/// - closing an environment ends the section.
///
/// Unnamed sections without lines are dropped; named ones are kept even when empty.
#[derive(Debug, Default)]
pub struct SongBuilder {
    song: Song,
    current: Section,
    in_environment: bool,
}

impl SongBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn song_mut(&mut self) -> &mut Song {
        &mut self.song
    }

    pub fn start_section(&mut self, name: Option<String>) {
        self.flush();
        self.current.name = name;
        self.in_environment = false;
    }

    pub fn start_environment(&mut self, name: String) {
        self.start_section(Some(name));
        self.in_environment = true;
    }

    pub fn end_section(&mut self) {
        self.flush();
        self.in_environment = false;
    }

    pub fn blank_line(&mut self) {
        if !self.in_environment && !self.current.lines.is_empty() {
            self.flush();
        }
    }

    pub fn push_line(&mut self, line: Line) {
        self.current.lines.push(line);
    }

    pub fn finish(mut self) -> Song {
        self.flush();
        self.song
    }

    fn flush(&mut self) {
        let section = std::mem::take(&mut self.current);
        if section.name.is_some() || !section.lines.is_empty() {
            self.song.music.sections.push(section);
        }
    }
}

/// Splits `Name: value` when `Name` is a known header field.
pub fn header_field(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    let name = name.trim();
    HEADER_FIELDS
        .iter()
        .any(|field| field.eq_ignore_ascii_case(name))
        .then_some((name, value.trim()))
}

/// Capitalizes a metadata key for display (`capo` → `Capo`).
pub fn display_name(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
