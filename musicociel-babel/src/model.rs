//! Format-agnostic song model
//!
//! Every format parses into [`Song`] and serializes from it. The JSON form of
//! these types (through serde) is the native `musicociel` format and the body
//! of store records, so field names and ordering are part of the contract.
//!
//! Chords are kept exactly as written. Interpreting them is the job of the
//! theory engine (see [`crate::theory`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A song: descriptive metadata plus the transformable musical content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    /// Free-form metadata (subtitle, composer, capo, ...). Keys are lowercase.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub music: SheetMusic,
}

impl Song {
    pub fn new(title: impl Into<String>) -> Self {
        Song {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Assigns a header value by name, routing well-known names to their fields.
    ///
    /// Shared by the text formats so that `Title: x` and `{title: x}` land in
    /// the same place.
    pub fn set_field(&mut self, name: &str, value: &str) {
        let value = value.trim().to_string();
        match name.trim().to_lowercase().as_str() {
            "title" | "t" => self.title = value,
            "artist" => self.artist = Some(value),
            "key" => self.music.key = Some(value),
            other => {
                self.metadata.insert(other.to_string(), value);
            }
        }
    }

    /// Iterates over every chord of the song, in reading order.
    pub fn chords(&self) -> impl Iterator<Item = &str> {
        self.music.chords()
    }
}

/// The musical content that transformations operate on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetMusic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl SheetMusic {
    pub fn chords(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .flat_map(|section| section.lines.iter())
            .flat_map(|line| line.segments.iter())
            .filter_map(|segment| segment.chord.as_deref())
    }
}

/// A block of lines, optionally named ("Chorus", "Verse 2").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub lines: Vec<Line>,
}

impl Section {
    pub fn named(name: impl Into<String>) -> Self {
        Section {
            name: Some(name.into()),
            lines: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub segments: Vec<Segment>,
}

impl Line {
    pub fn new(segments: Vec<Segment>) -> Self {
        Line { segments }
    }

    pub fn has_chords(&self) -> bool {
        self.segments.iter().any(|s| s.chord.is_some())
    }

    /// The lyrics of the line with chords stripped.
    pub fn lyrics(&self) -> String {
        self.segments.iter().map(|s| s.lyrics.as_str()).collect()
    }
}

/// A run of lyrics, optionally starting with a chord change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chord: Option<String>,
    #[serde(default)]
    pub lyrics: String,
}

impl Segment {
    pub fn new(chord: Option<&str>, lyrics: impl Into<String>) -> Self {
        Segment {
            chord: chord.map(str::to_string),
            lyrics: lyrics.into(),
        }
    }

    pub fn lyrics(lyrics: impl Into<String>) -> Self {
        Segment::new(None, lyrics)
    }

    pub fn chord(chord: &str, lyrics: impl Into<String>) -> Self {
        Segment::new(Some(chord), lyrics)
    }
}
