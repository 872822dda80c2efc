//! Text serialization (Song → chords over lyrics)

use crate::formats::common::display_name;
use crate::model::{Line, Song};

/// Serialize a Song to chords-over-lyrics text
pub fn serialize_to_text(song: &Song) -> String {
    let mut out = String::new();

    if !song.title.is_empty() {
        out.push_str(&format!("Title: {}\n", song.title));
    }
    if let Some(artist) = &song.artist {
        out.push_str(&format!("Artist: {artist}\n"));
    }
    if let Some(key) = &song.music.key {
        out.push_str(&format!("Key: {key}\n"));
    }
    for (name, value) in &song.metadata {
        out.push_str(&format!("{}: {value}\n", display_name(name)));
    }

    for section in &song.music.sections {
        if !out.is_empty() {
            out.push('\n');
        }
        if let Some(name) = &section.name {
            out.push_str(&format!("[{name}]\n"));
        }
        for line in &section.lines {
            write_line(&mut out, line);
        }
    }

    out
}

fn write_line(out: &mut String, line: &Line) {
    if !line.has_chords() {
        out.push_str(&line.lyrics());
        out.push('\n');
        return;
    }

    let mut chords = String::new();
    let mut lyrics = String::new();
    for segment in &line.segments {
        if let Some(chord) = &segment.chord {
            let chord_width = chords.chars().count();
            let min_column = if chord_width == 0 { 0 } else { chord_width + 1 };
            let column = lyrics.chars().count().max(min_column);
            pad_to(&mut lyrics, column);
            pad_to(&mut chords, column);
            chords.push_str(chord);
        }
        lyrics.push_str(&segment.lyrics);
    }

    out.push_str(&chords);
    out.push('\n');
    let lyrics = lyrics.trim_end();
    if !lyrics.is_empty() {
        out.push_str(lyrics);
        out.push('\n');
    }
}

fn pad_to(text: &mut String, column: usize) {
    let width = text.chars().count();
    if width < column {
        text.extend(std::iter::repeat(' ').take(column - width));
    }
}
