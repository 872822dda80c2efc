//! Text parsing (chords over lyrics → Song)

use crate::error::FormatError;
use crate::formats::common::{header_field, SongBuilder};
use crate::model::{Line, Segment, Song};
use crate::theory::is_chord_symbol;

/// A chord and the character column it starts at.
type PlacedChord = (usize, String);

/// Parse chords-over-lyrics text into a Song
pub fn parse_text(source: &str) -> Result<Song, FormatError> {
    if source.trim().is_empty() {
        return Err(FormatError::ParseError("empty document".to_string()));
    }

    let lines: Vec<&str> = source.lines().map(str::trim_end).collect();
    let mut builder = SongBuilder::new();

    let mut index = 0;
    while index < lines.len() {
        let line = lines[index].trim();
        if !line.is_empty() {
            match header_field(line) {
                Some((name, value)) => builder.song_mut().set_field(name, value),
                None => break,
            }
        }
        index += 1;
    }

    while index < lines.len() {
        let line = lines[index];
        index += 1;

        if line.trim().is_empty() {
            builder.blank_line();
        } else if let Some(name) = section_header(line) {
            builder.start_section(Some(name.to_string()));
        } else if let Some(chords) = chord_line(line) {
            let lyrics = lines
                .get(index)
                .copied()
                .filter(|next| is_lyrics_line(next));
            match lyrics {
                Some(lyrics) => {
                    builder.push_line(merge(&chords, lyrics));
                    index += 1;
                }
                None => builder.push_line(merge(&chords, "")),
            }
        } else {
            builder.push_line(Line::new(vec![Segment::lyrics(line)]));
        }
    }

    Ok(builder.finish())
}

/// `[Chorus]` → `Chorus`. A bracketed chord (`[Am]`) is not a header.
fn section_header(line: &str) -> Option<&str> {
    let name = line.trim().strip_prefix('[')?.strip_suffix(']')?.trim();
    (!name.is_empty() && !is_chord_symbol(name)).then_some(name)
}

fn is_lyrics_line(line: &str) -> bool {
    !line.trim().is_empty() && section_header(line).is_none() && chord_line(line).is_none()
}

/// Returns the chords of `line` with their columns when every token is a chord.
fn chord_line(line: &str) -> Option<Vec<PlacedChord>> {
    let mut chords = Vec::new();
    let mut token = String::new();
    let mut start = 0;

    for (column, c) in line.chars().chain(std::iter::once(' ')).enumerate() {
        if c.is_whitespace() {
            if !token.is_empty() {
                if !is_chord_symbol(&token) {
                    return None;
                }
                chords.push((start, std::mem::take(&mut token)));
            }
        } else {
            if token.is_empty() {
                start = column;
            }
            token.push(c);
        }
    }

    (!chords.is_empty()).then_some(chords)
}

/// Cuts `lyrics` at each chord column.
fn merge(chords: &[PlacedChord], lyrics: &str) -> Line {
    let chars: Vec<char> = lyrics.chars().collect();
    let slice = |from: usize, to: usize| -> String {
        chars[from.min(chars.len())..to.min(chars.len())]
            .iter()
            .collect()
    };

    let mut segments = Vec::with_capacity(chords.len() + 1);
    let first_column = chords.first().map_or(0, |(column, _)| *column);
    let leading = slice(0, first_column);
    if !leading.is_empty() {
        segments.push(Segment::lyrics(leading));
    }

    for (i, (column, chord)) in chords.iter().enumerate() {
        let end = chords.get(i + 1).map_or(chars.len(), |(next, _)| *next);
        segments.push(Segment::chord(chord, slice(*column, end)));
    }

    Line::new(segments)
}
