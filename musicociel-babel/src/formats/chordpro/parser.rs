//! ChordPro parsing (ChordPro → Song)

use crate::error::FormatError;
use crate::formats::common::SongBuilder;
use crate::model::{Line, Segment, Song};
use crate::theory::is_chord_symbol;

/// Parse ChordPro source into a Song
pub fn parse_chordpro(source: &str) -> Result<Song, FormatError> {
    let mut builder = SongBuilder::new();
    let mut recognised = false;

    for (index, raw) in source.lines().enumerate() {
        let line_number = index + 1;
        let line = raw.trim();

        if line.is_empty() {
            builder.blank_line();
            continue;
        }
        if line.starts_with('#') {
            continue;
        }
        if let Some(body) = line.strip_prefix('{') {
            let inner = body.strip_suffix('}').ok_or_else(|| {
                FormatError::ParseError(format!("line {line_number}: unterminated directive"))
            })?;
            apply_directive(&mut builder, inner);
            recognised = true;
            continue;
        }

        let segments = parse_lyrics_line(raw.trim_end(), line_number)?;
        recognised |= segments
            .iter()
            .filter_map(|s| s.chord.as_deref())
            .any(is_chord_symbol);
        builder.push_line(Line::new(segments));
    }

    if !recognised {
        return Err(FormatError::ParseError(
            "no ChordPro directive or chord found".to_string(),
        ));
    }
    Ok(builder.finish())
}

fn apply_directive(builder: &mut SongBuilder, inner: &str) {
    let (name, value) = match inner.split_once(':') {
        Some((name, value)) => (name.trim(), value.trim()),
        None => (inner.trim(), ""),
    };
    let label = |default: &str| {
        if value.is_empty() {
            default.to_string()
        } else {
            value.to_string()
        }
    };

    match name.to_lowercase().as_str() {
        "title" | "t" => builder.song_mut().set_field("title", value),
        "subtitle" | "st" => builder.song_mut().set_field("subtitle", value),
        "artist" | "composer" | "lyricist" | "album" | "key" | "capo" | "tempo" | "time"
        | "year" | "copyright" => builder.song_mut().set_field(name, value),
        "start_of_chorus" | "soc" => builder.start_environment(label("Chorus")),
        "start_of_verse" | "sov" => builder.start_environment(label("Verse")),
        "start_of_bridge" | "sob" => builder.start_environment(label("Bridge")),
        "end_of_chorus" | "eoc" | "end_of_verse" | "eov" | "end_of_bridge" | "eob" => {
            builder.end_section()
        }
        "comment" | "c" | "comment_italic" | "ci" | "comment_box" | "cb" => {
            builder.start_section(Some(value.to_string()))
        }
        other => tracing::debug!(directive = other, "ignoring ChordPro directive"),
    }
}

/// Splits `Hello [C]world` into segments.
fn parse_lyrics_line(line: &str, line_number: usize) -> Result<Vec<Segment>, FormatError> {
    let mut segments = Vec::new();
    let mut current = Segment::default();
    let mut rest = line;

    while let Some(open) = rest.find('[') {
        current.lyrics.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find(']').ok_or_else(|| {
            FormatError::ParseError(format!("line {line_number}: unterminated chord"))
        })?;
        if current.chord.is_some() || !current.lyrics.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
        current.chord = Some(after[..close].trim().to_string());
        rest = &after[close + 1..];
    }
    current.lyrics.push_str(rest);
    if current.chord.is_some() || !current.lyrics.is_empty() {
        segments.push(current);
    }
    Ok(segments)
}
