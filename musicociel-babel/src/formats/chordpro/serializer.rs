//! ChordPro serialization (Song → ChordPro)

use crate::model::{Line, Section, Song};

/// Section names written as ChordPro environments rather than comments.
const ENVIRONMENTS: &[(&str, &str)] = &[
    ("Chorus", "chorus"),
    ("Verse", "verse"),
    ("Bridge", "bridge"),
];

/// Serialize a Song to ChordPro
pub fn serialize_to_chordpro(song: &Song) -> String {
    let mut out = String::new();

    if !song.title.is_empty() {
        out.push_str(&format!("{{title: {}}}\n", song.title));
    }
    if let Some(artist) = &song.artist {
        out.push_str(&format!("{{artist: {artist}}}\n"));
    }
    if let Some(key) = &song.music.key {
        out.push_str(&format!("{{key: {key}}}\n"));
    }
    for (name, value) in &song.metadata {
        out.push_str(&format!("{{{name}: {value}}}\n"));
    }

    for section in &song.music.sections {
        if !out.is_empty() {
            out.push('\n');
        }
        write_section(&mut out, section);
    }

    out
}

fn write_section(out: &mut String, section: &Section) {
    let environment = section.name.as_deref().and_then(|name| {
        ENVIRONMENTS
            .iter()
            .find(|(label, _)| *label == name)
            .map(|(_, env)| *env)
    });

    match (environment, section.name.as_deref()) {
        (Some(env), _) => {
            out.push_str(&format!("{{start_of_{env}}}\n"));
            write_lines(out, &section.lines);
            out.push_str(&format!("{{end_of_{env}}}\n"));
        }
        (None, Some(name)) => {
            out.push_str(&format!("{{comment: {name}}}\n"));
            write_lines(out, &section.lines);
        }
        (None, None) => write_lines(out, &section.lines),
    }
}

fn write_lines(out: &mut String, lines: &[Line]) {
    for line in lines {
        for segment in &line.segments {
            if let Some(chord) = &segment.chord {
                out.push('[');
                out.push_str(chord);
                out.push(']');
            }
            out.push_str(&segment.lyrics);
        }
        out.push('\n');
    }
}
