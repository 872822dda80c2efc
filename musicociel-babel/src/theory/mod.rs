//! Chord checking and transposition
//!
//! The theory engine walks every chord of a [`SheetMusic`], checks it against
//! the known chord types and rewrites it according to [`TheoryOptions`]:
//!
//! - transposition by a number of semitones (root, bass and song key move together)
//! - alteration policy: which accidental to use when a moved note lands on a black key
//! - chord-name normalization (`C-` → `Cm`, `CM7` → `Cmaj7`)
//!
//! Spelling rules, in order: a note written with an accidental keeps that
//! accidental's direction (unless alterations are reset), otherwise the
//! default alteration applies, otherwise sharps. Notes are only respelled
//! when something asks for it (a non-zero transposition or a reset), so a
//! plain check leaves `E#` as `E#`.

pub mod chord;
pub mod note;

use crate::model::SheetMusic;
use chord::Chord;
use thiserror::Error;

pub use chord::{is_chord_symbol, lookup_chord_type, ChordType, CHORD_TYPES};
pub use note::{Alteration, Letter, Note};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TheoryOptions {
    pub transpose: i32,
    pub accept_unknown_chords: bool,
    pub normalize_chord_names: bool,
    pub default_alteration: Option<Alteration>,
    pub reset_alterations: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TheoryError {
    #[error("Unknown chord: '{0}'")]
    UnknownChord(String),
}

/// Checks every chord of `music` and applies the edits requested by `options`.
pub fn check_and_transpose(
    mut music: SheetMusic,
    options: &TheoryOptions,
) -> Result<SheetMusic, TheoryError> {
    if let Some(key) = music.key.take() {
        // Keys are often written in prose ("E minor"); move them when they
        // read as a chord and keep them untouched otherwise.
        let lenient = TheoryOptions {
            accept_unknown_chords: true,
            ..options.clone()
        };
        music.key = Some(rewrite_chord(&key, &lenient)?);
    }

    for section in &mut music.sections {
        for line in &mut section.lines {
            for segment in &mut line.segments {
                if let Some(chord) = segment.chord.as_deref() {
                    segment.chord = Some(rewrite_chord(chord, options)?);
                }
            }
        }
    }

    Ok(music)
}

/// Rewrites a single chord symbol.
pub fn rewrite_chord(text: &str, options: &TheoryOptions) -> Result<String, TheoryError> {
    let Some(chord) = Chord::parse(text) else {
        return if options.accept_unknown_chords {
            Ok(text.to_string())
        } else {
            Err(TheoryError::UnknownChord(text.to_string()))
        };
    };

    let chord_type = chord.chord_type();
    if chord_type.is_none() && !options.accept_unknown_chords {
        return Err(TheoryError::UnknownChord(text.to_string()));
    }

    let respell = options.transpose != 0 || options.reset_alterations;
    let quality = match chord_type {
        Some(known) if options.normalize_chord_names => known.name.to_string(),
        _ => chord.quality,
    };
    let rewritten = Chord {
        root: if respell {
            respell_note(chord.root, options)
        } else {
            chord.root
        },
        bass: match chord.bass {
            Some(bass) if respell => Some(respell_note(bass, options)),
            other => other,
        },
        quality,
    };

    Ok(rewritten.to_string())
}

fn respell_note(note: Note, options: &TheoryOptions) -> Note {
    let written = if options.reset_alterations {
        None
    } else {
        note.alteration()
    };
    let preference = written
        .or(options.default_alteration)
        .unwrap_or(Alteration::Sharp);
    note.transpose(options.transpose, preference)
}
