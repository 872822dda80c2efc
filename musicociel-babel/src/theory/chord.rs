//! Chord symbols
//!
//! A chord symbol is `<root><quality>[/<bass>]`. The quality is kept as
//! written; [`CHORD_TYPES`] decides whether it is known and what its
//! canonical spelling is.

use super::note::Note;
use std::fmt;

/// A recognised chord quality with its canonical name and accepted aliases.
#[derive(Debug, PartialEq, Eq)]
pub struct ChordType {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

impl ChordType {
    fn matches(&self, quality: &str) -> bool {
        self.name == quality || self.aliases.contains(&quality)
    }
}

pub static CHORD_TYPES: &[ChordType] = &[
    ChordType { name: "", aliases: &["M", "maj", "major"] },
    ChordType { name: "m", aliases: &["-", "min", "mi", "minor"] },
    ChordType { name: "5", aliases: &[] },
    ChordType { name: "6", aliases: &["M6", "maj6"] },
    ChordType { name: "m6", aliases: &["-6", "min6"] },
    ChordType { name: "6/9", aliases: &["69"] },
    ChordType { name: "7", aliases: &["dom7"] },
    ChordType { name: "maj7", aliases: &["M7", "Δ", "Δ7", "ma7", "j7"] },
    ChordType { name: "m7", aliases: &["-7", "min7", "mi7"] },
    ChordType { name: "mMaj7", aliases: &["m(maj7)", "mM7", "-maj7", "-Δ7"] },
    ChordType { name: "m7b5", aliases: &["ø", "ø7", "-7b5", "min7b5", "m7(b5)"] },
    ChordType { name: "dim", aliases: &["°", "o", "dim5"] },
    ChordType { name: "dim7", aliases: &["°7", "o7"] },
    ChordType { name: "aug", aliases: &["+", "+5", "#5"] },
    ChordType { name: "aug7", aliases: &["+7", "7#5", "7+5"] },
    ChordType { name: "sus2", aliases: &[] },
    ChordType { name: "sus4", aliases: &["sus"] },
    ChordType { name: "7sus4", aliases: &["7sus"] },
    ChordType { name: "add9", aliases: &["add2", "2"] },
    ChordType { name: "madd9", aliases: &["-add9", "m(add9)"] },
    ChordType { name: "9", aliases: &[] },
    ChordType { name: "m9", aliases: &["-9", "min9"] },
    ChordType { name: "maj9", aliases: &["M9", "Δ9"] },
    ChordType { name: "7b9", aliases: &["7(b9)"] },
    ChordType { name: "7#9", aliases: &["7(#9)"] },
    ChordType { name: "11", aliases: &[] },
    ChordType { name: "m11", aliases: &["-11", "min11"] },
    ChordType { name: "13", aliases: &[] },
];

/// Looks a quality up by canonical name or alias.
pub fn lookup_chord_type(quality: &str) -> Option<&'static ChordType> {
    CHORD_TYPES.iter().find(|t| t.matches(quality))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    pub root: Note,
    pub quality: String,
    pub bass: Option<Note>,
}

impl Chord {
    /// Parses a chord symbol. Returns `None` when there is no root note.
    ///
    /// A trailing `/X` is a bass note only when `X` is a complete note name,
    /// so `C6/9` keeps `6/9` as its quality.
    pub fn parse(source: &str) -> Option<Chord> {
        let (root, rest) = Note::parse_prefix(source.trim())?;
        let (quality, bass) = match rest.rsplit_once('/') {
            Some((quality, bass)) => match Note::parse(bass) {
                Some(bass) => (quality, Some(bass)),
                None => (rest, None),
            },
            None => (rest, None),
        };
        Some(Chord {
            root,
            quality: quality.to_string(),
            bass,
        })
    }

    pub fn chord_type(&self) -> Option<&'static ChordType> {
        lookup_chord_type(&self.quality)
    }

    pub fn is_known(&self) -> bool {
        self.chord_type().is_some()
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality)?;
        if let Some(bass) = self.bass {
            write!(f, "/{bass}")?;
        }
        Ok(())
    }
}

/// Whether `token` reads as a chord with a known quality.
///
/// Used by the formats to tell chord lines and inline chords from lyrics.
pub fn is_chord_symbol(token: &str) -> bool {
    Chord::parse(token).is_some_and(|chord| chord.is_known())
}
