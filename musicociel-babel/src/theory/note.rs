//! Note names, accidentals and pitch classes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which accidental to use when a pitch has no natural spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alteration {
    Sharp,
    Flat,
}

impl Alteration {
    /// Parses the user-facing spellings: `#`, `♯`, `sharp`, `b`, `♭`, `flat`.
    ///
    /// Anything else is rejected; callers turn `None` into a configuration error.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "#" | "♯" => Some(Alteration::Sharp),
            "b" | "♭" => Some(Alteration::Flat),
            other if other.eq_ignore_ascii_case("sharp") => Some(Alteration::Sharp),
            other if other.eq_ignore_ascii_case("flat") => Some(Alteration::Flat),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Alteration::Sharp => "#",
            Alteration::Flat => "b",
        }
    }

    fn of_accidental(accidental: i8) -> Option<Self> {
        match accidental.signum() {
            1 => Some(Alteration::Sharp),
            -1 => Some(Alteration::Flat),
            _ => None,
        }
    }
}

impl fmt::Display for Alteration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }

    /// Pitch class of the natural note.
    pub fn pitch_class(self) -> u8 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    fn natural(pitch_class: u8) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|letter| letter.pitch_class() == pitch_class)
    }
}

/// A spelled note: a letter plus a signed number of semitones (`#` = +1, `b` = -1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pub letter: Letter,
    pub accidental: i8,
}

impl Note {
    pub fn new(letter: Letter, accidental: i8) -> Self {
        Note { letter, accidental }
    }

    pub fn pitch_class(self) -> u8 {
        (i16::from(self.letter.pitch_class()) + i16::from(self.accidental)).rem_euclid(12) as u8
    }

    /// The alteration this note is written with, if any.
    pub fn alteration(self) -> Option<Alteration> {
        Alteration::of_accidental(self.accidental)
    }

    /// Parses a note at the start of `source`, returning it with the unparsed rest.
    ///
    /// At most two accidentals are consumed, so `Bbb` reads as B double-flat.
    pub fn parse_prefix(source: &str) -> Option<(Note, &str)> {
        let mut chars = source.char_indices();
        let (_, first) = chars.next()?;
        let letter = Letter::from_char(first)?;
        let mut accidental = 0i8;
        let mut rest_at = first.len_utf8();
        for (idx, c) in chars.take(2) {
            let step = match c {
                '#' | '♯' => 1,
                'b' | '♭' => -1,
                _ => break,
            };
            if accidental != 0 && accidental.signum() != step {
                break;
            }
            accidental += step;
            rest_at = idx + c.len_utf8();
        }
        Some((Note::new(letter, accidental), &source[rest_at..]))
    }

    /// Parses a complete note name; trailing characters are an error.
    pub fn parse(source: &str) -> Option<Note> {
        match Note::parse_prefix(source)? {
            (note, "") => Some(note),
            _ => None,
        }
    }

    /// Spells a pitch class, using a natural when one exists.
    pub fn from_pitch_class(pitch_class: u8, preference: Alteration) -> Note {
        let pitch_class = pitch_class % 12;
        if let Some(letter) = Letter::natural(pitch_class) {
            return Note::new(letter, 0);
        }
        match preference {
            Alteration::Sharp => Note::new(Letter::natural(pitch_class - 1).unwrap_or(Letter::C), 1),
            Alteration::Flat => Note::new(
                Letter::natural((pitch_class + 1) % 12).unwrap_or(Letter::C),
                -1,
            ),
        }
    }

    /// Moves the note by `semitones` and respells the result.
    pub fn transpose(self, semitones: i32, preference: Alteration) -> Note {
        let pitch_class = (i32::from(self.pitch_class()) + semitones.rem_euclid(12)).rem_euclid(12) as u8;
        Note::from_pitch_class(pitch_class, preference)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter.as_char())?;
        let symbol = if self.accidental > 0 { "#" } else { "b" };
        for _ in 0..self.accidental.unsigned_abs() {
            f.write_str(symbol)?;
        }
        Ok(())
    }
}
