//! Musical transformations applied between import and export
//!
//! [`TransformOptions`] holds the options as the user typed them (CLI flags,
//! config file values). [`TransformOptions::validate`] turns them into a
//! [`TransformConfig`], the typed value the pipeline carries around. Once a
//! `TransformConfig` exists its alteration is sharp or flat and its
//! transposition is an integer, so [`transform`] itself only has the theory
//! engine's errors left to report.

use crate::model::{SheetMusic, Song};
use crate::theory::{self, Alteration, TheoryError, TheoryOptions};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// A flag or config value is malformed.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// The theory engine refused the music under the current policy.
    #[error(transparent)]
    Theory(#[from] TheoryError),
}

/// Raw, unvalidated transformation options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOptions {
    pub transpose: Option<String>,
    pub alteration: Option<String>,
    pub accept_unknown_chords: bool,
    pub normalize_chord_names: bool,
    pub reset_alterations: bool,
}

impl TransformOptions {
    pub fn validate(&self) -> Result<TransformConfig, TransformError> {
        let transpose_semitones = self.transpose.as_deref().map(parse_transpose).transpose()?;
        let default_alteration = self
            .alteration
            .as_deref()
            .map(parse_alteration)
            .transpose()?;
        Ok(TransformConfig {
            transpose_semitones,
            accept_unknown_chords: self.accept_unknown_chords,
            normalize_chord_names: self.normalize_chord_names,
            default_alteration,
            reset_alterations: self.reset_alterations,
        })
    }
}

/// Validated transformation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformConfig {
    pub transpose_semitones: Option<i32>,
    pub accept_unknown_chords: bool,
    pub normalize_chord_names: bool,
    pub default_alteration: Option<Alteration>,
    pub reset_alterations: bool,
}

impl TransformConfig {
    fn theory_options(&self) -> TheoryOptions {
        TheoryOptions {
            transpose: self.transpose_semitones.unwrap_or(0),
            accept_unknown_chords: self.accept_unknown_chords,
            normalize_chord_names: self.normalize_chord_names,
            default_alteration: self.default_alteration,
            reset_alterations: self.reset_alterations,
        }
    }
}

/// Parses a transposition amount. Integer-valued decimals (`"2.0"`) are accepted.
pub fn parse_transpose(raw: &str) -> Result<i32, TransformError> {
    let invalid = || TransformError::Configuration(format!("Invalid transpose parameter: {raw}"));
    let trimmed = raw.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if let Ok(value) = unsigned.parse::<i32>() {
        return Ok(value);
    }
    let value: f64 = unsigned.parse().map_err(|_| invalid())?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= f64::from(i32::MAX) {
        Ok(value as i32)
    } else {
        Err(invalid())
    }
}

pub fn parse_alteration(raw: &str) -> Result<Alteration, TransformError> {
    Alteration::parse(raw)
        .ok_or_else(|| TransformError::Configuration(format!("Invalid alteration: {raw}")))
}

/// Applies `config` to a song's musical content.
pub fn transform(music: SheetMusic, config: &TransformConfig) -> Result<SheetMusic, TransformError> {
    Ok(theory::check_and_transpose(music, &config.theory_options())?)
}

/// Applies `config` to `song.music` in place.
pub fn transform_song(song: &mut Song, config: &TransformConfig) -> Result<(), TransformError> {
    let music = std::mem::take(&mut song.music);
    song.music = transform(music, config)?;
    Ok(())
}
