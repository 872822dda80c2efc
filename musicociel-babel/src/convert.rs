//! Song conversion pipeline.
//!
//! Drives one source document through decode → transform → (optional) encode.
//! This is the single-file path of the toolchain; the sync engine reuses
//! [`load_song`] and persists the song instead of encoding it.
//!
//! Conversion is pure: no file I/O happens here, the caller hands in the
//! source text and decides where the output goes.

use crate::error::FormatError;
use crate::model::Song;
use crate::registry::FormatRegistry;
use crate::transforms::{transform_song, TransformConfig, TransformError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// What to do with the song once it is decoded and transformed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConvertTarget {
    /// Encode, choosing the format from `format`, else `filename`'s extension,
    /// else the registry default.
    Export {
        filename: Option<String>,
        format: Option<String>,
    },
    /// Hand the song back to the caller.
    #[default]
    Song,
}

/// Describes a single conversion.
///
/// ```ignore
/// let spec = ConvertSpec::new(&source, &config)
///     .with_source_name("song.txt")
///     .export_to(Some("song.cho"), None);
/// let output = convert(&registry, &spec)?;
/// ```
#[derive(Debug, Clone)]
pub struct ConvertSpec<'a> {
    pub source: &'a str,
    /// Used as a format hint only (its extension).
    pub source_name: Option<&'a str>,
    /// Explicit input format, `"auto"` to force detection.
    pub input_format: Option<&'a str>,
    pub transform: &'a TransformConfig,
    pub target: ConvertTarget,
}

impl<'a> ConvertSpec<'a> {
    pub fn new(source: &'a str, transform: &'a TransformConfig) -> Self {
        Self {
            source,
            source_name: None,
            input_format: None,
            transform,
            target: ConvertTarget::Song,
        }
    }

    pub fn with_source_name(mut self, name: &'a str) -> Self {
        self.source_name = Some(name);
        self
    }

    pub fn with_input_format(mut self, format: Option<&'a str>) -> Self {
        self.input_format = format;
        self
    }

    pub fn export_to(mut self, filename: Option<&str>, format: Option<&str>) -> Self {
        self.target = ConvertTarget::Export {
            filename: filename.map(str::to_string),
            format: format.map(str::to_string),
        };
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertOutput {
    Encoded(String),
    Song(Song),
}

/// Decodes `source` and applies the transformation stage.
pub fn load_song(
    registry: &FormatRegistry,
    source: &str,
    source_name: Option<&str>,
    input_format: Option<&str>,
    config: &TransformConfig,
) -> Result<Song, ConvertError> {
    let mut song = registry.decode(source, source_name, input_format)?;
    transform_song(&mut song, config)?;
    Ok(song)
}

/// Runs the whole pipeline described by `spec`.
pub fn convert(registry: &FormatRegistry, spec: &ConvertSpec<'_>) -> Result<ConvertOutput, ConvertError> {
    let song = load_song(
        registry,
        spec.source,
        spec.source_name,
        spec.input_format,
        spec.transform,
    )?;

    match &spec.target {
        ConvertTarget::Export { filename, format } => {
            let encoded = registry.encode(&song, filename.as_deref(), format.as_deref())?;
            Ok(ConvertOutput::Encoded(encoded))
        }
        ConvertTarget::Song => Ok(ConvertOutput::Song(song)),
    }
}
