//! Format trait definition
//!
//! This module defines the core Format trait that all format implementations must implement.
//! The trait provides a uniform interface for parsing and serializing songs.

use crate::error::FormatError;
use crate::model::Song;

/// Trait for song formats
///
/// Implementors provide bidirectional conversion between a text representation and [`Song`].
/// Formats can support parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_parsing(&self) -> bool {
///         true
///     }
///
///     fn parse(&self, source: &str) -> Result<Song, FormatError> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "chordpro", "text")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format (e.g., ["cho", "crd"])
    ///
    /// Returns a slice of file extensions without the leading dot.
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → Song)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (Song → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into a Song
    ///
    /// Default implementation returns NotSupported error.
    fn parse(&self, _source: &str) -> Result<Song, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a Song into source text
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(&self, _song: &Song) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}
