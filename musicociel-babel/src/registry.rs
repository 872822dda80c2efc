//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for all available formats.
//! Formats can be registered and retrieved by name. Registration order is
//! significant: it is the order in which formats are tried when the input
//! format has to be guessed.

use crate::error::FormatError;
use crate::format::Format;
use crate::model::Song;

/// Pseudo-format name that forces trial-and-error detection.
pub const AUTO_FORMAT: &str = "auto";

/// Output format used when neither a name nor a file extension decides.
pub const DEFAULT_OUTPUT_FORMAT: &str = "musicociel";

/// Registry of song formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::default();
///
/// let song = registry.decode(source, Some("song.cho"), None)?;
/// let text = registry.encode(&song, Some("song.txt"), None)?;
/// ```
pub struct FormatRegistry {
    formats: Vec<Box<dyn Format>>,
    default_output: String,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: Vec::new(),
            default_output: DEFAULT_OUTPUT_FORMAT.to_string(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it is replaced in place
    /// and keeps its position in the detection order.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        match self.formats.iter().position(|f| f.name() == format.name()) {
            Some(index) => self.formats[index] = Box::new(format),
            None => self.formats.push(Box::new(format)),
        }
    }

    /// Change the output format used when nothing else decides.
    pub fn set_default_output(&mut self, name: impl Into<String>) {
        self.default_output = name.into();
    }

    pub fn default_output(&self) -> &str {
        &self.default_output
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .iter()
            .find(|f| f.name() == name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.iter().any(|f| f.name() == name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.iter().map(|f| f.name().to_string()).collect();
        names.sort();
        names
    }

    /// Iterate over the formats in registration order
    pub fn formats(&self) -> impl Iterator<Item = &dyn Format> {
        self.formats.iter().map(|f| f.as_ref())
    }

    /// Detect format from filename based on file extension
    ///
    /// Extensions are compared case-insensitively. Returns the format name if a
    /// matching extension is found, or None otherwise.
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_lowercase();

        self.formats
            .iter()
            .find(|format| format.file_extensions().contains(&extension.as_str()))
            .map(|format| format.name().to_string())
    }

    /// Parse source text using the specified format
    pub fn parse(&self, source: &str, format: &str) -> Result<Song, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support parsing"
            )));
        }
        fmt.parse(source)
    }

    /// Serialize a song using the specified format
    pub fn serialize(&self, song: &Song, format: &str) -> Result<String, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support serialization"
            )));
        }
        fmt.serialize(song)
    }

    /// Decode source text into a song.
    ///
    /// The format is the explicit `format` if given (`"auto"` forces detection),
    /// else the one owning `filename`'s extension, else every parsing format is
    /// tried in registration order and the first success wins.
    pub fn decode(
        &self,
        source: &str,
        filename: Option<&str>,
        format: Option<&str>,
    ) -> Result<Song, FormatError> {
        let chosen = match format {
            Some(AUTO_FORMAT) => None,
            Some(name) => Some(name.to_string()),
            None => filename.and_then(|name| self.detect_format_from_filename(name)),
        };

        match chosen {
            Some(name) => {
                tracing::debug!(format = %name, "decoding with explicit format");
                self.parse(source, &name)
            }
            None => self.decode_by_trial(source),
        }
    }

    fn decode_by_trial(&self, source: &str) -> Result<Song, FormatError> {
        let mut failures = Vec::new();
        for format in self.formats().filter(|f| f.supports_parsing()) {
            match format.parse(source) {
                Ok(song) => {
                    tracing::debug!(format = format.name(), "auto-detected input format");
                    return Ok(song);
                }
                Err(err) => failures.push(format!("{}: {err}", format.name())),
            }
        }
        Err(FormatError::ParseError(format!(
            "no format could read the input ({})",
            failures.join("; ")
        )))
    }

    /// Resolve the output format name: explicit, else by extension, else the default.
    pub fn resolve_output_format(&self, filename: Option<&str>, format: Option<&str>) -> String {
        format
            .map(str::to_string)
            .or_else(|| filename.and_then(|name| self.detect_format_from_filename(name)))
            .unwrap_or_else(|| self.default_output.clone())
    }

    /// Encode a song, choosing the format like [`FormatRegistry::resolve_output_format`].
    pub fn encode(
        &self,
        song: &Song,
        filename: Option<&str>,
        format: Option<&str>,
    ) -> Result<String, FormatError> {
        let name = self.resolve_output_format(filename, format);
        self.serialize(song, &name)
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Detection order: strict formats first, the permissive text format last
        registry.register(crate::formats::MusicocielFormat);
        registry.register(crate::formats::ChordProFormat);
        registry.register(crate::formats::TextFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
