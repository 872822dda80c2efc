//! Shared configuration loader for the musicociel tools.
//!
//! `defaults/musicociel.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`MusicocielConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use musicociel_babel::transforms::TransformOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/musicociel.default.toml");

/// Top-level configuration consumed by musicociel applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MusicocielConfig {
    pub convert: ConvertConfig,
    pub transform: TransformSettings,
    pub sync: SyncConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub default_output_format: String,
}

/// Default transformation options; command-line flags are layered on top.
#[derive(Debug, Clone, Deserialize)]
pub struct TransformSettings {
    pub accept_unknown_chords: bool,
    pub normalize_chords: bool,
    pub reset_alterations: bool,
    #[serde(default)]
    pub alteration: Option<String>,
}

impl From<&TransformSettings> for TransformOptions {
    fn from(settings: &TransformSettings) -> Self {
        TransformOptions {
            transpose: None,
            alteration: settings.alteration.clone(),
            accept_unknown_chords: settings.accept_unknown_chords,
            normalize_chord_names: settings.normalize_chords,
            reset_alterations: settings.reset_alterations,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    pub namespace: String,
    #[serde(default)]
    pub database: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MusicocielConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MusicocielConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.convert.default_output_format, "musicociel");
        assert_eq!(config.sync.namespace, "song");
        assert_eq!(config.sync.database, None);
        assert_eq!(config.transform.alteration, None);
        assert!(!config.transform.accept_unknown_chords);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("sync.database", "songs.db")
            .expect("override to apply")
            .set_override("transform.normalize_chords", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.sync.database.as_deref(), Some("songs.db"));
        assert!(config.transform.normalize_chords);
    }

    #[test]
    fn layers_user_files_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("musicociel.toml");
        fs::write(&path, "[transform]\nalteration = \"b\"\n").unwrap();

        let config = Loader::new().with_file(&path).build().unwrap();
        assert_eq!(config.transform.alteration.as_deref(), Some("b"));
        assert_eq!(config.sync.namespace, "song");
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Loader::new()
            .with_file(dir.path().join("absent.toml"))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn transform_settings_convert_to_options() {
        let config = load_defaults().unwrap();
        let options = TransformOptions::from(&config.transform);
        assert_eq!(options.transpose, None);
        assert!(!options.normalize_chord_names);
        assert!(options.validate().is_ok());
    }
}
