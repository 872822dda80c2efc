//! Native musicociel format
//!
//! Pretty-printed JSON of the [`Song`] model. It is lossless, which makes it
//! the default output format and the first format tried when auto-detecting.

use crate::error::FormatError;
use crate::format::Format;
use crate::model::Song;

/// Format implementation for musicociel JSON
#[derive(Debug, Default)]
pub struct MusicocielFormat;

impl Format for MusicocielFormat {
    fn name(&self) -> &str {
        "musicociel"
    }

    fn description(&self) -> &str {
        "Musicociel JSON song format"
    }

    fn file_extensions(&self) -> &[&str] {
        &["musicociel", "json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Song, FormatError> {
        serde_json::from_str(source).map_err(|e| FormatError::ParseError(e.to_string()))
    }

    fn serialize(&self, song: &Song) -> Result<String, FormatError> {
        let mut json = serde_json::to_string_pretty(song)
            .map_err(|e| FormatError::SerializationError(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Line, Section, Segment};

    #[test]
    fn round_trips_losslessly() {
        let mut song = Song::new("Round");
        song.metadata.insert("capo".to_string(), "2".to_string());
        song.music.sections.push(Section {
            name: Some("Chorus".to_string()),
            lines: vec![Line::new(vec![Segment::chord("Am", "la la")])],
        });

        let format = MusicocielFormat;
        let text = format.serialize(&song).unwrap();
        assert_eq!(format.parse(&text).unwrap(), song);
    }

    #[test]
    fn rejects_non_json() {
        let result = MusicocielFormat.parse("{title: Not JSON}");
        assert!(matches!(result, Err(FormatError::ParseError(_))));
    }
}
