//! JSON score documents
//!
//! Reads a [`ScoreDocument`] that an external notation parser has already
//! extracted and serialized with serde_json.

use std::path::Path;

use super::reader::{ScoreDocument, ScoreReader};
use crate::error::ComparisonError;

/// Reader for pre-extracted JSON score documents
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonScoreReader;

impl JsonScoreReader {
    /// Create a reader
    pub fn new() -> Self {
        Self
    }

    /// Parse and check a document from a JSON string
    ///
    /// # Errors
    ///
    /// - `ParseError` if the JSON does not describe a score document
    /// - `InvalidInput` if the document breaks a structural invariant
    /// - `ContentError` if it has no notes or rests
    ///
    /// # Example
    ///
    /// ```
    /// use stratum_score::io::json::JsonScoreReader;
    ///
    /// let json = r#"{
    ///     "parts": [{
    ///         "notes": [{"part": 1, "measure": 1, "kind": "note", "letter": "C", "octave": 4, "duration": [1, 1]}]
    ///     }]
    /// }"#;
    /// let document = JsonScoreReader::new().from_json_str(json)?;
    /// assert_eq!(document.part_count(), 1);
    /// # Ok::<(), stratum_score::ComparisonError>(())
    /// ```
    pub fn from_json_str(&self, json: &str) -> Result<ScoreDocument, ComparisonError> {
        let document: ScoreDocument = serde_json::from_str(json)?;
        log::debug!(
            "Parsed score document: {} parts, {} measures",
            document.part_count(),
            document.max_measure()
        );
        document.validate()?;
        document.ensure_content()?;
        Ok(document)
    }
}

impl ScoreReader for JsonScoreReader {
    fn read(&self, path: &Path) -> Result<ScoreDocument, ComparisonError> {
        log::debug!("Reading score document: {}", path.display());
        let json = std::fs::read_to_string(path)?;
        self.from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{ElementKind, PitchLetter};

    const TWO_NOTES: &str = r#"{
        "softwareVendor": "Engraver 3.1",
        "parts": [{
            "notes": [
                {"part": 1, "measure": 1, "onset": [0, 1], "kind": "note", "letter": "E",
                 "octave": 5, "duration": [1, 2], "accidental": "flat", "beams": ["start"]},
                {"part": 1, "measure": 1, "onset": [1, 2], "kind": "note", "letter": "D",
                 "octave": 5, "duration": [1, 2], "beams": ["stop"]}
            ],
            "clefs": [
                {"part": 1, "measure": 1, "kind": "clef", "sign": "G", "line": 2}
            ]
        }]
    }"#;

    #[test]
    fn test_parse_document() {
        let document = JsonScoreReader::new().from_json_str(TWO_NOTES).unwrap();
        assert_eq!(document.software_vendor.as_deref(), Some("Engraver 3.1"));
        let notes = document.elements(ElementKind::Note);
        assert_eq!(notes.len(), 2);
        let first = notes[0].as_note().unwrap();
        assert_eq!(first.letter, PitchLetter::E);
        assert_eq!(first.voice, 1);
        assert_eq!(notes[1].locator(), "1-1-1/2");
        assert_eq!(document.elements(ElementKind::Clef).len(), 1);
    }

    #[test]
    fn test_malformed_json() {
        let result = JsonScoreReader::new().from_json_str("{\"parts\": [");
        assert!(matches!(result, Err(ComparisonError::ParseError(_))));
    }

    #[test]
    fn test_empty_score_is_content_error() {
        let result = JsonScoreReader::new().from_json_str(r#"{"parts": [{}]}"#);
        assert!(matches!(result, Err(ComparisonError::ContentError(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = JsonScoreReader::new().read(Path::new("/nonexistent/score.json"));
        assert!(matches!(result, Err(ComparisonError::IoError(_))));
    }
}
