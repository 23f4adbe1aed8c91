//! Reader boundary
//!
//! Notation parsing lives outside this crate. A reader turns a score file
//! into a [`ScoreDocument`]: per part, one sequence per element kind, sorted
//! by (measure, onset).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ComparisonError;
use crate::score::{ElementBody, ElementKind, ScoreElement};

/// Source of score documents
pub trait ScoreReader {
    /// Read one score
    ///
    /// # Errors
    ///
    /// Returns `ComparisonError::ContentError` when the score has no notes or
    /// rests, and `IoError` / `ParseError` / `InvalidInput` for unreadable or
    /// malformed files.
    fn read(&self, path: &Path) -> Result<ScoreDocument, ComparisonError>;
}

/// Element sequences of one part
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScorePart {
    /// Notes
    pub notes: Vec<ScoreElement>,
    /// Rests
    pub rests: Vec<ScoreElement>,
    /// Time signatures, as written
    pub time_signatures: Vec<ScoreElement>,
    /// Key signatures, as written
    pub key_signatures: Vec<ScoreElement>,
    /// Clefs, as written
    pub clefs: Vec<ScoreElement>,
    /// Spanners
    pub spanners: Vec<ScoreElement>,
    /// Dynamics
    pub dynamics: Vec<ScoreElement>,
}

impl ScorePart {
    /// Sequence of one kind
    pub fn elements(&self, kind: ElementKind) -> &[ScoreElement] {
        match kind {
            ElementKind::Note => &self.notes,
            ElementKind::Rest => &self.rests,
            ElementKind::TimeSignature => &self.time_signatures,
            ElementKind::KeySignature => &self.key_signatures,
            ElementKind::Clef => &self.clefs,
            ElementKind::Spanner => &self.spanners,
            ElementKind::Dynamic => &self.dynamics,
        }
    }

    /// Highest measure among notes and rests, 0 when there are none
    pub fn max_measure(&self) -> u32 {
        self.notes
            .iter()
            .chain(self.rests.iter())
            .map(|e| e.measure)
            .max()
            .unwrap_or(0)
    }

    /// True when the part has neither notes nor rests
    pub fn is_silent(&self) -> bool {
        self.notes.is_empty() && self.rests.is_empty()
    }
}

/// Reader output for one score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDocument {
    /// Software that produced the file, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software_vendor: Option<String>,

    /// Parts in score order; part `i` holds elements with `part == i + 1`
    #[serde(default)]
    pub parts: Vec<ScorePart>,
}

impl ScoreDocument {
    /// Number of parts
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Number of measures: the highest measure among notes and rests
    pub fn max_measure(&self) -> u32 {
        self.parts.iter().map(ScorePart::max_measure).max().unwrap_or(0)
    }

    /// Every element of one kind, parts concatenated in order
    pub fn elements(&self, kind: ElementKind) -> Vec<ScoreElement> {
        self.parts
            .iter()
            .flat_map(|part| part.elements(kind).iter().cloned())
            .collect()
    }

    /// Check that the document has musical content
    ///
    /// # Errors
    ///
    /// Returns `ComparisonError::ContentError` when no part has notes or rests.
    pub fn ensure_content(&self) -> Result<(), ComparisonError> {
        if self.parts.iter().all(ScorePart::is_silent) {
            return Err(ComparisonError::ContentError(
                "score has no notes or rests".to_string(),
            ));
        }
        Ok(())
    }

    /// Check the structural invariants of reader output
    ///
    /// - part and measure numbers are 1-based and parts match their position
    /// - each element is filed under its own kind
    /// - sequences are non-decreasing in measure
    /// - time signatures have non-zero numerator and denominator
    ///
    /// # Errors
    ///
    /// Returns `ComparisonError::InvalidInput` describing the first violation.
    pub fn validate(&self) -> Result<(), ComparisonError> {
        for (index, part) in self.parts.iter().enumerate() {
            let number = index as u32 + 1;
            for kind in ElementKind::ALL {
                let mut previous = 0;
                for element in part.elements(kind) {
                    if element.part != number {
                        return Err(ComparisonError::InvalidInput(format!(
                            "{} at {} filed under part {}",
                            kind,
                            element.locator(),
                            number
                        )));
                    }
                    if element.measure == 0 {
                        return Err(ComparisonError::InvalidInput(format!(
                            "{} at {} has measure 0",
                            kind,
                            element.locator()
                        )));
                    }
                    if element.kind() != kind {
                        return Err(ComparisonError::InvalidInput(format!(
                            "{} at {} filed under {}",
                            element.kind(),
                            element.locator(),
                            kind
                        )));
                    }
                    if element.measure < previous {
                        return Err(ComparisonError::InvalidInput(format!(
                            "{} sequence of part {} goes back to measure {} after {}",
                            kind, number, element.measure, previous
                        )));
                    }
                    if let ElementBody::TimeSignature(ts) = &element.body {
                        if ts.numerator == 0 || ts.denominator == 0 {
                            return Err(ComparisonError::InvalidInput(format!(
                                "time signature {}/{} at {}",
                                ts.numerator,
                                ts.denominator,
                                element.locator()
                            )));
                        }
                    }
                    previous = element.measure;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{
        Duration, NoteAttributes, Onset, PitchLetter, TimeSignatureAttributes,
    };

    fn note(part: u32, measure: u32) -> ScoreElement {
        ScoreElement::new(
            part,
            measure,
            Onset::from_integer(0),
            ElementBody::Note(NoteAttributes::new(PitchLetter::C, 4, Duration::from_integer(1))),
        )
    }

    fn document(notes: Vec<ScoreElement>) -> ScoreDocument {
        ScoreDocument {
            software_vendor: None,
            parts: vec![ScorePart {
                notes,
                ..ScorePart::default()
            }],
        }
    }

    #[test]
    fn test_valid_document() {
        let doc = document(vec![note(1, 1), note(1, 2), note(1, 2)]);
        assert!(doc.validate().is_ok());
        assert!(doc.ensure_content().is_ok());
        assert_eq!(doc.max_measure(), 2);
        assert_eq!(doc.part_count(), 1);
        assert_eq!(doc.elements(ElementKind::Note).len(), 3);
    }

    #[test]
    fn test_wrong_part_number() {
        let doc = document(vec![note(2, 1)]);
        assert!(matches!(doc.validate(), Err(ComparisonError::InvalidInput(_))));
    }

    #[test]
    fn test_measure_zero() {
        let doc = document(vec![note(1, 0)]);
        assert!(matches!(doc.validate(), Err(ComparisonError::InvalidInput(_))));
    }

    #[test]
    fn test_decreasing_measures() {
        let doc = document(vec![note(1, 3), note(1, 2)]);
        assert!(matches!(doc.validate(), Err(ComparisonError::InvalidInput(_))));
    }

    #[test]
    fn test_misfiled_kind() {
        let mut doc = document(vec![]);
        doc.parts[0].rests.push(note(1, 1));
        assert!(matches!(doc.validate(), Err(ComparisonError::InvalidInput(_))));
    }

    #[test]
    fn test_zero_denominator() {
        let mut doc = document(vec![note(1, 1)]);
        doc.parts[0].time_signatures.push(ScoreElement::new(
            1,
            1,
            Onset::from_integer(0),
            ElementBody::TimeSignature(TimeSignatureAttributes {
                numerator: 3,
                denominator: 0,
            }),
        ));
        assert!(matches!(doc.validate(), Err(ComparisonError::InvalidInput(_))));
    }

    #[test]
    fn test_no_content() {
        let doc = document(vec![]);
        assert!(matches!(doc.ensure_content(), Err(ComparisonError::ContentError(_))));
        assert_eq!(doc.max_measure(), 0);
    }
}
