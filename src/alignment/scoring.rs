//! Similarity scores for score elements
//!
//! Two ways to make element sequences alignable:
//!
//! - **Projection**: map each element to a cheap key (note letter, spanner or
//!   dynamic name, measure character for rests and persistent markings) and
//!   score keys with [`ExactMatch`]
//! - **Weighted**: score full elements with [`WeightedElementScore`], a
//!   same-kind bonus plus a signed weight per attribute

use super::SimilarityScore;
use crate::error::ComparisonError;
use crate::score::{Attribute, ElementBody, ElementKind, PitchLetter, ScoreElement};

/// Measure number reserved as the gap marker in character encodings
const RESERVED_MEASURE_CHAR: u32 = '_' as u32;

/// Bonus (or penalty, negated) for comparing elements of the same kind
const SAME_KIND_WEIGHT: f64 = 20.0;

/// Cheap alignment key of one element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProjectionKey {
    /// Note letter name
    Letter(PitchLetter),
    /// Spanner or dynamic name
    Name(String),
    /// Measure number encoded as a single character
    Measure(char),
}

/// Encode a measure number as one character, skipping `_`
fn measure_char(measure: u32) -> Result<char, ComparisonError> {
    let code = if measure >= RESERVED_MEASURE_CHAR {
        measure + 1
    } else {
        measure
    };
    char::from_u32(code).ok_or_else(|| {
        ComparisonError::InvalidSequenceInput(format!(
            "Measure {} has no character encoding",
            measure
        ))
    })
}

/// Project a sequence of one kind onto its alignment keys
///
/// # Arguments
///
/// * `elements` - Elements of a single kind
/// * `kind` - Expected kind of every element
///
/// # Errors
///
/// Returns `ComparisonError::InvalidSequenceInput` if an element is of another
/// kind or its measure cannot be encoded as a character.
pub fn project(
    elements: &[ScoreElement],
    kind: ElementKind,
) -> Result<Vec<ProjectionKey>, ComparisonError> {
    elements
        .iter()
        .map(|element| {
            if element.kind() != kind {
                return Err(ComparisonError::InvalidSequenceInput(format!(
                    "{} at {} in a {} sequence",
                    element.kind(),
                    element.locator(),
                    kind
                )));
            }
            let key = match &element.body {
                ElementBody::Note(note) => ProjectionKey::Letter(note.letter),
                ElementBody::Spanner(spanner) => ProjectionKey::Name(spanner.name.clone()),
                ElementBody::Dynamic(dynamic) => ProjectionKey::Name(dynamic.name.clone()),
                ElementBody::Rest(_)
                | ElementBody::TimeSignature(_)
                | ElementBody::KeySignature(_)
                | ElementBody::Clef(_) => ProjectionKey::Measure(measure_char(element.measure)?),
            };
            Ok(key)
        })
        .collect()
}

/// Fixed score for equal and unequal values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExactMatch {
    /// Score of two equal values
    pub match_score: f64,
    /// Score of two different values
    pub mismatch_score: f64,
}

impl ExactMatch {
    /// Create a scorer
    pub fn new(match_score: f64, mismatch_score: f64) -> Self {
        Self {
            match_score,
            mismatch_score,
        }
    }
}

impl<T: PartialEq> SimilarityScore<T> for ExactMatch {
    fn score(&self, truth: &T, candidate: &T) -> f64 {
        if truth == candidate {
            self.match_score
        } else {
            self.mismatch_score
        }
    }
}

const NOTE_WEIGHTS: &[(Attribute, f64)] = &[
    (Attribute::NoteOctave, 5.0),
    (Attribute::NoteVoice, 3.0),
    (Attribute::NoteName, 2.0),
    (Attribute::NoteDuration, 1.0),
    (Attribute::NoteBeam, 1.0),
    (Attribute::NoteAccidental, 1.0),
    (Attribute::NoteStemDirection, 1.0),
];

const REST_WEIGHTS: &[(Attribute, f64)] = &[
    (Attribute::RestVoice, 5.0),
    (Attribute::RestDuration, 2.0),
];

const TIME_SIGNATURE_WEIGHTS: &[(Attribute, f64)] = &[
    (Attribute::TimeSignatureNumerator, 2.0),
    (Attribute::TimeSignatureDenominator, 2.0),
];

const KEY_SIGNATURE_WEIGHTS: &[(Attribute, f64)] = &[
    (Attribute::KeySignatureStep, 2.0),
    (Attribute::KeySignatureMode, 2.0),
];

const CLEF_WEIGHTS: &[(Attribute, f64)] = &[
    (Attribute::ClefName, 2.0),
    (Attribute::ClefLine, 2.0),
    (Attribute::ClefOctave, 2.0),
];

const SPANNER_WEIGHTS: &[(Attribute, f64)] = &[
    (Attribute::SpannerName, 2.0),
    (Attribute::SpannerPlacement, 1.0),
];

const DYNAMIC_WEIGHTS: &[(Attribute, f64)] = &[(Attribute::DynamicName, 2.0)];

fn weights(kind: ElementKind) -> &'static [(Attribute, f64)] {
    match kind {
        ElementKind::Note => NOTE_WEIGHTS,
        ElementKind::Rest => REST_WEIGHTS,
        ElementKind::TimeSignature => TIME_SIGNATURE_WEIGHTS,
        ElementKind::KeySignature => KEY_SIGNATURE_WEIGHTS,
        ElementKind::Clef => CLEF_WEIGHTS,
        ElementKind::Spanner => SPANNER_WEIGHTS,
        ElementKind::Dynamic => DYNAMIC_WEIGHTS,
    }
}

/// Weighted attribute comparator for full elements of one kind
///
/// Two elements of the same kind start at +20 (different kinds at -20), then
/// each weighted attribute adds its weight when equal and subtracts it
/// otherwise. Octave and voice dominate for notes, voice for rests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedElementScore {
    kind: ElementKind,
}

impl WeightedElementScore {
    /// Comparator for sequences of `kind`
    pub fn new(kind: ElementKind) -> Self {
        Self { kind }
    }
}

impl SimilarityScore<ScoreElement> for WeightedElementScore {
    fn score(&self, truth: &ScoreElement, candidate: &ScoreElement) -> f64 {
        if truth.kind() != candidate.kind() {
            return -SAME_KIND_WEIGHT;
        }
        weights(truth.kind())
            .iter()
            .fold(SAME_KIND_WEIGHT, |acc, (attribute, weight)| {
                if attribute.value(truth) == attribute.value(candidate) {
                    acc + weight
                } else {
                    acc - weight
                }
            })
    }

    fn validate(&self, item: &ScoreElement) -> Result<(), ComparisonError> {
        if item.kind() != self.kind {
            return Err(ComparisonError::InvalidSequenceInput(format!(
                "Cannot score {} at {} as {}",
                item.kind(),
                item.locator(),
                self.kind
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{
        DynamicAttributes, Duration, NoteAttributes, Onset, RestAttributes,
        TimeSignatureAttributes,
    };
    use std::collections::BTreeSet;

    fn note(measure: u32, letter: PitchLetter, octave: i8) -> ScoreElement {
        ScoreElement::new(
            1,
            measure,
            Onset::from_integer(0),
            ElementBody::Note(NoteAttributes::new(letter, octave, Duration::from_integer(1))),
        )
    }

    fn rest(measure: u32) -> ScoreElement {
        ScoreElement::new(
            1,
            measure,
            Onset::from_integer(0),
            ElementBody::Rest(RestAttributes {
                duration: Duration::from_integer(1),
                voice: 1,
                articulations: BTreeSet::new(),
            }),
        )
    }

    fn time_signature(measure: u32) -> ScoreElement {
        ScoreElement::new(
            1,
            measure,
            Onset::from_integer(0),
            ElementBody::TimeSignature(TimeSignatureAttributes {
                numerator: 4,
                denominator: 4,
            }),
        )
    }

    #[test]
    fn test_measure_char_skips_underscore() {
        assert_eq!(measure_char(1).unwrap(), '\u{1}');
        assert_eq!(measure_char(94).unwrap(), '^');
        assert_eq!(measure_char(95).unwrap(), '`');
        assert_ne!(measure_char(95).unwrap(), measure_char(94).unwrap());
    }

    #[test]
    fn test_measure_char_rejects_surrogates() {
        let result = measure_char(0xD800);
        assert!(matches!(result, Err(ComparisonError::InvalidSequenceInput(_))));
    }

    #[test]
    fn test_project_by_kind() {
        let notes = vec![note(1, PitchLetter::C, 4), note(1, PitchLetter::E, 4)];
        let keys = project(&notes, ElementKind::Note).unwrap();
        assert_eq!(
            keys,
            vec![
                ProjectionKey::Letter(PitchLetter::C),
                ProjectionKey::Letter(PitchLetter::E)
            ]
        );

        let rests = vec![rest(3)];
        assert_eq!(
            project(&rests, ElementKind::Rest).unwrap(),
            vec![ProjectionKey::Measure('\u{3}')]
        );

        let dynamics = vec![ScoreElement::new(
            1,
            2,
            Onset::from_integer(0),
            ElementBody::Dynamic(DynamicAttributes {
                name: "forte".to_string(),
            }),
        )];
        assert_eq!(
            project(&dynamics, ElementKind::Dynamic).unwrap(),
            vec![ProjectionKey::Name("forte".to_string())]
        );
    }

    #[test]
    fn test_project_rejects_foreign_kind() {
        let mixed = vec![note(1, PitchLetter::C, 4), rest(1)];
        let result = project(&mixed, ElementKind::Note);
        assert!(matches!(result, Err(ComparisonError::InvalidSequenceInput(_))));
    }

    #[test]
    fn test_exact_match() {
        let scorer = ExactMatch::new(10.0, -5.0);
        assert_eq!(scorer.score(&'a', &'a'), 10.0);
        assert_eq!(scorer.score(&'a', &'b'), -5.0);
    }

    #[test]
    fn test_weighted_identical_notes() {
        let scorer = WeightedElementScore::new(ElementKind::Note);
        let a = note(1, PitchLetter::G, 4);
        // 20 + 5 + 3 + 2 + 1 + 1 + 1 + 1
        assert_eq!(scorer.score(&a, &a), 34.0);
    }

    #[test]
    fn test_weighted_octave_dominates_letter() {
        let scorer = WeightedElementScore::new(ElementKind::Note);
        let truth = note(1, PitchLetter::G, 4);
        let wrong_octave = note(1, PitchLetter::G, 5);
        let wrong_letter = note(1, PitchLetter::A, 4);
        assert_eq!(scorer.score(&truth, &wrong_octave), 24.0);
        assert_eq!(scorer.score(&truth, &wrong_letter), 30.0);
        assert!(scorer.score(&truth, &wrong_letter) > scorer.score(&truth, &wrong_octave));
    }

    #[test]
    fn test_weighted_ignores_measure() {
        let scorer = WeightedElementScore::new(ElementKind::TimeSignature);
        assert_eq!(scorer.score(&time_signature(1), &time_signature(7)), 24.0);
    }

    #[test]
    fn test_weighted_kind_mismatch() {
        let scorer = WeightedElementScore::new(ElementKind::Note);
        assert_eq!(scorer.score(&note(1, PitchLetter::C, 4), &rest(1)), -20.0);
        assert!(scorer.validate(&rest(1)).is_err());
        assert!(scorer.validate(&note(1, PitchLetter::C, 4)).is_ok());
    }
}
